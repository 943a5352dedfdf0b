use crate::{
    foundation::{core::FrameIndex, error::TraceResult},
    render::FrameRGBA,
};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second, for sinks that encode video.
    pub fps: u32,
}

/// Consumer of exported frames.
///
/// Ordering contract: `push_frame` is called with strictly increasing, gap-free indices starting
/// at `FrameIndex(1)`.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> TraceResult<()>;
    /// Persist or forward one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TraceResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> TraceResult<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn begin(&mut self, cfg: SinkConfig) -> TraceResult<()> {
        (**self).begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TraceResult<()> {
        (**self).push_frame(idx, frame)
    }

    fn end(&mut self) -> TraceResult<()> {
        (**self).end()
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> TraceResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TraceResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> TraceResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Forwards every frame to each inner sink in order.
pub struct FanOutSink {
    sinks: Vec<Box<dyn FrameSink>>,
}

impl FanOutSink {
    pub fn new(sinks: Vec<Box<dyn FrameSink>>) -> Self {
        Self { sinks }
    }
}

impl FrameSink for FanOutSink {
    fn begin(&mut self, cfg: SinkConfig) -> TraceResult<()> {
        self.sinks.iter_mut().try_for_each(|s| s.begin(cfg))
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TraceResult<()> {
        self.sinks
            .iter_mut()
            .try_for_each(|s| s.push_frame(idx, frame))
    }

    fn end(&mut self) -> TraceResult<()> {
        self.sinks.iter_mut().try_for_each(|s| s.end())
    }
}
