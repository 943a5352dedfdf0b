use crate::{
    assets::background::BackgroundImage,
    camera::Camera,
    config::TraceConfig,
    export::sink::{FrameSink, SinkConfig},
    foundation::{
        core::{FrameIndex, Size},
        error::TraceResult,
    },
    path::model::PathModel,
    render::{canvas::Canvas, compositor::compose},
    walk::DashWalker,
};

/// Progress is logged every this many frames.
const PROGRESS_EVERY: u64 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Done,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TraceStats {
    /// Frames handed to the sink.
    pub frames: u64,
    /// Arc length of all painted sub-segments.
    pub drawn_length: f64,
    /// Arc length consumed by the walk, draw and gap phases alike.
    pub consumed_length: f64,
    /// Number of painted sub-segments.
    pub sub_segments: u64,
}

/// Per-frame driver: advance the walk, paint, follow, crop, export.
///
/// The session owns the canvas; within a step painting always completes before the crop is
/// taken, so no frame is exported with its own strokes missing.
pub struct TraceSession {
    config: TraceConfig,
    path: PathModel,
    walker: DashWalker,
    camera: Camera,
    canvas: Canvas,
    state: SessionState,
    stats: TraceStats,
}

impl TraceSession {
    /// Validate `config` and set up the canvas.
    ///
    /// The canvas covers the viewport, the path's maxima, and the background, whichever is
    /// largest per axis. The background is drawn at the origin.
    pub fn new(
        config: TraceConfig,
        path: PathModel,
        background: Option<BackgroundImage>,
    ) -> TraceResult<Self> {
        config.validate()?;

        let (max_x, max_y) = path.bounds();
        let path_extent = Size::new(max_x.max(0.0) as u32, max_y.max(0.0) as u32);
        let mut canvas_size = config.viewport().max(path_extent);
        if let Some(bg) = &background {
            canvas_size = canvas_size.max(bg.size());
        }

        let canvas = match &background {
            Some(bg) => Canvas::with_background(canvas_size, bg)?,
            None => Canvas::new(canvas_size)?,
        };
        let walker = DashWalker::new(&path, config.dash_len, config.speed);
        let camera = Camera::new(config.viewport(), canvas_size);

        tracing::info!(
            points = path.points().len(),
            length = path.length(),
            canvas_width = canvas_size.width,
            canvas_height = canvas_size.height,
            "trace session ready"
        );
        if path.is_degenerate() {
            tracing::info!("path has no length; nothing to draw");
        }

        Ok(Self {
            config,
            path,
            walker,
            camera,
            canvas,
            state: SessionState::Running,
            stats: TraceStats::default(),
        })
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    pub fn path(&self) -> &PathModel {
        &self.path
    }

    pub fn walker(&self) -> &DashWalker {
        &self.walker
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> TraceStats {
        self.stats
    }

    /// Sink configuration matching this session's frames.
    pub fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            width: self.config.width,
            height: self.config.height,
            fps: self.config.fps,
        }
    }

    /// Produce at most one frame. Returns `Done` without exporting once the walk is complete.
    pub fn step(&mut self, sink: &mut dyn FrameSink) -> TraceResult<SessionState> {
        if self.state == SessionState::Done {
            return Ok(SessionState::Done);
        }
        if self.walker.is_done(&self.path) {
            self.state = SessionState::Done;
            return Ok(SessionState::Done);
        }

        let tick = self.walker.tick(&self.path);
        self.canvas.stroke_lines(&tick.segments, &self.config.stroke)?;

        self.camera.follow_frame(self.config.speed, tick.focus);
        let (idx, rect) = self.camera.crop_frame();
        let frame = compose(&self.canvas, rect);
        sink.push_frame(idx, &frame)?;

        self.stats.frames += 1;
        self.stats.drawn_length += tick.drawn_length();
        self.stats.consumed_length += tick.consumed;
        self.stats.sub_segments += tick.segments.len() as u64;

        if idx.0 % PROGRESS_EVERY == 0 {
            tracing::info!(
                frame = idx.0,
                drawn = self.walker.state().drawn_len,
                total = self.path.length(),
                "progress"
            );
        }
        tracing::debug!(
            frame = idx.0,
            sub_segments = tick.segments.len(),
            toggles = tick.toggles,
            focus_x = tick.focus.x,
            focus_y = tick.focus.y,
            x0 = rect.x0,
            y0 = rect.y0,
            "frame"
        );
        Ok(SessionState::Running)
    }

    /// Run to completion: `begin`, every frame, `end`.
    #[tracing::instrument(skip_all)]
    pub fn run(&mut self, sink: &mut dyn FrameSink) -> TraceResult<TraceStats> {
        sink.begin(self.sink_config())?;
        while self.step(sink)? == SessionState::Running {}
        sink.end()?;
        tracing::info!(
            frames = self.stats.frames,
            last_frame = self.last_frame().0,
            "trace complete"
        );
        Ok(self.stats)
    }

    /// Index of the most recently exported frame.
    pub fn last_frame(&self) -> FrameIndex {
        self.camera.frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{export::sink::InMemorySink, foundation::core::Point};

    fn line_path(len: f64) -> PathModel {
        PathModel::new(vec![Point::new(0.0, 0.0), Point::new(len, 0.0)])
    }

    fn cfg(speed: f64, dash_len: f64) -> TraceConfig {
        TraceConfig {
            width: 20,
            height: 20,
            speed,
            dash_len,
            ..TraceConfig::default()
        }
    }

    #[test]
    fn invalid_config_fails_before_any_frame() {
        let err = TraceSession::new(cfg(0.0, 4.0), line_path(10.0), None);
        assert!(err.is_err());
        let err = TraceSession::new(cfg(3.0, -1.0), line_path(10.0), None);
        assert!(err.is_err());
    }

    #[test]
    fn canvas_covers_viewport_path_and_background() {
        let s = TraceSession::new(cfg(1.0, 1.0), line_path(50.0), None).unwrap();
        assert_eq!(s.canvas().size(), Size::new(50, 20));

        let bg = BackgroundImage {
            width: 30,
            height: 70,
            rgba8_premul: vec![0; 30 * 70 * 4],
        };
        let s = TraceSession::new(cfg(1.0, 1.0), line_path(50.0), Some(bg)).unwrap();
        assert_eq!(s.canvas().size(), Size::new(50, 70));
        assert_eq!(s.camera().canvas(), Size::new(50, 70));
    }

    #[test]
    fn two_frame_scenario() {
        let mut s = TraceSession::new(cfg(5.0, 100.0), line_path(10.0), None).unwrap();
        let mut sink = InMemorySink::new();
        let stats = s.run(&mut sink).unwrap();

        assert_eq!(stats.frames, 2);
        assert_eq!(stats.sub_segments, 2);
        assert!((stats.drawn_length - 10.0).abs() < 1e-9);
        assert_eq!(sink.frames().len(), 2);
        assert_eq!(sink.frames()[0].0, FrameIndex(1));
        assert_eq!(sink.frames()[1].0, FrameIndex(2));
        assert!(sink.ended());
        assert_eq!(s.state(), SessionState::Done);
        assert!(s.walker().is_done(s.path()));
    }

    #[test]
    fn degenerate_path_completes_with_zero_frames() {
        for path in [
            PathModel::new(vec![]),
            PathModel::new(vec![Point::new(3.0, 3.0)]),
            PathModel::new(vec![Point::new(3.0, 3.0), Point::new(3.0, 3.0)]),
        ] {
            let mut s = TraceSession::new(cfg(5.0, 5.0), path, None).unwrap();
            let mut sink = InMemorySink::new();
            let stats = s.run(&mut sink).unwrap();
            assert_eq!(stats.frames, 0);
            assert!(sink.frames().is_empty());
            assert!(sink.config().is_some());
            assert!(sink.ended());
        }
    }

    #[test]
    fn no_frames_after_done() {
        let mut s = TraceSession::new(cfg(50.0, 100.0), line_path(10.0), None).unwrap();
        let mut sink = InMemorySink::new();
        assert_eq!(s.step(&mut sink).unwrap(), SessionState::Running);
        assert_eq!(s.step(&mut sink).unwrap(), SessionState::Done);
        assert_eq!(s.step(&mut sink).unwrap(), SessionState::Done);
        assert_eq!(sink.frames().len(), 1);
    }

    #[test]
    fn frames_have_viewport_size() {
        let mut s = TraceSession::new(cfg(7.0, 3.0), line_path(100.0), None).unwrap();
        let mut sink = InMemorySink::new();
        s.run(&mut sink).unwrap();
        for (_, f) in sink.frames() {
            assert_eq!((f.width, f.height), (20, 20));
        }
    }
}
