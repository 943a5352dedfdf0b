use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    export::sink::{FrameSink, SinkConfig},
    foundation::{
        core::FrameIndex,
        error::{TraceError, TraceResult},
    },
    render::FrameRGBA,
};

/// Writes each frame as `<dir>/<index>.png`, index zero-padded to six digits.
///
/// The padding keeps lexical order equal to presentation order for tools that glob the
/// directory (e.g. `ffmpeg -pattern_type glob -i '*.png'`).
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    written: u64,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of frames written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("{:06}.png", idx.0))
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, _cfg: SinkConfig) -> TraceResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TraceResult<()> {
        let path = self.frame_path(idx);
        let straight = frame.to_straight_rgba8();
        image::save_buffer_with_format(
            &path,
            &straight,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| TraceError::export(format!("write png '{}': {e}", path.display())))?;
        self.written += 1;
        tracing::trace!(frame = idx.0, path = %path.display(), "wrote frame");
        Ok(())
    }

    fn end(&mut self) -> TraceResult<()> {
        tracing::info!(frames = self.written, dir = %self.dir.display(), "png sequence complete");
        Ok(())
    }
}
