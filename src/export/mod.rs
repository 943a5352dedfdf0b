//! Frame exporters.
//!
//! Sinks consume cropped frames in presentation order.

/// `ffmpeg`-based MP4 sink.
pub mod ffmpeg;
/// Numbered PNG files.
pub mod png;
/// Sink trait and generic sinks.
pub mod sink;
