//! dashtrail renders frame sequences of a dashed line being traced along a polyline over a
//! background image, with a camera that smoothly follows the pen.
//!
//! - Build a [`PathModel`] from points ([`points_from_path_data`], [`points_from_svg`])
//! - Load a background with [`load_background`]
//! - Create a [`TraceSession`] and [`run`](TraceSession::run) it into a [`FrameSink`]
//!
//! The walk itself is available as the pure [`advance`] function over a [`DashState`].
#![forbid(unsafe_code)]

pub mod assets;
pub mod camera;
pub mod config;
pub mod export;
pub mod foundation;
pub mod path;
pub mod render;
pub mod session;
pub mod walk;

pub use crate::assets::background::{BackgroundImage, decode_background, load_background};
pub use crate::camera::{Camera, CropRect};
pub use crate::config::{StrokeStyle, TraceConfig};
pub use crate::export::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::export::png::PngSequenceSink;
pub use crate::export::sink::{FanOutSink, FrameSink, InMemorySink, SinkConfig};
pub use crate::foundation::core::{FrameIndex, Line, Point, Size, Vec2};
pub use crate::foundation::error::{TraceError, TraceResult};
pub use crate::path::model::PathModel;
pub use crate::path::source::{points_from_path_data, points_from_svg};
pub use crate::render::FrameRGBA;
pub use crate::render::canvas::Canvas;
pub use crate::render::compositor::compose;
pub use crate::session::{SessionState, TraceSession, TraceStats};
pub use crate::walk::{Boundary, DashState, DashWalker, WalkTick, advance, nearest_boundary};
