use crate::foundation::{
    core::{Size, Vec2},
    error::{TraceError, TraceResult},
};

/// Stroke used when painting the drawn dashes onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StrokeStyle {
    /// Straight (non-premultiplied) RGBA8.
    pub color: [u8; 4],
    pub width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: [0x66, 0x00, 0xff, 0xff],
            width: 5.0,
        }
    }
}

impl StrokeStyle {
    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn parse_hex_color(s: &str) -> TraceResult<[u8; 4]> {
        let hex = s.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(TraceError::config(format!(
                "stroke color '{s}' must be #rrggbb or #rrggbbaa"
            )));
        }
        let mut out = [0xffu8; 4];
        for (i, slot) in out.iter_mut().enumerate().take(hex.len() / 2) {
            *slot = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|e| {
                TraceError::config(format!("stroke color '{s}' is not valid hex: {e}"))
            })?;
        }
        Ok(out)
    }
}

/// Run configuration. Fixed for the whole run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Output viewport width in pixels.
    pub width: u32,
    /// Output viewport height in pixels.
    pub height: u32,
    /// Arc length consumed per frame. Also drives camera smoothing (`speed / 100` per frame).
    pub speed: f64,
    /// Arc length of each draw or gap phase.
    pub dash_len: f64,
    pub stroke: StrokeStyle,
    /// Offset added to every path point.
    pub margin: Vec2,
    /// Only used when frames are encoded to video.
    pub fps: u32,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            speed: 3.0,
            dash_len: 7.0,
            stroke: StrokeStyle::default(),
            margin: Vec2::ZERO,
            fps: 30,
        }
    }
}

impl TraceConfig {
    pub fn viewport(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn validate(&self) -> TraceResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TraceError::config("viewport width/height must be non-zero"));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(TraceError::config(format!(
                "speed must be a positive number, got {}",
                self.speed
            )));
        }
        if !self.dash_len.is_finite() || self.dash_len <= 0.0 {
            return Err(TraceError::config(format!(
                "dash length must be a positive number, got {}",
                self.dash_len
            )));
        }
        if !self.stroke.width.is_finite() || self.stroke.width <= 0.0 {
            return Err(TraceError::config("stroke width must be positive"));
        }
        if !self.margin.x.is_finite() || !self.margin.y.is_finite() {
            return Err(TraceError::config("margin must be finite"));
        }
        if self.fps == 0 {
            return Err(TraceError::config("fps must be non-zero"));
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> TraceResult<Self> {
        serde_json::from_str(s).map_err(|e| TraceError::config(format!("parse config JSON: {e}")))
    }
}
