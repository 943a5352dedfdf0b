pub use kurbo::{Line, Point, Rect, Vec2};

/// 1-based index of an exported frame. `FrameIndex(0)` means no frame has been produced yet.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn is_initial(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pixel dimensions of a raster region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Round half up, i.e. `floor(v + 0.5)`. Negative halves round toward positive infinity.
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}
