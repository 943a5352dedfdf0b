use crate::foundation::core::{FrameIndex, Point, Size, round_half_up};

/// Integer pixel rectangle `[x0, x1) x [y0, y1)` in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl CropRect {
    pub fn width(&self) -> u32 {
        (self.x1 - self.x0).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y1 - self.y0).max(0) as u32
    }
}

/// Viewport that follows the walker's focus point over a fixed canvas.
///
/// The center is pulled toward the focus with exponential smoothing (`speed / 100` of the
/// remaining delta per frame) and kept so that the viewport stays inside the canvas. When the
/// canvas is smaller than the viewport on an axis, the viewport is pinned to the canvas origin.
#[derive(Clone, Debug)]
pub struct Camera {
    center: Point,
    frame: FrameIndex,
    viewport: Size,
    canvas: Size,
    scale: f64,
}

impl Camera {
    pub fn new(viewport: Size, canvas: Size) -> Self {
        Self {
            center: Point::new(
                f64::from(viewport.width) / 2.0,
                f64::from(viewport.height) / 2.0,
            ),
            frame: FrameIndex::default(),
            viewport,
            canvas,
            scale: 1.0,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Index of the last produced frame; `FrameIndex(0)` before the first one.
    pub fn frame(&self) -> FrameIndex {
        self.frame
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Clamp a follow target so a viewport centered on it stays inside the canvas.
    ///
    /// The lower bound is applied last and wins when the canvas is smaller than the viewport.
    pub fn clamp_target(&self, p: Point) -> Point {
        let (half_w, half_h) = self.half_viewport();
        let (cw, ch) = (f64::from(self.canvas.width), f64::from(self.canvas.height));

        let mut x = p.x;
        let mut y = p.y;
        if x + half_w > cw {
            x = cw - half_w;
        }
        if x - half_w < 0.0 {
            x = half_w;
        }
        if y + half_h > ch {
            y = ch - half_h;
        }
        if y - half_h < 0.0 {
            y = half_h;
        }
        Point::new(x, y)
    }

    /// Move the center toward the clamped focus by `speed / 100` of the remaining delta.
    ///
    /// Before the first frame the center first snaps to the focus itself.
    pub fn follow_frame(&mut self, speed: f64, focus: Point) {
        if self.frame.is_initial() {
            self.center = focus;
        }
        let target = self.clamp_target(focus);
        let factor = speed / 100.0;
        self.center += (target - self.center) * factor;
    }

    /// The center after the second clamp applied before cropping.
    pub fn clamped_center(&self) -> Point {
        let (half_w, half_h) = self.half_viewport();
        let (cw, ch) = (f64::from(self.canvas.width), f64::from(self.canvas.height));

        let mut c = self.center;
        if c.x < half_w {
            c.x = half_w;
        } else if c.x > cw - half_w {
            c.x = cw - half_w;
        }
        if c.y < half_h {
            c.y = half_h;
        } else if c.y > ch - half_h {
            c.y = ch - half_h;
        }
        c
    }

    /// Crop rectangle for the current center, rounded half up.
    pub fn crop_rect(&self) -> CropRect {
        let (half_w, half_h) = self.half_viewport();
        let c = self.clamped_center();
        CropRect {
            x0: round_half_up(c.x - half_w) as i64,
            y0: round_half_up(c.y - half_h) as i64,
            x1: round_half_up(c.x + half_w) as i64,
            y1: round_half_up(c.y + half_h) as i64,
        }
    }

    /// Account for one produced frame and return its index with the region to export.
    pub fn crop_frame(&mut self) -> (FrameIndex, CropRect) {
        self.frame = self.frame.next();
        (self.frame, self.crop_rect())
    }

    fn half_viewport(&self) -> (f64, f64) {
        (
            f64::from(self.viewport.width) / 2.0,
            f64::from(self.viewport.height) / 2.0,
        )
    }
}
