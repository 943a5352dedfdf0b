use crate::{
    assets::background::BackgroundImage,
    config::StrokeStyle,
    foundation::{
        core::{Line, Point, Rect, Size},
        error::{TraceError, TraceResult},
    },
    render::composite::over_in_place,
};

/// The shared raster the walk is painted onto. Premultiplied RGBA8, row-major.
///
/// Strokes accumulate across frames; nothing is ever cleared.
#[derive(Clone, Debug)]
pub struct Canvas {
    size: Size,
    data: Vec<u8>,
}

impl Canvas {
    /// A fully transparent canvas.
    pub fn new(size: Size) -> TraceResult<Self> {
        if size.width == 0 || size.height == 0 {
            return Err(TraceError::render("canvas width/height must be non-zero"));
        }
        Ok(Self {
            size,
            data: vec![0u8; size.area() * 4],
        })
    }

    /// A canvas with `background` copied in at the origin. Anything outside it is transparent.
    pub fn with_background(size: Size, background: &BackgroundImage) -> TraceResult<Self> {
        let mut canvas = Self::new(size)?;
        background.check()?;

        let copy_w = background.width.min(size.width) as usize;
        let copy_h = background.height.min(size.height) as usize;
        let src_stride = background.width as usize * 4;
        let dst_stride = size.width as usize * 4;
        for row in 0..copy_h {
            let src = &background.rgba8_premul[row * src_stride..row * src_stride + copy_w * 4];
            let dst = &mut canvas.data[row * dst_stride..row * dst_stride + copy_w * 4];
            dst.copy_from_slice(src);
        }
        Ok(canvas)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = (y as usize * self.size.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Stroke `lines` with `style` and composite the result source-over onto the canvas.
    ///
    /// Only the region touched by the strokes is rasterized.
    pub fn stroke_lines(&mut self, lines: &[Line], style: &StrokeStyle) -> TraceResult<()> {
        let Some(region) = self.dirty_region(lines, style.width) else {
            return Ok(());
        };
        let (x0, y0, w, h) = region;
        let w16: u16 = w
            .try_into()
            .map_err(|_| TraceError::render("stroke region width exceeds u16"))?;
        let h16: u16 = h
            .try_into()
            .map_err(|_| TraceError::render("stroke region height exceeds u16"))?;

        let mut path = vello_cpu::kurbo::BezPath::new();
        for line in lines {
            path.move_to(point_to_cpu(line.p0));
            path.line_to(point_to_cpu(line.p1));
        }

        let [r, g, b, a] = style.color;
        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            -f64::from(x0),
            -f64::from(y0),
        )));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(style.width)
                .with_caps(vello_cpu::kurbo::Cap::Round)
                .with_join(vello_cpu::kurbo::Join::Round),
        );
        ctx.stroke_path(&path);
        ctx.flush();

        let mut layer = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut layer);

        let src = layer.data_as_u8_slice();
        let src_stride = w as usize * 4;
        let dst_stride = self.size.width as usize * 4;
        for row in 0..h as usize {
            let src_row = &src[row * src_stride..(row + 1) * src_stride];
            let dst_start = (y0 as usize + row) * dst_stride + x0 as usize * 4;
            over_in_place(&mut self.data[dst_start..dst_start + src_stride], src_row)?;
        }
        Ok(())
    }

    /// Pixel region `(x0, y0, width, height)` covering `lines` stroked at `stroke_width`,
    /// clipped to the canvas.
    fn dirty_region(&self, lines: &[Line], stroke_width: f64) -> Option<(u32, u32, u32, u32)> {
        let bbox = lines
            .iter()
            .map(|l| Rect::from_points(l.p0, l.p1))
            .reduce(|a, b| a.union(b))?;
        let pad = stroke_width / 2.0 + 1.0;
        let canvas_rect = Rect::new(
            0.0,
            0.0,
            f64::from(self.size.width),
            f64::from(self.size.height),
        );
        let clipped = bbox.inflate(pad, pad).intersect(canvas_rect);
        if !clipped.is_finite() {
            return None;
        }

        let x0 = clipped.x0.floor().max(0.0) as u32;
        let y0 = clipped.y0.floor().max(0.0) as u32;
        let x1 = (clipped.x1.ceil() as u32).min(self.size.width);
        let y1 = (clipped.y1.ceil() as u32).min(self.size.height);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0, y0, x1 - x0, y1 - y0))
    }
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}
