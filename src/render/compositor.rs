use crate::{camera::CropRect, render::FrameRGBA, render::canvas::Canvas};

/// Copy the crop rectangle out of the canvas into a new frame.
///
/// Parts of the rectangle that fall outside the canvas stay transparent.
pub fn compose(canvas: &Canvas, rect: CropRect) -> FrameRGBA {
    let (fw, fh) = (rect.width(), rect.height());
    let mut data = vec![0u8; fw as usize * fh as usize * 4];

    let size = canvas.size();
    let src_x0 = rect.x0.clamp(0, i64::from(size.width));
    let src_x1 = rect.x1.clamp(0, i64::from(size.width));
    let src_y0 = rect.y0.clamp(0, i64::from(size.height));
    let src_y1 = rect.y1.clamp(0, i64::from(size.height));

    if src_x1 > src_x0 && src_y1 > src_y0 {
        let copy_bytes = (src_x1 - src_x0) as usize * 4;
        let src_stride = size.width as usize * 4;
        let dst_stride = fw as usize * 4;
        let dst_x = (src_x0 - rect.x0) as usize * 4;
        let src = canvas.data();
        for y in src_y0..src_y1 {
            let s = y as usize * src_stride + src_x0 as usize * 4;
            let d = (y - rect.y0) as usize * dst_stride + dst_x;
            data[d..d + copy_bytes].copy_from_slice(&src[s..s + copy_bytes]);
        }
    }

    FrameRGBA {
        width: fw,
        height: fh,
        data,
        premultiplied: true,
    }
}
