use std::path::Path;

use crate::foundation::{
    core::Size,
    error::{TraceError, TraceResult},
};

/// A decoded background raster, premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackgroundImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Vec<u8>,
}

impl BackgroundImage {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub(crate) fn check(&self) -> TraceResult<()> {
        if self.rgba8_premul.len() != self.size().area() * 4 {
            return Err(TraceError::input_malformed(
                "background byte length does not match width*height*4",
            ));
        }
        Ok(())
    }
}

/// Read and decode a background image file. The format is guessed from the content.
#[tracing::instrument]
pub fn load_background(path: &Path) -> TraceResult<BackgroundImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        TraceError::input_unavailable(format!("read background '{}': {e}", path.display()))
    })?;
    let img = decode_background(&bytes).map_err(|e| match e {
        TraceError::InputMalformed(msg) => {
            TraceError::input_malformed(format!("{msg} ('{}')", path.display()))
        }
        other => other,
    })?;
    tracing::info!(width = img.width, height = img.height, "loaded background");
    Ok(img)
}

pub fn decode_background(bytes: &[u8]) -> TraceResult<BackgroundImage> {
    if bytes.is_empty() {
        return Err(TraceError::input_malformed("background image is empty"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| TraceError::input_malformed(format!("decode background image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(TraceError::input_malformed("background image has no pixels"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(BackgroundImage {
        width,
        height,
        rgba8_premul,
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn decode_png_dimensions_and_premul() {
        let bytes = png_bytes(3, 2, [100, 50, 200, 128]);
        let bg = decode_background(&bytes).unwrap();
        assert_eq!(bg.size(), Size::new(3, 2));
        assert_eq!(
            &bg.rgba8_premul[..4],
            &[
                ((100u16 * 128 + 127) / 255) as u8,
                ((50u16 * 128 + 127) / 255) as u8,
                ((200u16 * 128 + 127) / 255) as u8,
                128u8
            ]
        );
        bg.check().unwrap();
    }

    #[test]
    fn undecodable_bytes_are_malformed() {
        assert!(matches!(
            decode_background(b"definitely not an image"),
            Err(TraceError::InputMalformed(_))
        ));
        assert!(matches!(
            decode_background(&[]),
            Err(TraceError::InputMalformed(_))
        ));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let err = load_background(Path::new("target/does-not-exist/background.png")).unwrap_err();
        assert!(matches!(err, TraceError::InputUnavailable(_)));
    }
}
