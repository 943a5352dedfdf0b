use crate::foundation::{
    error::{TraceError, TraceResult},
    math::mul_div255_u8,
};

pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied RGBA8.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> TraceResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(TraceError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_src_keeps_dst() {
        assert_eq!(over([1, 2, 3, 4], [0, 0, 0, 0]), [1, 2, 3, 4]);
    }

    #[test]
    fn opaque_src_replaces_dst() {
        assert_eq!(over([1, 2, 3, 255], [9, 8, 7, 255]), [9, 8, 7, 255]);
    }

    #[test]
    fn half_src_over_opaque_blends() {
        // 50% premultiplied white over opaque black.
        let out = over([0, 0, 0, 255], [128, 128, 128, 128]);
        assert_eq!(out, [128, 128, 128, 255]);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let mut dst = vec![0u8; 8];
        assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
        assert!(over_in_place(&mut dst, &[255u8; 8]).is_ok());
        assert_eq!(dst, vec![255u8; 8]);
    }
}
