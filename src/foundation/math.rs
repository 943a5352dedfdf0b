pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

pub(crate) fn premul_rgba8(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    let a16 = u16::from(a);
    [
        mul_div255_u8(u16::from(r), a16),
        mul_div255_u8(u16::from(g), a16),
        mul_div255_u8(u16::from(b), a16),
        a,
    ]
}

pub(crate) fn unpremul_rgba8(px: [u8; 4]) -> [u8; 4] {
    let a = px[3];
    match a {
        0 => [0, 0, 0, 0],
        255 => px,
        _ => {
            let a32 = u32::from(a);
            let un = |c: u8| -> u8 { ((u32::from(c) * 255 + a32 / 2) / a32).min(255) as u8 };
            [un(px[0]), un(px[1]), un(px[2]), a]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div255_rounds_to_nearest() {
        assert_eq!(mul_div255_u16(255, 255), 255);
        assert_eq!(mul_div255_u16(128, 255), 128);
        assert_eq!(mul_div255_u16(255, 128), 128);
        assert_eq!(mul_div255_u8(0, 200), 0);
    }

    #[test]
    fn premul_then_unpremul_keeps_opaque_and_transparent() {
        assert_eq!(premul_rgba8(10, 20, 30, 255), [10, 20, 30, 255]);
        assert_eq!(premul_rgba8(10, 20, 30, 0), [0, 0, 0, 0]);
        assert_eq!(unpremul_rgba8([10, 20, 30, 255]), [10, 20, 30, 255]);
        assert_eq!(unpremul_rgba8([5, 5, 5, 0]), [0, 0, 0, 0]);
    }

    #[test]
    fn unpremul_half_alpha() {
        let p = premul_rgba8(200, 100, 0, 128);
        let s = unpremul_rgba8(p);
        assert!((i32::from(s[0]) - 200).abs() <= 1);
        assert!((i32::from(s[1]) - 100).abs() <= 1);
        assert_eq!(s[2], 0);
        assert_eq!(s[3], 128);
    }
}
