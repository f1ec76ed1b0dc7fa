pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Flatten a straight-alpha channel value over a white backdrop.
pub(crate) fn over_white(c: u8, alpha: u8) -> u8 {
    let a = u16::from(alpha);
    (mul_div255_u16(u16::from(c), a) + mul_div255_u16(255, 255 - a)).min(255) as u8
}

/// Linear interpolation between two channel values, `t` in `[0, 1]`.
pub(crate) fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
    let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
    v.round().clamp(0.0, 255.0) as u8
}
