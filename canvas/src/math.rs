/// Equivalent to `f32::powf` but suitable on `no_std`.
#[inline]
pub(crate) fn powf(base: f32, exp: f32) -> f32 {
    libm::powf(base, exp)
}

/// Clamp into `[0, 1]`, mapping NaN to zero.
#[inline]
pub(crate) fn clamp01(val: f32) -> f32 {
    if val > 0.0 {
        val.min(1.0)
    } else {
        0.0
    }
}

/// Quantize a unit value to 8 bits, rounding half up.
#[inline]
pub(crate) fn unit_to_u8(val: f32) -> u8 {
    let scaled = libm::floorf(val * 255.0 + 0.5);
    // Saturating, and NaN becomes 0.
    scaled as u8
}

/// Expand an 8-bit sample to a unit value.
#[inline]
pub(crate) fn u8_to_unit(val: u8) -> f32 {
    f32::from(val) / 255.0
}

#[test]
fn quantization() {
    assert_eq!(unit_to_u8(0.0), 0);
    assert_eq!(unit_to_u8(1.0), 255);
    assert_eq!(unit_to_u8(-3.0), 0);
    assert_eq!(unit_to_u8(7.0), 255);
    assert_eq!(unit_to_u8(f32::NAN), 0);
    // 0.5 * 255 = 127.5 rounds up.
    assert_eq!(unit_to_u8(0.5), 128);

    for val in 0..=255u8 {
        assert_eq!(unit_to_u8(u8_to_unit(val)), val);
    }

    assert_eq!(clamp01(f32::NAN), 0.0);
    assert_eq!(clamp01(2.0), 1.0);
    assert_eq!(clamp01(-0.5), 0.0);
}
