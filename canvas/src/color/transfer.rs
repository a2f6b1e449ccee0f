use crate::math::{clamp01, powf};

// Used Reference: https://www.kernel.org/doc/html/v4.11/media/uapi/v4l/pixfmt-007.html
// Inputs outside the unit interval are clamped, unlike the scRGB extension.
//
// Validated in `colour_test_vectors`.
pub fn srgb_component_to_linear(val: f32) -> f32 {
    let val = clamp01(val);
    if val <= 0.04045 {
        val / 12.92
    } else {
        powf((val + 0.055) / 1.055, 2.4)
    }
}

// Used Reference: https://www.kernel.org/doc/html/v4.11/media/uapi/v4l/pixfmt-007.html#
//
// Validated in `colour_test_vectors`.
pub fn linear_component_to_srgb(val: f32) -> f32 {
    let val = clamp01(val);
    if val <= 0.0031308 {
        val * 12.92
    } else {
        // Equals `1.055 * p - 0.055`, arranged such that 1.0 maps to exactly 1.0.
        let p = powf(val, 1.0 / 2.4);
        p + 0.055 * (p - 1.0)
    }
}

#[test]
fn colour_test_vectors() {
    // # colour-science    0.4.6
    const SRGB: &[(f32, f32)] = &[
        // b = colour.EOTFS['sRGB'](a)
        (0.0, 0.0),
        (1.0, 1.0),
        (0.5, 0.21404114048223255),
        (0.25, 0.050876088171556789),
        (0.75, 0.52252155396839206),
        (0.0031308, 0.00024232198142414861),
    ];

    for (a, b) in SRGB {
        let eotf_result = srgb_component_to_linear(*a);
        let oetf_result = linear_component_to_srgb(*b);
        assert!(
            (eotf_result - *b).abs() < 1e-6,
            "sRGB failed for eotf {}: expected {}, got {}",
            a,
            b,
            eotf_result
        );
        assert!(
            (oetf_result - *a).abs() < 1e-6,
            "sRGB failed for oetf {}: expected {}, got {}",
            b,
            a,
            oetf_result
        );
    }
}

#[test]
fn clamped_domain() {
    assert_eq!(srgb_component_to_linear(-0.5), 0.0);
    assert_eq!(srgb_component_to_linear(1.5), 1.0);
    assert_eq!(linear_component_to_srgb(-0.5), 0.0);
    assert_eq!(linear_component_to_srgb(2.0), 1.0);
    assert_eq!(srgb_component_to_linear(f32::NAN), 0.0);
}

#[test]
fn monotonic_and_inverse() {
    const STEPS: u32 = 4096;

    let mut last_eo = 0.0f32;
    let mut last_oe = 0.0f32;

    for step in 0..=STEPS {
        let x = step as f32 / STEPS as f32;
        let eo = srgb_component_to_linear(x);
        let oe = linear_component_to_srgb(x);

        assert!(eo >= last_eo, "eotf decreases at {}", x);
        assert!(oe >= last_oe, "oetf decreases at {}", x);
        last_eo = eo;
        last_oe = oe;

        let back = linear_component_to_srgb(eo);
        assert!((back - x).abs() < 1e-4, "{} came back as {}", x, back);
    }
}
