mod transfer;

use crate::math::clamp01;

pub use self::transfer::{linear_component_to_srgb, srgb_component_to_linear};

macro_rules! color_type {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, Default, PartialEq)]
        #[repr(C)]
        pub struct $name {
            pub r: f32,
            pub g: f32,
            pub b: f32,
            pub a: f32,
        }

        impl $name {
            pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
            pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
            pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

            pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
                $name { r, g, b, a }
            }

            /// Interpret the array as `[r, g, b, a]`.
            pub const fn from_array([r, g, b, a]: [f32; 4]) -> Self {
                $name { r, g, b, a }
            }

            pub const fn to_array(self) -> [f32; 4] {
                [self.r, self.g, self.b, self.a]
            }
        }

        impl From<[f32; 4]> for $name {
            fn from(value: [f32; 4]) -> Self {
                Self::from_array(value)
            }
        }

        impl From<$name> for [f32; 4] {
            fn from(value: $name) -> Self {
                value.to_array()
            }
        }
    };
}

color_type! {
    /// A gamma-encoded sRGB color with straight alpha.
    ///
    /// This is the representation of storage and display. Channels are nominally in `[0, 1]`;
    /// values outside are tolerated and clamped whenever the color is converted.
    ColorSrgb
}

color_type! {
    /// A linear-light Rec.709 color with straight alpha.
    ColorLinear
}

color_type! {
    /// A linear-light Rec.709 color with premultiplied alpha.
    ///
    /// The color channels are scaled by alpha, `a` itself is kept as is. All values produced by
    /// this crate keep `r, g, b <= a`. This is the only representation in which both linear
    /// interpolation and alpha compositing are correct, so all blending happens here. The other
    /// two representations only occur at the boundary, when colors are read from or written to
    /// storage.
    ColorPrgba
}

/// Decode the sRGB transfer function of the color channels.
///
/// Alpha has no transfer curve, it is only clamped.
pub fn srgb_to_linear(color: ColorSrgb) -> ColorLinear {
    ColorLinear {
        r: srgb_component_to_linear(color.r),
        g: srgb_component_to_linear(color.g),
        b: srgb_component_to_linear(color.b),
        a: clamp01(color.a),
    }
}

/// Encode linear color channels with the sRGB transfer function.
pub fn linear_to_srgb(color: ColorLinear) -> ColorSrgb {
    ColorSrgb {
        r: linear_component_to_srgb(color.r),
        g: linear_component_to_srgb(color.g),
        b: linear_component_to_srgb(color.b),
        a: clamp01(color.a),
    }
}

pub fn premultiply(color: ColorLinear) -> ColorPrgba {
    let a = clamp01(color.a);
    ColorPrgba {
        r: color.r * a,
        g: color.g * a,
        b: color.b * a,
        a,
    }
}

/// Divide the color channels by alpha.
///
/// An alpha at or below one 8-bit step, `1/255`, is below the precision of any 8-bit source. Such
/// a pixel is treated as fully transparent and the result is exactly [`ColorLinear::TRANSPARENT`].
pub fn unpremultiply(color: ColorPrgba) -> ColorLinear {
    let a = clamp01(color.a);
    if a <= 1.0 / 255.0 {
        return ColorLinear::TRANSPARENT;
    }

    ColorLinear {
        r: color.r / a,
        g: color.g / a,
        b: color.b / a,
        a,
    }
}

/// Relative luminance with Rec.709 coefficients.
///
/// Meant for comparing colors, not for converting them.
pub fn relative_luminance(color: ColorLinear) -> f32 {
    0.2126 * color.r + 0.7152 * color.g + 0.0722 * color.b
}

/// Squared Euclidean distance of the color channels, ignoring alpha.
pub fn color_distance_sq(lhs: ColorLinear, rhs: ColorLinear) -> f32 {
    let [dr, dg, db] = [lhs.r - rhs.r, lhs.g - rhs.g, lhs.b - rhs.b];
    dr * dr + dg * dg + db * db
}

pub fn luminance_diff(lhs: ColorLinear, rhs: ColorLinear) -> f32 {
    (relative_luminance(lhs) - relative_luminance(rhs)).abs()
}

/// Interpolate all four channels, `t = 0` yields `from` and `t = 1` yields `to`.
pub fn lerp(from: ColorPrgba, to: ColorPrgba, t: f32) -> ColorPrgba {
    let s = 1.0 - t;
    ColorPrgba {
        r: from.r * s + to.r * t,
        g: from.g * s + to.g * t,
        b: from.b * s + to.b * t,
        a: from.a * s + to.a * t,
    }
}

/// The Porter-Duff _source over destination_ operator.
pub fn over(src: ColorPrgba, dst: ColorPrgba) -> ColorPrgba {
    let keep = 1.0 - clamp01(src.a);
    ColorPrgba {
        r: src.r + keep * dst.r,
        g: src.g + keep * dst.g,
        b: src.b + keep * dst.b,
        a: src.a + keep * dst.a,
    }
}

impl ColorSrgb {
    pub fn to_linear(self) -> ColorLinear {
        srgb_to_linear(self)
    }

    /// Decode and premultiply, the usual way into the blending space.
    pub fn to_prgba(self) -> ColorPrgba {
        premultiply(srgb_to_linear(self))
    }
}

impl ColorLinear {
    pub fn to_srgb(self) -> ColorSrgb {
        linear_to_srgb(self)
    }

    pub fn premultiply(self) -> ColorPrgba {
        premultiply(self)
    }

    pub fn luminance(self) -> f32 {
        relative_luminance(self)
    }
}

impl ColorPrgba {
    pub fn unpremultiply(self) -> ColorLinear {
        unpremultiply(self)
    }

    /// Unpremultiply and encode, the usual way out of the blending space.
    pub fn to_srgb(self) -> ColorSrgb {
        linear_to_srgb(unpremultiply(self))
    }

    /// Place this color over `dst`.
    pub fn over(self, dst: ColorPrgba) -> ColorPrgba {
        over(self, dst)
    }

    pub fn lerp(self, to: ColorPrgba, t: f32) -> ColorPrgba {
        lerp(self, to, t)
    }

    /// Multiply all four channels, premultiplied colors stay consistent under this.
    pub fn scale(self, factor: f32) -> ColorPrgba {
        ColorPrgba {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a * factor,
        }
    }
}

impl core::ops::Add for ColorPrgba {
    type Output = ColorPrgba;

    fn add(self, other: ColorPrgba) -> ColorPrgba {
        ColorPrgba {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
            a: self.a + other.a,
        }
    }
}
