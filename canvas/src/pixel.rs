//! Bit-exact packing of colors into 8-bit-per-channel pixels.
use crate::bits::{self, ChannelBits};
use crate::color::{
    linear_to_srgb, srgb_component_to_linear, unpremultiply, ColorPrgba, ColorSrgb,
};
use crate::lut::SrgbLut;
use crate::math::{clamp01, u8_to_unit, unit_to_u8};

/// Identifies a pixel representation in memory.
///
/// The 32-bit formats store one `u32` word per pixel in native byte order. `Argb` and `Rgba` name
/// the logical position of each channel within that word, from the most significant byte down:
/// in `Argb32Premul` alpha occupies bits `24..32` and blue bits `0..8`. This is independent of the
/// byte order in which the word ends up in memory.
///
/// All formats store gamma-encoded sRGB samples. The premultiplied formats multiply the sRGB
/// samples by alpha, which is the convention of the widely used premultiplied 8-bit formats (and
/// not a multiplication in linear light).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelFormat {
    /// Alpha in the high byte, sRGB channels premultiplied.
    Argb32Premul,
    /// Alpha in the low byte, sRGB channels premultiplied.
    Rgba32Premul,
    /// Alpha in the high byte, straight alpha.
    Argb32,
    /// Alpha in the low byte, straight alpha.
    Rgba32,
    /// Three bytes `[r, g, b]` of opaque sRGB, without any alpha.
    ///
    /// As a word this is the low three bytes of `Argb32`, the alpha lane is ignored on packing and
    /// reads as opaque. In memory the word is stored most significant byte first, independent of
    /// the native byte order.
    Rgb24,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 5] = [
        PixelFormat::Argb32Premul,
        PixelFormat::Rgba32Premul,
        PixelFormat::Argb32,
        PixelFormat::Rgba32,
        PixelFormat::Rgb24,
    ];

    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb24 => 3,
            _ => 4,
        }
    }

    /// The alignment of the buffer start and of row strides chosen by default for surfaces.
    pub const fn default_alignment(self) -> usize {
        match self {
            PixelFormat::Rgb24 => 4,
            _ => 64,
        }
    }

    pub const fn is_premultiplied(self) -> bool {
        matches!(self, PixelFormat::Argb32Premul | PixelFormat::Rgba32Premul)
    }

    pub const fn has_alpha(self) -> bool {
        !matches!(self, PixelFormat::Rgb24)
    }

    fn channel_bits(self) -> &'static ChannelBits {
        match self {
            PixelFormat::Argb32Premul | PixelFormat::Argb32 | PixelFormat::Rgb24 => &bits::ARGB,
            PixelFormat::Rgba32Premul | PixelFormat::Rgba32 => &bits::RGBA,
        }
    }

    fn pack_channels(self, channels: [u8; 4]) -> u32 {
        let mut word = bits::pack_u8(self.channel_bits(), channels);
        if !self.has_alpha() {
            word &= 0x00ff_ffff;
        }
        word
    }

    fn unpack_channels(self, word: u32) -> [u8; 4] {
        let mut channels = bits::unpack_u8(self.channel_bits(), word);
        if !self.has_alpha() {
            channels[3] = u8::MAX;
        }
        channels
    }

    /// Pack a premultiplied linear color, premultiplying again in 8-bit sRGB.
    ///
    /// The color is unpremultiplied and encoded to sRGB first. Each sample is then stored as
    /// `round(srgb * alpha * 255)`, alpha as `round(alpha * 255)`. Colors with an alpha at or below
    /// `1/255` are stored as transparent black.
    pub fn pack_premul(self, color: ColorPrgba) -> u32 {
        let srgb = linear_to_srgb(unpremultiply(color));
        let alpha = srgb.a;

        let [r, g, b] = [srgb.r, srgb.g, srgb.b].map(|ch| unit_to_u8(clamp01(ch) * alpha));
        self.pack_channels([r, g, b, unit_to_u8(alpha)])
    }

    /// Unpack a word with sRGB samples premultiplied by alpha.
    ///
    /// Undoes the premultiplication in sRGB, decodes to linear light and premultiplies again in
    /// linear light. The round-trip with [`Self::pack_premul`] only loses the 8-bit quantization.
    pub fn unpack_premul(self, word: u32) -> ColorPrgba {
        let [r, g, b, a] = self.unpack_channels(word).map(u8_to_unit);
        let [r, g, b] = Self::straighten([r, g, b], a).map(srgb_component_to_linear);

        ColorPrgba {
            r: r * a,
            g: g * a,
            b: b * a,
            a,
        }
    }

    /// Like [`Self::unpack_premul`] but decodes through a lookup table.
    ///
    /// The straight sRGB samples are quantized to 8 bits again before the lookup. This is a
    /// slightly different rounding than the exact path, the results differ by less than a step of
    /// 8-bit storage but are not bit-identical.
    pub fn unpack_premul_lut(self, word: u32, lut: &SrgbLut) -> ColorPrgba {
        let [r, g, b, a] = self.unpack_channels(word).map(u8_to_unit);
        let [r, g, b] = Self::straighten([r, g, b], a).map(|ch| lut.decode(unit_to_u8(ch)));

        ColorPrgba {
            r: r * a,
            g: g * a,
            b: b * a,
            a,
        }
    }

    /// Pack gamma-encoded straight samples, without any conversion.
    pub fn pack_straight(self, color: ColorSrgb) -> u32 {
        self.pack_channels(color.to_array().map(|ch| unit_to_u8(clamp01(ch))))
    }

    pub fn unpack_straight(self, word: u32) -> ColorSrgb {
        ColorSrgb::from_array(self.unpack_channels(word).map(u8_to_unit))
    }

    fn straighten(rgb: [f32; 3], a: f32) -> [f32; 3] {
        if a > 0.0 {
            rgb.map(|ch| clamp01(ch / a))
        } else {
            [0.0; 3]
        }
    }

    /// The bytes of a word in memory.
    ///
    /// The 32-bit formats store the word in native byte order. `Rgb24` stores the low three bytes
    /// most significant first, that is `[r, g, b]`. Only the first [`Self::bytes_per_pixel`] bytes
    /// of the result are meaningful.
    pub fn word_to_bytes(self, word: u32) -> [u8; 4] {
        match self {
            PixelFormat::Rgb24 => {
                let [_, r, g, b] = word.to_be_bytes();
                [r, g, b, 0]
            }
            _ => word.to_ne_bytes(),
        }
    }

    /// The word stored in the bytes of one pixel, the inverse of [`Self::word_to_bytes`].
    ///
    /// # Panics
    ///
    /// If `bytes` is shorter than [`Self::bytes_per_pixel`].
    pub fn word_from_bytes(self, bytes: &[u8]) -> u32 {
        match self {
            PixelFormat::Rgb24 => u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]),
            _ => bytemuck::pod_read_unaligned(&bytes[..4]),
        }
    }

    /// Encode a color into the bytes of one pixel in memory.
    ///
    /// Only the first [`Self::bytes_per_pixel`] bytes of the result are meaningful.
    pub fn encode(self, color: ColorPrgba) -> [u8; 4] {
        let word = if self.is_premultiplied() {
            self.pack_premul(color)
        } else {
            self.pack_straight(color.to_srgb())
        };

        self.word_to_bytes(word)
    }

    /// Decode the bytes of one pixel in memory.
    ///
    /// # Panics
    ///
    /// If `bytes` is shorter than [`Self::bytes_per_pixel`].
    pub fn load(self, bytes: &[u8]) -> ColorPrgba {
        let word = self.word_from_bytes(bytes);

        if self.is_premultiplied() {
            self.unpack_premul(word)
        } else {
            self.unpack_straight(word).to_prgba()
        }
    }

    /// Decode the bytes of one pixel, with the lookup table replacing the transfer function.
    pub fn load_with_lut(self, bytes: &[u8], lut: &SrgbLut) -> ColorPrgba {
        let word = self.word_from_bytes(bytes);

        if self.is_premultiplied() {
            return self.unpack_premul_lut(word, lut);
        }

        let [r, g, b, a] = self.unpack_channels(word);
        let a = u8_to_unit(a);
        ColorPrgba::new(lut.decode(r) * a, lut.decode(g) * a, lut.decode(b) * a, a)
    }

    /// Encode a color into the bytes of one pixel in memory.
    ///
    /// # Panics
    ///
    /// If `bytes` is not exactly [`Self::bytes_per_pixel`] long.
    pub fn store(self, bytes: &mut [u8], color: ColorPrgba) {
        let encoded = self.encode(color);
        bytes.copy_from_slice(&encoded[..self.bytes_per_pixel()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{premultiply, srgb_to_linear, ColorLinear};

    fn lanes(word: u32) -> [u8; 4] {
        word.to_be_bytes()
    }

    #[test]
    fn mid_gray_is_srgb_encoded() {
        let gray = ColorPrgba::new(0.5, 0.5, 0.5, 1.0);
        let word = PixelFormat::Argb32Premul.pack_premul(gray);
        // round(srgb(0.5) * 255) = round(187.52), not the 128 of a plain linear scale.
        assert_eq!(word, 0xffbc_bcbc);
        assert_eq!(PixelFormat::Rgba32Premul.pack_premul(gray), 0xbcbc_bcff);
    }

    #[test]
    fn premultiplied_in_srgb() {
        // 50% opaque sRGB red, as a premultiplied linear color.
        let red = premultiply(srgb_to_linear(ColorSrgb::new(1.0, 0.0, 0.0, 0.5)));
        let word = PixelFormat::Argb32Premul.pack_premul(red);
        assert_eq!(lanes(word), [128, 128, 0, 0]);

        let word = PixelFormat::Rgba32Premul.pack_premul(red);
        assert_eq!(lanes(word), [128, 0, 0, 128]);
    }

    #[test]
    fn transparent_packs_to_zero() {
        let faint = ColorPrgba::new(0.001, 0.001, 0.001, 0.001);
        assert_eq!(PixelFormat::Argb32Premul.pack_premul(faint), 0);
        assert_eq!(PixelFormat::Argb32Premul.pack_premul(ColorPrgba::TRANSPARENT), 0);
        assert_eq!(
            PixelFormat::Argb32Premul.unpack_premul(0x0000_0000),
            ColorPrgba::TRANSPARENT
        );
    }

    #[test]
    fn premul_round_trip() {
        for format in [PixelFormat::Argb32Premul, PixelFormat::Rgba32Premul] {
            // An alpha of one step is exactly `1/255`, at the transparency floor. Such pixels
            // unpack to a faint color but repack as transparent black.
            for r in [0u8, 1] {
                let word = format.pack_channels([r, 0, r, 1]);
                assert_eq!(format.pack_premul(format.unpack_premul(word)), 0);
            }

            for a in [2u8, 17, 128, 200, 254, 255] {
                for r in (0..=a).step_by(7) {
                    let word = format.pack_channels([r, a / 2, a, a]);
                    let color = format.unpack_premul(word);

                    assert!(color.r <= color.a && color.g <= color.a && color.b <= color.a);
                    assert_eq!(format.pack_premul(color), word, "{:?} {:08x}", format, word);
                }
            }
        }
    }

    #[test]
    fn straight_round_trip() {
        for format in [PixelFormat::Argb32, PixelFormat::Rgba32] {
            for val in (0..=255u8).step_by(3) {
                let channels = [val, 255 - val, val / 2, val ^ 0x55];
                let color = ColorSrgb::from_array(channels.map(u8_to_unit));

                let word = format.pack_straight(color);
                let back = format.unpack_straight(word);

                for (lhs, rhs) in back.to_array().iter().zip(color.to_array()) {
                    assert!((lhs - rhs).abs() <= 1.0 / 255.0);
                }
                assert_eq!(format.unpack_channels(word), channels);
            }
        }
    }

    #[test]
    fn straight_layouts() {
        let color = ColorSrgb::new(1.0, 0.0, 0.2, 0.6);
        assert_eq!(PixelFormat::Argb32.pack_straight(color), 0x99ff_0033);
        assert_eq!(PixelFormat::Rgba32.pack_straight(color), 0xff00_3399);
        // No alpha lane, reads as opaque.
        assert_eq!(PixelFormat::Rgb24.pack_straight(color), 0x00ff_0033);
        assert_eq!(PixelFormat::Rgb24.unpack_straight(0x00ff_0033).a, 1.0);
        // Out of range is clamped, not wrapped.
        let wild = ColorSrgb::new(2.0, -1.0, 0.5, f32::NAN);
        assert_eq!(PixelFormat::Rgba32.pack_straight(wild), 0xff00_8000);
    }

    #[test]
    fn lut_is_indistinguishable() {
        let lut = SrgbLut::new();
        let format = PixelFormat::Argb32Premul;

        for a in [3u8, 50, 100, 180, 254, 255] {
            for r in 0..=a {
                let word = format.pack_channels([r, r / 3, a - r, a]);
                let exact = format.unpack_premul(word);
                let fast = format.unpack_premul_lut(word, &lut);

                for (lhs, rhs) in exact.to_array().iter().zip(fast.to_array()) {
                    assert!((lhs - rhs).abs() <= 1.5 / 255.0, "{:08x}", word);
                }

                let repacked = lanes(format.pack_premul(fast));
                for (lhs, rhs) in repacked.iter().zip(lanes(word)) {
                    assert!(lhs.abs_diff(rhs) <= 1, "{:08x}", word);
                }
            }
        }
    }

    #[test]
    fn memory_access() {
        let lut = SrgbLut::new();
        let color = ColorLinear::new(0.2, 0.4, 0.8, 0.75).premultiply();

        for format in PixelFormat::ALL {
            let mut bytes = [0u8; 4];
            let bytes = &mut bytes[..format.bytes_per_pixel()];
            format.store(bytes, color);

            let exact = format.load(bytes);
            let fast = format.load_with_lut(bytes, &lut);
            for (lhs, rhs) in exact.to_array().iter().zip(fast.to_array()) {
                assert!((lhs - rhs).abs() <= 1.5 / 255.0, "{:?}", format);
            }

            let expected_alpha = if format.has_alpha() { 0.75 } else { 1.0 };
            assert!((exact.a - expected_alpha).abs() < 1.0 / 255.0, "{:?}", format);
        }

        let mut bytes = [0u8; 4];
        PixelFormat::Rgba32Premul.store(&mut bytes, ColorPrgba::WHITE);
        assert_eq!(u32::from_ne_bytes(bytes), 0xffff_ffff);
        PixelFormat::Rgb24.store(&mut bytes[..3], ColorPrgba::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(&bytes[..3], &[255, 0, 0]);
    }

    #[test]
    fn memory_agrees_with_words() {
        let color = ColorSrgb::new(1.0, 0.0, 0.2, 0.6);

        for format in PixelFormat::ALL {
            let bpp = format.bytes_per_pixel();
            let mut bytes = [0u8; 4];
            format.store(&mut bytes[..bpp], color.to_prgba());

            let word = if format.is_premultiplied() {
                format.pack_premul(color.to_prgba())
            } else {
                format.pack_straight(color)
            };

            assert_eq!(bytes[..bpp], format.word_to_bytes(word)[..bpp], "{:?}", format);
            assert_eq!(format.word_from_bytes(&bytes[..bpp]), word, "{:?}", format);

            // Red and blue in their own lanes, for premultiplied formats too.
            let lanes = format.unpack_straight(format.word_from_bytes(&bytes[..bpp]));
            assert!(lanes.r > lanes.b, "{:?}", format);
            assert_eq!(lanes.g, 0.0, "{:?}", format);
        }

        let mut bytes = [0u8; 3];
        PixelFormat::Rgb24.store(&mut bytes, color.to_prgba());
        assert_eq!(bytes, [0xff, 0x00, 0x33]);
        assert_eq!(PixelFormat::Rgb24.word_from_bytes(&bytes), 0x00ff_0033);
    }

    #[test]
    fn lut_load_of_straight_formats_is_exact() {
        let lut = SrgbLut::new();

        for format in [PixelFormat::Argb32, PixelFormat::Rgba32, PixelFormat::Rgb24] {
            for val in (0..=255u8).step_by(5) {
                let word = format.pack_channels([val, 255 - val, val / 2, 255]);
                let bytes = format.word_to_bytes(word);
                let bytes = &bytes[..format.bytes_per_pixel()];

                assert_eq!(format.load_with_lut(bytes, &lut), format.load(bytes), "{:?}", format);
            }
        }
    }
}
