/// Specifies which bits a channel comes from, within a packed 32-bit pixel word.
///
/// Positions are logical bit indices of the `u32` value, counted from the least significant bit,
/// and independent of the byte order the word is stored in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FromBits {
    pub(crate) begin: u32,
    pub(crate) len: u32,
}

/// The bits of each channel in a word, in `[r, g, b, a]` order.
pub(crate) type ChannelBits = [FromBits; 4];

macro_rules! from_bits {
    ($($name:ident = [$r:expr, $g:expr, $b:expr, $a:expr];)*) => {
        $(
            pub(crate) const $name: ChannelBits = [
                FromBits::from_range($r),
                FromBits::from_range($g),
                FromBits::from_range($b),
                FromBits::from_range($a),
            ];
        )*
    };
}

from_bits! {
    ARGB = [16..24, 8..16, 0..8, 24..32];
    RGBA = [24..32, 16..24, 8..16, 0..8];
}

impl FromBits {
    const fn from_range(range: core::ops::Range<u32>) -> Self {
        FromBits {
            begin: range.start,
            len: range.end - range.start,
        }
    }

    /// The low `len` bits set.
    pub(crate) const fn mask(self) -> u32 {
        ((-1i64 as u64) ^ u32::MAX as u64).rotate_left(self.len) as u32
    }

    /// Extract the channel as the low bits of the result.
    #[inline]
    pub(crate) const fn extract_as_lsb(self, word: u32) -> u32 {
        (word >> self.begin) & self.mask()
    }

    /// Replace the channel bits in `word` with the low bits of `bits`.
    #[inline]
    pub(crate) const fn insert_as_lsb(self, word: u32, bits: u32) -> u32 {
        let mask = self.mask() << self.begin;
        (word & !mask) | ((bits << self.begin) & mask)
    }
}

/// Assemble a word from 8-bit channels in `[r, g, b, a]` order.
#[inline]
pub(crate) fn pack_u8(bits: &ChannelBits, channels: [u8; 4]) -> u32 {
    bits.iter()
        .zip(channels)
        .fold(0, |word, (bits, ch)| bits.insert_as_lsb(word, u32::from(ch)))
}

/// Split a word into 8-bit channels in `[r, g, b, a]` order.
#[inline]
pub(crate) fn unpack_u8(bits: &ChannelBits, word: u32) -> [u8; 4] {
    bits.map(|bits| bits.extract_as_lsb(word) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks() {
        assert_eq!(FromBits::from_range(0..8).mask(), 0xff);
        assert_eq!(FromBits::from_range(0..0).mask(), 0);
        assert_eq!(FromBits::from_range(0..32).mask(), u32::MAX);
    }

    #[test]
    fn bit_extraction() {
        let word = 0x8040_20ffu32;
        assert_eq!(unpack_u8(&ARGB, word), [0x40, 0x20, 0xff, 0x80]);
        assert_eq!(unpack_u8(&RGBA, word), [0x80, 0x40, 0x20, 0xff]);

        let bits = FromBits::from_range(1..8);
        assert_eq!(bits.extract_as_lsb(0b1000_1010), 0b100_0101);
    }

    #[test]
    fn bit_insertion() {
        assert_eq!(pack_u8(&ARGB, [0x11, 0x22, 0x33, 0x44]), 0x4411_2233);
        assert_eq!(pack_u8(&RGBA, [0x11, 0x22, 0x33, 0x44]), 0x1122_3344);

        // Only the selected bits change.
        let bits = FromBits::from_range(8..16);
        assert_eq!(bits.insert_as_lsb(0xffff_ffff, 0x00), 0xffff_00ff);
        assert_eq!(bits.insert_as_lsb(0, 0x1ab), 0x0000_ab00);
    }
}
