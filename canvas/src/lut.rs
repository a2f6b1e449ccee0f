use std::sync::OnceLock;

use crate::color::srgb_component_to_linear;
use crate::math::u8_to_unit;

/// A table decoding 8-bit sRGB samples to linear light.
///
/// Replaces the power function in the decode path by one lookup per channel. Build one with
/// [`SrgbLut::new`] and pass it along, or use the process wide instance from [`SrgbLut::shared`].
/// The table never changes after construction.
#[derive(Clone, PartialEq)]
pub struct SrgbLut {
    table: [f32; 256],
}

static SHARED: OnceLock<SrgbLut> = OnceLock::new();

impl SrgbLut {
    pub fn new() -> Self {
        let mut table = [0.0; 256];

        for (idx, entry) in (0..=u8::MAX).zip(table.iter_mut()) {
            *entry = srgb_component_to_linear(u8_to_unit(idx));
        }

        SrgbLut { table }
    }

    /// The table shared by the whole process.
    ///
    /// Built on first use, exactly once even if several threads race for it.
    pub fn shared() -> &'static SrgbLut {
        SHARED.get_or_init(SrgbLut::new)
    }

    /// The linear value of an 8-bit sRGB sample.
    #[inline]
    pub fn decode(&self, sample: u8) -> f32 {
        self.table[usize::from(sample)]
    }

    pub fn as_slice(&self) -> &[f32; 256] {
        &self.table
    }
}

impl Default for SrgbLut {
    fn default() -> Self {
        SrgbLut::new()
    }
}

impl core::fmt::Debug for SrgbLut {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SrgbLut").finish_non_exhaustive()
    }
}
