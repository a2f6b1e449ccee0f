//! Color-accurate conversion between sRGB, linear light and packed 8-bit pixels.
//!
//! Colors are blended, interpolated and averaged as [`ColorPrgba`], premultiplied alpha in linear
//! light. At the boundaries they are either gamma-encoded [`ColorSrgb`] or packed into one of the
//! [`PixelFormat`]s, where premultiplication happens on 8-bit sRGB samples.
//!
//! # Usage
//!
//! Packing a color for a premultiplied 32-bit surface. Half the light is not half the sRGB
//! sample value:
//!
//! ```
//! use prgba_canvas::{ColorPrgba, ColorSrgb, PixelFormat};
//!
//! let gray = ColorPrgba::new(0.5, 0.5, 0.5, 1.0);
//! assert_eq!(PixelFormat::Argb32Premul.pack_premul(gray), 0xffbcbcbc);
//!
//! let gray = ColorSrgb::new(0.5, 0.5, 0.5, 1.0).to_prgba();
//! assert_eq!(PixelFormat::Argb32Premul.pack_premul(gray), 0xff808080);
//! ```
//!
//! Painting into a surface and shrinking it:
//!
//! ```
//! use prgba_canvas::{ColorPrgba, PixelFormat, Surface};
//!
//! let mut surface = Surface::new(33, 17, PixelFormat::Rgba32Premul)?;
//! surface.clear(ColorPrgba::WHITE);
//! surface.over_rect(4, 4, 8, 8, ColorPrgba::new(0.0, 0.0, 0.25, 0.5));
//!
//! let half = surface.half_size()?;
//! assert_eq!((half.width(), half.height()), (17, 9));
//! # use prgba_canvas::SurfaceError;
//! # Ok::<(), SurfaceError>(())
//! ```
#![deny(unsafe_code)]

mod bits;
/// Color types and the conversions between them.
pub mod color;
mod lut;
mod math;
/// Packing of colors into pixels.
mod pixel;
/// Buffers of pixels.
mod surface;


pub use self::color::{ColorLinear, ColorPrgba, ColorSrgb};
pub use self::lut::SrgbLut;
pub use self::pixel::PixelFormat;
pub use self::surface::{
    downsample_2x, fill_span, over_span, Surface, SurfaceError, SurfaceMut, SurfaceOptions,
    SurfaceRef,
};

pub use prgba_texel::{Global, Limited, MemoryProvider};
