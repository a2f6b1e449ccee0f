// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019, 2020 The `image-rs` developers
//! # Texel
//!
//! Aligned memory blocks and row strided layouts for pixel surfaces.
//!
//! This library is strictly `no_std`. It provides the two pieces a surface needs before any color
//! gets involved:
//!
//! - An [`AlignedBuffer`], an owned block of bytes whose first byte sits on a caller chosen
//!   alignment, handed out by a [`MemoryProvider`] and freed exactly once on drop.
//! - A [`RowLayout`], validated dimensions with a byte stride, which translates coordinates into
//!   byte ranges of such a buffer.
//!
//! ## Usage
//!
//! ```
//! use prgba_texel::{Global, MemoryProvider, RowLayout};
//!
//! let layout = RowLayout::with_alignment(400, 300, 4, 64)?;
//! let mut buffer = Global.allocate(layout.byte_len(), 64)?;
//!
//! // Paint the first pixel of the last row white.
//! let pixel = layout.pixel(0, 299);
//! buffer.as_bytes_mut()[pixel].copy_from_slice(&[0xff; 4]);
//!
//! assert_eq!(buffer.as_bytes().as_ptr() as usize % 64, 0);
//! # Ok::<(), Box<dyn core::error::Error>>(())
//! ```
// Be std for doctests, avoids a weird warning about missing allocator.
#![cfg_attr(not(doctest), no_std)]
#![deny(unsafe_code)]
extern crate alloc;

mod buf;
mod stride;

pub use self::buf::{AlignedBuffer, AllocError, Global, Limited, MemoryProvider};
pub use self::stride::{
    checked_stride_for_width, stride_for_width, BadStrideError, RowLayout, RowSpec,
};
