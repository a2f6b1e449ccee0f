// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019, 2020 The `image-rs` developers
//! Byte-based, row strided layouts of an image.
//!
//! Rows are addressed by a stride expressed in bytes, so the length of a row is independent of
//! the pixel format stored in it. Rows may be padded to satisfy an alignment for their start.
use core::fmt;
use core::ops::Range;

/// A simple layout describing some pixels as row strided bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowSpec {
    /// The number of pixels in width direction.
    pub width: usize,
    /// The number of pixels in height direction.
    pub height: usize,
    /// The number of bytes of a single pixel.
    pub bytes_per_pixel: usize,
    /// The number of bytes to go one pixel along the height.
    pub stride: usize,
}

/// A validated layout of a rectangular matrix of pixels, treated as bytes.
///
/// The invariants are that the whole layout fits into memory, that no two rows overlap, and that
/// `height * stride` bytes are addressable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowLayout {
    spec: RowSpec,
    /// The total number of bytes, as proof of calculation basically.
    total: usize,
}

/// Error that occurs when a [`RowSpec`] is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadStrideError {
    kind: BadStrideKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BadStrideKind {
    ZeroSize,
    StrideTooSmall,
    OutOfMemory,
}

/// Round the row length of `width` pixels up to a multiple of `align` bytes.
///
/// An alignment of zero is treated as one. The result is never less than `width *
/// bytes_per_pixel`.
///
/// # Panics
///
/// When the stride overflows `usize`. See [`checked_stride_for_width`].
pub fn stride_for_width(width: usize, bytes_per_pixel: usize, align: usize) -> usize {
    match checked_stride_for_width(width, bytes_per_pixel, align) {
        Some(stride) => stride,
        None => panic!("row stride overflows usize"),
    }
}

/// Like [`stride_for_width`], but returns `None` on overflow.
pub fn checked_stride_for_width(width: usize, bytes_per_pixel: usize, align: usize) -> Option<usize> {
    let align = align.max(1);
    let row = width.checked_mul(bytes_per_pixel)?;
    row.checked_next_multiple_of(align)
}

impl RowLayout {
    /// Try to create a new layout from a specification.
    ///
    /// This fails if the specification describes no pixels, if rows would overlap, or if the
    /// layout does not describe a memory size expressible on the current architecture.
    pub fn new(spec: RowSpec) -> Result<Self, BadStrideError> {
        if spec.width == 0 || spec.height == 0 || spec.bytes_per_pixel == 0 {
            return Err(BadStrideKind::ZeroSize.into());
        }

        let row = spec
            .width
            .checked_mul(spec.bytes_per_pixel)
            .ok_or(BadStrideKind::OutOfMemory)?;

        if spec.stride < row {
            return Err(BadStrideKind::StrideTooSmall.into());
        }

        let total = spec
            .stride
            .checked_mul(spec.height)
            .ok_or(BadStrideKind::OutOfMemory)?;

        if total > isize::MAX as usize {
            return Err(BadStrideKind::OutOfMemory.into());
        }

        Ok(RowLayout { spec, total })
    }

    /// Create a layout whose stride is padded to a multiple of `align` bytes.
    pub fn with_alignment(
        width: usize,
        height: usize,
        bytes_per_pixel: usize,
        align: usize,
    ) -> Result<Self, BadStrideError> {
        let stride = checked_stride_for_width(width, bytes_per_pixel, align)
            .ok_or(BadStrideKind::OutOfMemory)?;

        RowLayout::new(RowSpec {
            width,
            height,
            bytes_per_pixel,
            stride,
        })
    }

    /// Get the specification of this layout.
    pub fn spec(&self) -> RowSpec {
        self.spec
    }

    pub fn width(&self) -> usize {
        self.spec.width
    }

    pub fn height(&self) -> usize {
        self.spec.height
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.spec.bytes_per_pixel
    }

    /// The number of bytes between the start of consecutive rows.
    pub fn stride(&self) -> usize {
        self.spec.stride
    }

    /// The number of bytes a buffer must have to hold this layout, `height * stride`.
    pub fn byte_len(&self) -> usize {
        self.total
    }

    /// The bytes of row `y`, including padding.
    pub fn row(&self, y: usize) -> Range<usize> {
        let start = y * self.spec.stride;
        start..start + self.spec.stride
    }

    /// The bytes of row `y` that hold pixels, excluding padding.
    pub fn row_pixels(&self, y: usize) -> Range<usize> {
        let start = y * self.spec.stride;
        start..start + self.spec.width * self.spec.bytes_per_pixel
    }

    /// The bytes of the pixel at column `x` in row `y`.
    ///
    /// Neither coordinate is checked against the dimensions.
    pub fn pixel(&self, x: usize, y: usize) -> Range<usize> {
        let start = y * self.spec.stride + x * self.spec.bytes_per_pixel;
        start..start + self.spec.bytes_per_pixel
    }
}

impl From<BadStrideKind> for BadStrideError {
    fn from(kind: BadStrideKind) -> Self {
        BadStrideError { kind }
    }
}

impl From<&'_ RowLayout> for RowSpec {
    fn from(layout: &'_ RowLayout) -> Self {
        layout.spec()
    }
}

impl fmt::Display for BadStrideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            BadStrideKind::ZeroSize => f.write_str("layout has no pixels"),
            BadStrideKind::StrideTooSmall => f.write_str("stride is smaller than a row of pixels"),
            BadStrideKind::OutOfMemory => f.write_str("layout does not fit into memory"),
        }
    }
}

impl core::error::Error for BadStrideError {}
