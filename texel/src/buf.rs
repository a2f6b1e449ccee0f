// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019, 2020 The `image-rs` developers
use core::fmt;
use core::ops::Range;

use alloc::collections::TryReserveError;
use alloc::vec::Vec;

/// Allocates and manages raw bytes at a chosen alignment.
///
/// The backing storage is over-allocated by up to `align - 1` bytes and the logical region starts
/// at the first properly aligned byte within it. The region never moves: the backing vector is
/// allocated exactly once and never grown afterwards, so the start address stays aligned for the
/// whole lifetime of the buffer. The memory is released exactly once, when the buffer is dropped.
///
/// Construct it through a [`MemoryProvider`], usually [`Global`].
pub struct AlignedBuffer {
    /// The backing memory, including the alignment slack.
    inner: Vec<u8>,
    /// The logical bytes within `inner`.
    region: Range<usize>,
    align: usize,
}

/// Supplies aligned memory blocks.
///
/// Returning the block is done by dropping the [`AlignedBuffer`]. A provider must either return a
/// buffer of at least `size` bytes whose first byte is a multiple of `align`, or fail. Callers
/// never retry.
pub trait MemoryProvider {
    /// Request `size` bytes starting at a multiple of `align`.
    ///
    /// The contents of the returned buffer are unspecified.
    fn allocate(&self, size: usize, align: usize) -> Result<AlignedBuffer, AllocError>;
}

/// The default provider, backed by the global allocator.
#[derive(Clone, Copy, Debug, Default)]
pub struct Global;

/// A provider refusing any request above a fixed number of bytes.
///
/// Requests within the limit are forwarded to [`Global`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limited {
    /// The largest request, in bytes, that is still served.
    pub max_bytes: usize,
}

/// Error returned when an aligned block could not be provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocError {
    kind: AllocErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AllocErrorKind {
    BadAlignment,
    SizeOverflow,
    Exhausted,
}

impl AlignedBuffer {
    /// Allocate `len` bytes starting at a multiple of `align`.
    ///
    /// Fails if `align` is not a power of two, if the request does not fit into the address space
    /// or if the allocator can not satisfy it. The bytes are zero-initialized.
    pub fn new(len: usize, align: usize) -> Result<Self, AllocError> {
        if !align.is_power_of_two() {
            return Err(AllocErrorKind::BadAlignment.into());
        }

        let alloc_len = len
            .checked_add(align - 1)
            .ok_or(AllocErrorKind::SizeOverflow)?;

        let mut inner = Vec::new();
        inner.try_reserve_exact(alloc_len)?;
        // Within capacity, this does not reallocate.
        inner.resize(alloc_len, 0);

        let start = inner.as_ptr().align_offset(align);
        if start >= align {
            return Err(AllocErrorKind::BadAlignment.into());
        }

        Ok(AlignedBuffer {
            inner,
            region: start..start + len,
            align,
        })
    }

    /// The number of logical bytes.
    pub fn len(&self) -> usize {
        self.region.len()
    }

    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }

    /// The alignment the start of the buffer is guaranteed to have.
    pub fn align(&self) -> usize {
        self.align
    }

    /// Retrieve the byte capacity of the allocated storage, including alignment slack.
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.inner[self.region.clone()]
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.inner[self.region.clone()]
    }

    /// Reinterpret the bytes as a slice of plain-old-data texels.
    ///
    /// Returns `None` if the buffer alignment or length does not fit the type.
    pub fn as_texels<T: bytemuck::Pod>(&self) -> Option<&[T]> {
        bytemuck::try_cast_slice(self.as_bytes()).ok()
    }

    /// Reinterpret the bytes as a mutable slice of plain-old-data texels.
    pub fn as_texels_mut<T: bytemuck::Pod>(&mut self) -> Option<&mut [T]> {
        bytemuck::try_cast_slice_mut(self.as_bytes_mut()).ok()
    }

    /// Overwrite all logical bytes with zero.
    pub fn zero(&mut self) {
        self.as_bytes_mut().fill(0);
    }
}

impl fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len())
            .field("align", &self.align)
            .finish()
    }
}

impl MemoryProvider for Global {
    fn allocate(&self, size: usize, align: usize) -> Result<AlignedBuffer, AllocError> {
        AlignedBuffer::new(size, align)
    }
}

impl MemoryProvider for Limited {
    fn allocate(&self, size: usize, align: usize) -> Result<AlignedBuffer, AllocError> {
        if size > self.max_bytes {
            return Err(AllocError::exhausted());
        }

        Global.allocate(size, align)
    }
}

impl<P: MemoryProvider + ?Sized> MemoryProvider for &'_ P {
    fn allocate(&self, size: usize, align: usize) -> Result<AlignedBuffer, AllocError> {
        (**self).allocate(size, align)
    }
}

impl AllocError {
    /// The error a provider reports when it has no memory left for a request.
    pub fn exhausted() -> Self {
        AllocErrorKind::Exhausted.into()
    }
}

impl From<AllocErrorKind> for AllocError {
    fn from(kind: AllocErrorKind) -> Self {
        AllocError { kind }
    }
}

impl From<TryReserveError> for AllocError {
    fn from(_: TryReserveError) -> Self {
        AllocErrorKind::Exhausted.into()
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AllocErrorKind::BadAlignment => f.write_str("alignment is not a power of two"),
            AllocErrorKind::SizeOverflow => f.write_str("requested size overflows the address space"),
            AllocErrorKind::Exhausted => f.write_str("memory provider is exhausted"),
        }
    }
}

impl core::error::Error for AllocError {}
