//! Pixel surfaces with a byte stride, and the operations on them.
use core::fmt;
use core::ops::Range;

use prgba_texel::{AlignedBuffer, AllocError, BadStrideError, Global, MemoryProvider};
use prgba_texel::{RowLayout, RowSpec};

use crate::color::{lerp, over, ColorPrgba};
use crate::lut::SrgbLut;
use crate::math::clamp01;
use crate::pixel::PixelFormat;

/// An owned buffer of pixels.
///
/// The surface is the sole owner of its memory block, which is released exactly once when the
/// surface is dropped. Views created by [`Surface::as_ref`] and [`Surface::as_mut`] borrow it, so
/// they can not outlive it.
///
/// # Usage
///
/// ```
/// use prgba_canvas::{ColorSrgb, PixelFormat, Surface};
///
/// let mut surface = Surface::new(64, 64, PixelFormat::Argb32Premul)?;
/// surface.fill_rect(-8, -8, 32, 32, ColorSrgb::new(1.0, 0.0, 0.0, 1.0).to_prgba());
///
/// let red = surface.get_pixel(0, 0);
/// assert_eq!(red.a, 1.0);
/// # use prgba_canvas::SurfaceError;
/// # Ok::<(), SurfaceError>(())
/// ```
#[derive(Debug)]
pub struct Surface {
    buffer: AlignedBuffer,
    layout: RowLayout,
    format: PixelFormat,
    align: usize,
}

/// A borrowed, read-only view of pixels.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceRef<'data> {
    data: &'data [u8],
    layout: RowLayout,
    format: PixelFormat,
}

/// A borrowed, mutable view of pixels.
#[derive(Debug)]
pub struct SurfaceMut<'data> {
    data: &'data mut [u8],
    layout: RowLayout,
    format: PixelFormat,
}

/// Configures the allocation of a [`Surface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceOptions {
    /// Alignment in bytes of the row stride and of the buffer start.
    ///
    /// Must be a power of two, zero is treated as one. The buffer start is aligned to at least
    /// four bytes regardless.
    pub align: usize,
    /// Overwrite the memory with zero bytes, that is transparent black or black.
    pub zero_init: bool,
}

/// Error that occurs when creating or combining surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceError {
    kind: SurfaceErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceErrorKind {
    ZeroSize,
    BadAlignment,
    OutOfMemory,
    Layout,
    BufferTooSmall,
    SizeMismatch,
}

impl SurfaceOptions {
    /// The default alignment of the format, with zeroed memory.
    pub const fn for_format(format: PixelFormat) -> Self {
        SurfaceOptions {
            align: format.default_alignment(),
            zero_init: true,
        }
    }
}

impl Surface {
    /// Allocate a zeroed surface with the default alignment of its format.
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Result<Self, SurfaceError> {
        Self::with_options(width, height, format, SurfaceOptions::for_format(format))
    }

    pub fn with_options(
        width: usize,
        height: usize,
        format: PixelFormat,
        options: SurfaceOptions,
    ) -> Result<Self, SurfaceError> {
        Self::with_provider(width, height, format, options, Global)
    }

    /// Allocate a surface from a specific memory provider.
    ///
    /// Fails without any partial state if the provider can not serve the request.
    pub fn with_provider(
        width: usize,
        height: usize,
        format: PixelFormat,
        options: SurfaceOptions,
        provider: impl MemoryProvider,
    ) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceErrorKind::ZeroSize.into());
        }

        let align = options.align.max(1);
        if !align.is_power_of_two() {
            return Err(SurfaceErrorKind::BadAlignment.into());
        }

        let layout = RowLayout::with_alignment(width, height, format.bytes_per_pixel(), align)?;
        // Always at least word aligned at the start, even for a finer row alignment.
        let start = align.max(4);
        let mut buffer = provider.allocate(layout.byte_len(), start)?;

        if buffer.len() < layout.byte_len() || buffer.as_bytes().as_ptr() as usize % start != 0 {
            return Err(SurfaceErrorKind::BufferTooSmall.into());
        }

        if options.zero_init {
            buffer.zero();
        }

        Ok(Surface {
            buffer,
            layout,
            format,
            align,
        })
    }

    pub fn width(&self) -> usize {
        self.layout.width()
    }

    pub fn height(&self) -> usize {
        self.layout.height()
    }

    pub fn stride(&self) -> usize {
        self.layout.stride()
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn layout(&self) -> &RowLayout {
        &self.layout
    }

    /// The alignment the surface was created with.
    pub fn align(&self) -> usize {
        self.align
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer.as_bytes()[..self.layout.byte_len()]
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buffer.as_bytes_mut()[..self.layout.byte_len()]
    }

    pub fn as_ref(&self) -> SurfaceRef<'_> {
        SurfaceRef {
            data: &self.buffer.as_bytes()[..self.layout.byte_len()],
            layout: self.layout,
            format: self.format,
        }
    }

    pub fn as_mut(&mut self) -> SurfaceMut<'_> {
        SurfaceMut {
            data: &mut self.buffer.as_bytes_mut()[..self.layout.byte_len()],
            layout: self.layout,
            format: self.format,
        }
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.as_bytes()[self.layout.row_pixels(y)]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let range = self.layout.row_pixels(y);
        &mut self.as_bytes_mut()[range]
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> ColorPrgba {
        self.as_ref().get_pixel(x, y)
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: ColorPrgba) {
        self.as_mut().set_pixel(x, y, color)
    }

    pub fn fill_rect(&mut self, x: isize, y: isize, w: usize, h: usize, color: ColorPrgba) {
        self.as_mut().fill_rect(x, y, w, h, color)
    }

    pub fn over_rect(&mut self, x: isize, y: isize, w: usize, h: usize, color: ColorPrgba) {
        self.as_mut().over_rect(x, y, w, h, color)
    }

    pub fn clear(&mut self, color: ColorPrgba) {
        self.as_mut().clear(color)
    }

    pub fn sample_bilinear(&self, u: f32, v: f32) -> ColorPrgba {
        self.as_ref().sample_bilinear(u, v)
    }

    /// Allocate a surface of half the size, rounded up, and downsample into it.
    ///
    /// The new surface has the same format and alignment.
    pub fn half_size(&self) -> Result<Surface, SurfaceError> {
        let options = SurfaceOptions {
            align: self.align(),
            zero_init: false,
        };

        let mut half = Surface::with_options(
            self.width().div_ceil(2),
            self.height().div_ceil(2),
            self.format,
            options,
        )?;

        downsample_2x(self.as_ref(), half.as_mut())?;
        Ok(half)
    }
}

impl<'data> SurfaceRef<'data> {
    /// View caller-provided bytes as rows of pixels.
    ///
    /// The bytes must hold at least `height * stride` bytes.
    pub fn from_bytes(
        data: &'data [u8],
        width: usize,
        height: usize,
        stride: usize,
        format: PixelFormat,
    ) -> Result<Self, SurfaceError> {
        let layout = view_layout(data.len(), width, height, stride, format)?;
        Ok(SurfaceRef {
            data: &data[..layout.byte_len()],
            layout,
            format,
        })
    }

    pub fn width(&self) -> usize {
        self.layout.width()
    }

    pub fn height(&self) -> usize {
        self.layout.height()
    }

    pub fn stride(&self) -> usize {
        self.layout.stride()
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn as_bytes(&self) -> &'data [u8] {
        self.data
    }

    /// The pixel bytes of row `y`, starting at `y * stride`.
    ///
    /// # Panics
    ///
    /// If `y` is outside the surface. Callers are responsible for the bounds.
    pub fn row(&self, y: usize) -> &'data [u8] {
        &self.data[self.layout.row_pixels(y)]
    }

    /// The bytes of the pixel at `y * stride + x * bytes_per_pixel`.
    ///
    /// # Panics
    ///
    /// If the pixel lies outside the buffer. The column is not checked against the width.
    pub fn pixel(&self, x: usize, y: usize) -> &'data [u8] {
        &self.data[self.layout.pixel(x, y)]
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> ColorPrgba {
        decode(self.format, self.pixel(x, y))
    }

    /// Sample with bilinear filtering at normalized coordinates.
    ///
    /// Coordinates are clamped to `[0, 1]`, then `0` maps onto the center of the first and `1` onto
    /// the center of the last pixel. Interpolation happens in premultiplied linear light. At
    /// coordinates mapping exactly onto a pixel center the result is that pixel's color.
    pub fn sample_bilinear(&self, u: f32, v: f32) -> ColorPrgba {
        let (x0, x1, tx) = Self::neighbours(u, self.width());
        let (y0, y1, ty) = Self::neighbours(v, self.height());

        let top = lerp(self.get_pixel(x0, y0), self.get_pixel(x1, y0), tx);
        let bottom = lerp(self.get_pixel(x0, y1), self.get_pixel(x1, y1), tx);
        lerp(top, bottom, ty)
    }

    /// The two pixels around a normalized coordinate and the weight of the second.
    fn neighbours(coord: f32, len: usize) -> (usize, usize, f32) {
        let last = len - 1;
        let pos = clamp01(coord) * last as f32;
        // Non-negative, so truncation is the floor.
        let lower = (pos as usize).min(last);
        let upper = (lower + 1).min(last);
        (lower, upper, pos - lower as f32)
    }
}

impl<'data> SurfaceMut<'data> {
    /// View caller-provided mutable bytes as rows of pixels.
    pub fn from_bytes(
        data: &'data mut [u8],
        width: usize,
        height: usize,
        stride: usize,
        format: PixelFormat,
    ) -> Result<Self, SurfaceError> {
        let layout = view_layout(data.len(), width, height, stride, format)?;
        Ok(SurfaceMut {
            data: &mut data[..layout.byte_len()],
            layout,
            format,
        })
    }

    pub fn as_ref(&self) -> SurfaceRef<'_> {
        SurfaceRef {
            data: &*self.data,
            layout: self.layout,
            format: self.format,
        }
    }

    pub fn width(&self) -> usize {
        self.layout.width()
    }

    pub fn height(&self) -> usize {
        self.layout.height()
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        &mut self.data[self.layout.row_pixels(y)]
    }

    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        &mut self.data[self.layout.pixel(x, y)]
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> ColorPrgba {
        self.as_ref().get_pixel(x, y)
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: ColorPrgba) {
        let format = self.format;
        format.store(self.pixel_mut(x, y), color)
    }

    /// Fill a rectangle, clipped to the surface.
    ///
    /// A negative origin shrinks the rectangle, a rectangle outside the surface does nothing.
    pub fn fill_rect(&mut self, x: isize, y: isize, w: usize, h: usize, color: ColorPrgba) {
        self.for_each_clipped_span(x, y, w, h, |format, span, count| {
            fill_span(format, span, count, color)
        })
    }

    /// Composite a constant color over a rectangle, clipped to the surface.
    pub fn over_rect(&mut self, x: isize, y: isize, w: usize, h: usize, color: ColorPrgba) {
        self.for_each_clipped_span(x, y, w, h, |format, span, count| {
            over_span(format, color, span, count)
        })
    }

    pub fn clear(&mut self, color: ColorPrgba) {
        let (width, height) = (self.width(), self.height());
        for y in 0..height {
            let format = self.format;
            fill_span(format, self.row_mut(y), width, color);
        }
    }

    fn for_each_clipped_span(
        &mut self,
        x: isize,
        y: isize,
        w: usize,
        h: usize,
        mut span: impl FnMut(PixelFormat, &mut [u8], usize),
    ) {
        let (Some(cols), Some(rows)) = (clip(x, w, self.width()), clip(y, h, self.height())) else {
            return;
        };

        let format = self.format;
        let bpp = format.bytes_per_pixel();

        for y in rows {
            let row = self.row_mut(y);
            span(format, &mut row[cols.start * bpp..], cols.len());
        }
    }
}

/// Write the same color to the first `count` pixels of a row.
///
/// The color is encoded once.
///
/// # Panics
///
/// If the row is shorter than `count` pixels.
pub fn fill_span(format: PixelFormat, dst_row: &mut [u8], count: usize, color: ColorPrgba) {
    let bpp = format.bytes_per_pixel();
    let encoded = format.encode(color);

    for pixel in dst_row[..count * bpp].chunks_exact_mut(bpp) {
        pixel.copy_from_slice(&encoded[..bpp]);
    }
}

/// Composite a constant color over the first `count` pixels of a row.
///
/// # Panics
///
/// If the row is shorter than `count` pixels.
pub fn over_span(format: PixelFormat, src: ColorPrgba, dst_row: &mut [u8], count: usize) {
    let bpp = format.bytes_per_pixel();

    for pixel in dst_row[..count * bpp].chunks_exact_mut(bpp) {
        let dst = decode(format, pixel);
        format.store(pixel, over(src, dst));
    }
}

/// Halve a surface by averaging 2x2 blocks in premultiplied linear light.
///
/// The destination must measure `ceil(width / 2)` by `ceil(height / 2)` of the source, otherwise
/// nothing is written. For odd sizes the last row and column of the source are reused for the
/// missing half of the block.
pub fn downsample_2x(src: SurfaceRef<'_>, mut dst: SurfaceMut<'_>) -> Result<(), SurfaceError> {
    if dst.width() != src.width().div_ceil(2) || dst.height() != src.height().div_ceil(2) {
        return Err(SurfaceErrorKind::SizeMismatch.into());
    }

    let (last_x, last_y) = (src.width() - 1, src.height() - 1);

    for dy in 0..dst.height() {
        let y0 = 2 * dy;
        let y1 = (y0 + 1).min(last_y);

        for dx in 0..dst.width() {
            let x0 = 2 * dx;
            let x1 = (x0 + 1).min(last_x);

            let top = src.get_pixel(x0, y0) + src.get_pixel(x1, y0);
            let bottom = src.get_pixel(x0, y1) + src.get_pixel(x1, y1);
            dst.set_pixel(dx, dy, (top + bottom).scale(0.25));
        }
    }

    Ok(())
}

/// Decode a pixel read from a surface.
#[inline]
fn decode(format: PixelFormat, bytes: &[u8]) -> ColorPrgba {
    if cfg!(feature = "lut-decode") {
        format.load_with_lut(bytes, SrgbLut::shared())
    } else {
        format.load(bytes)
    }
}

/// Clip the interval `origin..origin + len` to `0..bound`.
fn clip(origin: isize, len: usize, bound: usize) -> Option<Range<usize>> {
    // Layouts fit in `isize`, so does the bound.
    let bound = bound as isize;
    let start = origin.clamp(0, bound);
    let end = origin.saturating_add_unsigned(len).clamp(0, bound);

    if start < end {
        Some(start as usize..end as usize)
    } else {
        None
    }
}

fn view_layout(
    available: usize,
    width: usize,
    height: usize,
    stride: usize,
    format: PixelFormat,
) -> Result<RowLayout, SurfaceError> {
    if width == 0 || height == 0 {
        return Err(SurfaceErrorKind::ZeroSize.into());
    }

    let layout = RowLayout::new(RowSpec {
        width,
        height,
        bytes_per_pixel: format.bytes_per_pixel(),
        stride,
    })?;

    if available < layout.byte_len() {
        return Err(SurfaceErrorKind::BufferTooSmall.into());
    }

    Ok(layout)
}

impl From<SurfaceErrorKind> for SurfaceError {
    fn from(kind: SurfaceErrorKind) -> Self {
        SurfaceError { kind }
    }
}

impl From<AllocError> for SurfaceError {
    fn from(_: AllocError) -> Self {
        SurfaceErrorKind::OutOfMemory.into()
    }
}

impl From<BadStrideError> for SurfaceError {
    fn from(_: BadStrideError) -> Self {
        SurfaceErrorKind::Layout.into()
    }
}

impl SurfaceError {
    /// Whether the memory provider failed to serve the allocation.
    pub fn is_out_of_memory(&self) -> bool {
        self.kind == SurfaceErrorKind::OutOfMemory
    }
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SurfaceErrorKind::ZeroSize => f.write_str("surface has zero width or height"),
            SurfaceErrorKind::BadAlignment => f.write_str("alignment is not a power of two"),
            SurfaceErrorKind::OutOfMemory => f.write_str("surface memory could not be allocated"),
            SurfaceErrorKind::Layout => f.write_str("surface layout does not fit into memory"),
            SurfaceErrorKind::BufferTooSmall => f.write_str("buffer is too small for the layout"),
            SurfaceErrorKind::SizeMismatch => f.write_str("surface dimensions do not match"),
        }
    }
}

impl core::error::Error for SurfaceError {}

#[cfg(test)]
mod tests {
    use super::*;
    use prgba_texel::Limited;

    fn kind<T>(result: Result<T, SurfaceError>) -> SurfaceErrorKind {
        match result {
            Ok(_) => panic!("expected an error"),
            Err(err) => err.kind,
        }
    }

    #[test]
    fn error_kinds() {
        use SurfaceErrorKind::*;
        let format = PixelFormat::Argb32Premul;
        let options = |align| SurfaceOptions {
            align,
            zero_init: true,
        };

        assert_eq!(kind(Surface::new(0, 1, format)), ZeroSize);
        assert_eq!(kind(Surface::with_options(2, 2, format, options(12))), BadAlignment);
        assert_eq!(kind(Surface::new(usize::MAX / 4, 2, format)), Layout);

        let provider = Limited { max_bytes: 64 };
        let result = Surface::with_provider(8, 8, format, options(16), provider);
        assert_eq!(kind(result), OutOfMemory);

        let bytes = [0u8; 32];
        assert_eq!(kind(SurfaceRef::from_bytes(&bytes, 2, 5, 8, format)), BufferTooSmall);
        assert_eq!(kind(SurfaceRef::from_bytes(&bytes, 2, 2, 4, format)), Layout);
        assert_eq!(kind(SurfaceRef::from_bytes(&bytes, 0, 2, 8, format)), ZeroSize);

        let src = Surface::new(4, 4, format).unwrap();
        let mut dst = Surface::new(2, 3, format).unwrap();
        assert_eq!(kind(downsample_2x(src.as_ref(), dst.as_mut())), SizeMismatch);
    }

    #[test]
    fn unaligned_rows_keep_aligned_start() {
        let options = SurfaceOptions {
            align: 1,
            zero_init: false,
        };

        let surface = Surface::with_options(5, 3, PixelFormat::Rgb24, options).unwrap();
        assert_eq!(surface.stride(), 15);
        assert_eq!(surface.as_bytes().as_ptr() as usize % 4, 0);
        assert_eq!(surface.align(), 1);

        let half = surface.half_size().unwrap();
        assert_eq!(half.stride(), 9);
        assert_eq!(half.align(), 1);
    }

    #[test]
    fn clipping() {
        assert_eq!(clip(0, 4, 10), Some(0..4));
        assert_eq!(clip(-2, 4, 10), Some(0..2));
        assert_eq!(clip(8, 4, 10), Some(8..10));
        assert_eq!(clip(-5, 4, 10), None);
        assert_eq!(clip(10, 4, 10), None);
        assert_eq!(clip(3, 0, 10), None);
        assert_eq!(clip(isize::MAX, usize::MAX, 10), None);
        assert_eq!(clip(isize::MIN, usize::MAX, 10), Some(0..10));
    }

    #[test]
    fn reads_follow_decode_feature() {
        let lut = SrgbLut::shared();

        for format in PixelFormat::ALL {
            let mut surface = Surface::new(3, 1, format).unwrap();
            surface.set_pixel(1, 0, ColorPrgba::new(0.1, 0.2, 0.3, 0.6));

            let bytes = surface.as_ref().pixel(1, 0);
            let (exact, fast) = (format.load(bytes), format.load_with_lut(bytes, lut));

            let expected = if cfg!(feature = "lut-decode") { fast } else { exact };
            assert_eq!(surface.get_pixel(1, 0), expected, "{:?}", format);
            assert_eq!(surface.sample_bilinear(0.5, 0.0), expected, "{:?}", format);

            for (lhs, rhs) in exact.to_array().iter().zip(fast.to_array()) {
                assert!((lhs - rhs).abs() <= 1.5 / 255.0, "{:?}", format);
            }
        }
    }

    #[test]
    fn neighbours() {
        assert_eq!(SurfaceRef::neighbours(0.0, 5), (0, 1, 0.0));
        assert_eq!(SurfaceRef::neighbours(0.5, 5), (2, 3, 0.0));
        assert_eq!(SurfaceRef::neighbours(1.0, 5), (4, 4, 0.0));
        assert_eq!(SurfaceRef::neighbours(-3.0, 5), (0, 1, 0.0));
        assert_eq!(SurfaceRef::neighbours(7.0, 1), (0, 0, 0.0));
        assert_eq!(SurfaceRef::neighbours(0.125, 5), (0, 1, 0.5));
    }
}
