//! Benchmarks packing and unpacking whole rows of pixels.
use brunch::Bench;

use prgba_canvas::{ColorSrgb, PixelFormat, SrgbLut};

#[derive(Debug)]
struct Codec {
    format: PixelFormat,
    lut: bool,
    len: usize,
}

impl Codec {
    fn name(&self) -> String {
        format!("codec({:?}, lut: {}, {})", self.format, self.lut, self.len)
    }

    fn prepare(&self) -> impl FnMut() {
        let format = self.format;
        let bpp = format.bytes_per_pixel();

        let mut row = vec![0u8; self.len * bpp];
        for (idx, pixel) in row.chunks_exact_mut(bpp).enumerate() {
            let t = idx as f32 / self.len as f32;
            format.store(pixel, ColorSrgb::new(t, 1.0 - t, 0.5, t).to_prgba());
        }

        let mut scratch = row.clone();
        let lut = self.lut.then(SrgbLut::shared);

        move || {
            for (src, dst) in row.chunks_exact(bpp).zip(scratch.chunks_exact_mut(bpp)) {
                let color = match lut {
                    Some(lut) => format.load_with_lut(src, lut),
                    None => format.load(src),
                };

                format.store(dst, color);
            }
        }
    }
}

fn main() {
    let tests = [
        Codec {
            format: PixelFormat::Argb32Premul,
            lut: false,
            len: 4096,
        },
        Codec {
            format: PixelFormat::Argb32Premul,
            lut: true,
            len: 4096,
        },
        Codec {
            format: PixelFormat::Rgba32,
            lut: false,
            len: 4096,
        },
        Codec {
            format: PixelFormat::Rgba32,
            lut: true,
            len: 4096,
        },
        Codec {
            format: PixelFormat::Rgb24,
            lut: false,
            len: 4096,
        },
    ];

    let mut benches = brunch::Benches::default();
    benches.extend(tests.map(|codec| {
        Bench::new(format!("prgba::codec::main::{}", codec.name())).run(codec.prepare())
    }));
    benches.finish();
}
