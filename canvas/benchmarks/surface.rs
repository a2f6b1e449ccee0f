//! Benchmarks the surface operations.
use brunch::Bench;

use prgba_canvas::{ColorPrgba, ColorSrgb, PixelFormat, Surface, SurfaceError};

#[derive(Debug, Clone, Copy)]
enum Op {
    Fill,
    Over,
    Downsample,
    Bilinear,
}

#[derive(Debug)]
struct SurfaceOp {
    op: Op,
    format: PixelFormat,
    sz: usize,
}

impl SurfaceOp {
    fn name(&self) -> String {
        format!("{:?}({:?}, {})", self.op, self.format, self.sz)
    }

    fn prepare(&self) -> Result<Box<dyn FnMut()>, SurfaceError> {
        let sz = self.sz;
        let mut surface = Surface::new(sz, sz, self.format)?;

        for y in 0..sz {
            let t = y as f32 / sz as f32;
            let color = ColorSrgb::new(t, 0.25, 1.0 - t, 0.5 + t / 2.0).to_prgba();
            surface.fill_rect(0, y as isize, sz, 1, color);
        }

        let tint = ColorPrgba::new(0.1, 0.0, 0.2, 0.3);

        Ok(match self.op {
            Op::Fill => Box::new(move || surface.fill_rect(1, 1, sz - 2, sz - 2, tint)),
            Op::Over => Box::new(move || surface.over_rect(1, 1, sz - 2, sz - 2, tint)),
            Op::Downsample => Box::new(move || {
                let _ = surface.half_size();
            }),
            Op::Bilinear => Box::new(move || {
                let mut acc = ColorPrgba::TRANSPARENT;
                for step in 0..sz {
                    let u = step as f32 / sz as f32;
                    acc = acc + surface.sample_bilinear(u, 1.0 - u);
                }
                core::hint::black_box(acc);
            }),
        })
    }
}

fn main() {
    let tests = [
        SurfaceOp {
            op: Op::Fill,
            format: PixelFormat::Argb32Premul,
            sz: 256,
        },
        SurfaceOp {
            op: Op::Over,
            format: PixelFormat::Argb32Premul,
            sz: 256,
        },
        SurfaceOp {
            op: Op::Over,
            format: PixelFormat::Rgba32,
            sz: 256,
        },
        SurfaceOp {
            op: Op::Downsample,
            format: PixelFormat::Argb32Premul,
            sz: 256,
        },
        SurfaceOp {
            op: Op::Downsample,
            format: PixelFormat::Rgb24,
            sz: 255,
        },
        SurfaceOp {
            op: Op::Bilinear,
            format: PixelFormat::Rgba32Premul,
            sz: 256,
        },
    ];

    let mut benches = brunch::Benches::default();
    benches.extend(tests.map(|op| {
        let bench = match op.prepare() {
            Ok(bench) => bench,
            Err(err) => panic!("Failed to setup benchmark {:?}: {:?}", op, err),
        };

        Bench::new(format!("prgba::surface::main::{}", op.name())).run(bench)
    }));
    benches.finish();
}
