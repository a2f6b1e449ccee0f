use prgba_canvas::{ColorPrgba, ColorSrgb, PixelFormat, Surface, SurfaceError};

const SZ: usize = 256;

fn main() -> Result<(), SurfaceError> {
    let mut surface = Surface::new(SZ, SZ, PixelFormat::Rgba32Premul)?;
    surface.clear(ColorPrgba::WHITE);

    // A horizontal ramp from black to white. Each column steps evenly in sRGB, so the ramp looks
    // even to the eye while the light it represents is not.
    for x in 0..SZ {
        let level = x as f32 / (SZ - 1) as f32;
        let color = ColorSrgb::new(level, level, level, 1.0).to_prgba();
        surface.fill_rect(x as isize, 0, 1, SZ / 2, color);
    }

    // Translucent squares composited in linear light. Their overlap is brighter than either.
    let red = ColorSrgb::new(1.0, 0.0, 0.0, 0.5).to_prgba();
    let blue = ColorSrgb::new(0.0, 0.0, 1.0, 0.5).to_prgba();
    surface.over_rect(32, 96, 128, 128, red);
    surface.over_rect(96, 128, 128, 128, blue);

    // Halve twice and scale back up with bilinear filtering, to show the sampling.
    let small = surface.half_size()?.half_size()?;
    let mut rescaled = Surface::new(SZ, SZ, PixelFormat::Rgba32Premul)?;
    for y in 0..SZ {
        for x in 0..SZ {
            let (u, v) = (x as f32 / (SZ - 1) as f32, y as f32 / (SZ - 1) as f32);
            rescaled.set_pixel(x, y, small.sample_bilinear(u, v));
        }
    }

    // `image::save` expects straight sRGB bytes, copy the rows into a fresh buffer.
    let mut straight = Surface::new(SZ, SZ * 2, PixelFormat::Rgb24)?;
    for (offset, source) in [(0, &surface), (SZ, &rescaled)] {
        for y in 0..SZ {
            for x in 0..SZ {
                straight.set_pixel(x, offset + y, source.get_pixel(x, y));
            }
        }
    }

    let container = (0..SZ * 2)
        .flat_map(|y| straight.row(y).to_owned())
        .collect::<Vec<u8>>();
    let image = image::RgbImage::from_raw(SZ as u32, (SZ * 2) as u32, container).unwrap();

    let output = concat!(env!("CARGO_MANIFEST_DIR"), "/../composite.png");
    image.save(output).unwrap();

    Ok(())
}
