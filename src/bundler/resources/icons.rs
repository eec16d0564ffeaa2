//! Application icon rendering.
//!
//! The icon is a Material teal circle with a white play triangle, drawn at
//! any pixel size. It is written as `icon.ico` for Windows builds and
//! `icon.icns` for macOS bundles, and the GUI uses the same renderer for its
//! window icon.

use crate::bundler::{Result, error::ErrorExt};
use image::{
    ExtendedColorType, ImageEncoder, Rgba, RgbaImage,
    codecs::{
        ico::{IcoEncoder, IcoFrame},
        png::PngEncoder,
    },
};
use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

/// Material Design teal (#009688).
pub const TEAL: Rgba<u8> = Rgba([0x00, 0x96, 0x88, 0xff]);
const WHITE: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);

/// Frame sizes stored in `icon.ico`.
pub const ICO_SIZES: [u32; 6] = [16, 32, 48, 64, 128, 256];

/// Frame sizes stored in `icon.icns`.
pub const ICNS_SIZES: [u32; 7] = [16, 32, 64, 128, 256, 512, 1024];

/// Samples per axis for edge anti-aliasing.
const SUPERSAMPLE: u32 = 4;

/// Renders the icon at `size` x `size` pixels.
pub fn render_icon(size: u32) -> RgbaImage {
    let s = size as f32;
    let margin = (size / 8) as f32;
    let radius = (s - 2.0 * margin) / 2.0;
    let center = margin + radius;

    let inset = (size / 3) as f32;
    let triangle = [
        (inset * 1.2, inset),
        (s - inset, (size / 2) as f32),
        (inset * 1.2, s - inset),
    ];

    let mut image = RgbaImage::new(size, size);
    let samples = (SUPERSAMPLE * SUPERSAMPLE) as f32;
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let (mut circle_hits, mut triangle_hits) = (0u32, 0u32);
        for sy in 0..SUPERSAMPLE {
            for sx in 0..SUPERSAMPLE {
                let px = x as f32 + (sx as f32 + 0.5) / SUPERSAMPLE as f32;
                let py = y as f32 + (sy as f32 + 0.5) / SUPERSAMPLE as f32;
                if in_triangle((px, py), &triangle) {
                    triangle_hits += 1;
                } else if (px - center).powi(2) + (py - center).powi(2) <= radius * radius {
                    circle_hits += 1;
                }
            }
        }

        if triangle_hits + circle_hits == 0 {
            continue;
        }
        let coverage = (triangle_hits + circle_hits) as f32 / samples;
        let white_share = triangle_hits as f32 / (triangle_hits + circle_hits) as f32;
        let blend = |teal: u8, white: u8| {
            (teal as f32 * (1.0 - white_share) + white as f32 * white_share).round() as u8
        };
        *pixel = Rgba([
            blend(TEAL[0], WHITE[0]),
            blend(TEAL[1], WHITE[1]),
            blend(TEAL[2], WHITE[2]),
            (coverage * 255.0).round() as u8,
        ]);
    }
    image
}

fn in_triangle(p: (f32, f32), t: &[(f32, f32); 3]) -> bool {
    let edge =
        |a: (f32, f32), b: (f32, f32)| (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0);
    let d1 = edge(t[0], t[1]);
    let d2 = edge(t[1], t[2]);
    let d3 = edge(t[2], t[0]);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(png)
}

/// Writes a multi-resolution ICO with PNG-compressed frames.
pub fn write_ico(path: &Path) -> Result<()> {
    let mut frames = Vec::with_capacity(ICO_SIZES.len());
    for size in ICO_SIZES {
        let png = encode_png(&render_icon(size))?;
        frames.push(IcoFrame::with_encoded(png, size, size, ExtendedColorType::Rgba8)?);
    }

    let file = File::create(path).fs_context("creating icon", path)?;
    IcoEncoder::new(BufWriter::new(file)).encode_images(&frames)?;
    log::info!("✓ Created Windows icon: {}", path.display());
    Ok(())
}

/// Writes an ICNS icon family.
///
/// Sizes without a matching ICNS slot are skipped.
pub fn write_icns(path: &Path) -> Result<()> {
    let mut family = icns::IconFamily::new();
    for size in ICNS_SIZES {
        let rendered = render_icon(size);
        let image =
            icns::Image::from_data(icns::PixelFormat::RGBA, size, size, rendered.into_raw())
                .fs_context("rendering icns frame", path)?;
        if let Err(e) = family.add_icon(&image) {
            log::debug!("Skipping {}px icns frame: {}", size, e);
        }
    }

    let file = File::create(path).fs_context("creating icon", path)?;
    family
        .write(BufWriter::new(file))
        .fs_context("writing icon", path)?;
    log::info!("✓ Created macOS icon: {}", path.display());
    Ok(())
}

/// Writes `icon.ico` and `icon.icns` into `out_dir`.
pub fn generate_icons(out_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir).fs_context("creating icon directory", out_dir)?;
    let ico = out_dir.join("icon.ico");
    let icns = out_dir.join("icon.icns");
    write_ico(&ico)?;
    write_icns(&icns)?;
    Ok(vec![ico, icns])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_are_transparent_center_is_white() {
        let icon = render_icon(64);
        assert_eq!(icon.get_pixel(0, 0)[3], 0);
        assert_eq!(icon.get_pixel(63, 63)[3], 0);

        let center = icon.get_pixel(30, 32);
        assert_eq!(*center, WHITE);
    }

    #[test]
    fn ring_is_teal() {
        let icon = render_icon(64);
        // left edge of the circle, outside the triangle
        assert_eq!(*icon.get_pixel(12, 32), TEAL);
    }

    #[test]
    fn writes_ico_and_icns() {
        let dir = tempfile::tempdir().unwrap();
        let paths = generate_icons(dir.path()).unwrap();

        let ico = std::fs::read(&paths[0]).unwrap();
        assert_eq!(&ico[..4], &[0, 0, 1, 0]);
        assert_eq!(u16::from_le_bytes([ico[4], ico[5]]) as usize, ICO_SIZES.len());

        let icns = std::fs::read(&paths[1]).unwrap();
        assert_eq!(&icns[..4], b"icns");
    }
}
