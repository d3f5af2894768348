//! Extracting the crop region and encoding it for download.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use rand::Rng;

use crate::error::CropperError;
use crate::geometry::CropPixels;

pub trait RasterExporter {
    /// Encodes `region` (natural pixels) of `image`.
    fn export(&self, image: &DynamicImage, region: CropPixels) -> Result<Vec<u8>, CropperError>;
}

/// Lossless PNG output.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngExporter;

impl RasterExporter for PngExporter {
    fn export(&self, image: &DynamicImage, region: CropPixels) -> Result<Vec<u8>, CropperError> {
        let region = clip_to_image(region, image.width(), image.height());
        let cropped = image.crop_imm(region.x, region.y, region.width, region.height);

        let mut bytes = Vec::new();
        cropped
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(CropperError::Encode)?;
        Ok(bytes)
    }
}

/// Encoded crop ready to be saved.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub file_name: String,
    pub region: CropPixels,
    pub bytes: Vec<u8>,
}

/// Keeps rounding spill from reaching past the last row or column.
pub fn clip_to_image(region: CropPixels, width: u32, height: u32) -> CropPixels {
    let x = region.x.min(width.saturating_sub(1));
    let y = region.y.min(height.saturating_sub(1));
    CropPixels {
        x,
        y,
        width: region.width.clamp(1, width - x),
        height: region.height.clamp(1, height - y),
    }
}

const NAME_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const NAME_LEN: usize = 5;

/// Five random base-36 characters plus `.png`.
pub fn generated_file_name() -> String {
    let mut rng = rand::rng();
    let mut name = String::with_capacity(NAME_LEN + 4);
    for _ in 0..NAME_LEN {
        let idx = rng.random_range(0..NAME_ALPHABET.len());
        name.push(NAME_ALPHABET[idx] as char);
    }
    name.push_str(".png");
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    fn gradient(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(w, h, |x, y| {
            Rgba([x as u8, y as u8, 0, 255])
        }))
    }

    #[test]
    fn exports_requested_region_as_png() {
        let image = gradient(40, 30);
        let region = CropPixels {
            x: 10,
            y: 5,
            width: 12,
            height: 12,
        };
        let bytes = PngExporter.export(&image, region).unwrap();

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!(decoded.dimensions(), (12, 12));
        assert_eq!(decoded.get_pixel(0, 0), Rgba([10, 5, 0, 255]));
        assert_eq!(decoded.get_pixel(11, 11), Rgba([21, 16, 0, 255]));
    }

    #[test]
    fn region_past_the_edge_is_clipped() {
        let clipped = clip_to_image(
            CropPixels {
                x: 35,
                y: 28,
                width: 10,
                height: 10,
            },
            40,
            30,
        );
        assert_eq!(
            clipped,
            CropPixels {
                x: 35,
                y: 28,
                width: 5,
                height: 2,
            }
        );
    }

    #[test]
    fn generated_names_are_five_base36_chars() {
        let name = generated_file_name();
        let (stem, ext) = name.split_at(NAME_LEN);
        assert_eq!(ext, ".png");
        assert!(stem.bytes().all(|b| NAME_ALPHABET.contains(&b)));
    }

    #[test]
    fn names_generated_in_a_row_differ() {
        let names: std::collections::HashSet<String> =
            (0..20).map(|_| generated_file_name()).collect();
        assert!(names.len() > 1);
        assert_ne!(generated_file_name(), generated_file_name());
    }
}
