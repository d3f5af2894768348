//! Decoding user-selected files into an image plus its natural size.

use std::path::Path;

use image::{DynamicImage, ImageFormat};

use crate::error::CropperError;

/// File dialog filter for the formats this build can decode.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

const UNKNOWN_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct ImageSource {
    image: DynamicImage,
    natural_width: u32,
    natural_height: u32,
}

impl ImageSource {
    pub fn from_image(image: DynamicImage) -> Result<Self, CropperError> {
        let (natural_width, natural_height) = (image.width(), image.height());
        if natural_width == 0 || natural_height == 0 {
            return Err(CropperError::EmptyImage);
        }
        Ok(Self {
            image,
            natural_width,
            natural_height,
        })
    }

    /// Decodes `bytes` after checking that `mime` names an image type.
    pub fn decode(bytes: &[u8], mime: &str) -> Result<Self, CropperError> {
        if !mime.starts_with("image/") {
            log::warn!("Rejected non-image upload ({mime})");
            return Err(CropperError::InvalidInput {
                mime: mime.to_owned(),
            });
        }

        let image = match ImageFormat::from_mime_type(mime) {
            Some(format) => image::load_from_memory_with_format(bytes, format),
            None => image::load_from_memory(bytes),
        }
        .map_err(CropperError::Decode)?;

        let source = Self::from_image(image)?;
        log::debug!(
            "Decoded {mime} image {}x{}",
            source.natural_width,
            source.natural_height
        );
        Ok(source)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, CropperError> {
        let path = path.as_ref();
        let mime = mime_for_path(path);
        if !mime.starts_with("image/") {
            log::warn!("Rejected non-image file {}", path.display());
            return Err(CropperError::InvalidInput { mime });
        }
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes, &mime)
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn natural_width(&self) -> u32 {
        self.natural_width
    }

    pub fn natural_height(&self) -> u32 {
        self.natural_height
    }
}

/// MIME type guessed from the file extension.
pub fn mime_for_path(path: &Path) -> String {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(UNKNOWN_MIME)
        .to_owned()
}
