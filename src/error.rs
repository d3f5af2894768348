use thiserror::Error;

#[derive(Debug, Error)]
pub enum CropperError {
    #[error("not an image file (type: {mime})")]
    InvalidInput { mime: String },
    #[error("no image loaded")]
    MissingImage,
    #[error("image is not laid out yet")]
    NotLaidOut,
    #[error("image has zero width or height")]
    EmptyImage,
    #[error("image decode failed: {0}")]
    Decode(#[source] image::ImageError),
    #[error("image encode failed: {0}")]
    Encode(#[source] image::ImageError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("invalid config value {field} = {value}")]
    ConfigValue { field: &'static str, value: f32 },
}

/// Rejection from [`crate::CropState::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CommitError {
    #[error("crop size {size} is below the minimum of {min}")]
    BelowMinimum { size: f32, min: f32 },
}
