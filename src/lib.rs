//! Geometry and interaction engine for a square image cropper.
//!
//! The engine keeps a square crop frame inside a letterboxed image, drives
//! drag and resize gestures from pointer input, and maps the final frame
//! back to natural image pixels for export.

pub mod config;
pub mod crop_state;
pub mod cropper;
pub mod error;
pub mod export;
pub mod geometry;
pub mod interaction;
pub mod layout;
pub mod scheduler;
pub mod source;
pub mod surface;

pub use config::CropperConfig;
pub use crop_state::CropState;
pub use cropper::{Cropper, Guides, Notice, NoticeLevel, RelayoutCause};
pub use error::{CommitError, CropperError};
pub use export::{ExportedImage, PngExporter, RasterExporter};
pub use geometry::{CropPixels, CropRect, DisplayGeometry};
pub use interaction::{Handle, HitTarget, InteractionController, InteractionSession, Modifiers};
pub use layout::LayoutEngine;
pub use scheduler::{Clock, Debouncer, ManualClock, SystemClock};
pub use source::ImageSource;
pub use surface::{RecordingSurface, VisualSurface};
