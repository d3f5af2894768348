use crate::geometry::{CropRect, DisplayGeometry};

/// Receives placement commands from the engine. Commands are idempotent;
/// the surface only needs to remember the latest of each.
pub trait VisualSurface {
    fn set_display_geometry(&mut self, geometry: DisplayGeometry);
    fn set_crop_rect(&mut self, rect: CropRect);
}

/// Surface that keeps the last commands for a renderer to read back.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub geometry: Option<DisplayGeometry>,
    pub crop_rect: Option<CropRect>,
}

impl VisualSurface for RecordingSurface {
    fn set_display_geometry(&mut self, geometry: DisplayGeometry) {
        self.geometry = Some(geometry);
    }

    fn set_crop_rect(&mut self, rect: CropRect) {
        self.crop_rect = Some(rect);
    }
}
