//! Places the image inside its container and keeps the crop frame
//! meaningful when that placement changes.

use eframe::egui;

use crate::crop_state::CropState;
use crate::geometry::{self, CropPixels, CropRect, DisplayGeometry};

#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    natural: Option<(u32, u32)>,
    geometry: Option<DisplayGeometry>,
    crop_pixels: CropPixels,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn natural_size(&self) -> Option<(u32, u32)> {
        self.natural
    }

    pub fn geometry(&self) -> Option<DisplayGeometry> {
        self.geometry
    }

    /// Last committed crop region in natural pixels; empty until the first commit.
    pub fn crop_pixels(&self) -> CropPixels {
        self.crop_pixels
    }

    /// Adopts a freshly loaded image and starts from a centered frame.
    pub fn on_image_load(
        &mut self,
        natural_w: u32,
        natural_h: u32,
        container: egui::Vec2,
        crop: &mut CropState,
    ) -> Option<DisplayGeometry> {
        self.natural = Some((natural_w, natural_h));
        self.crop_pixels = CropPixels::default();
        self.geometry = None;
        crop.clear();
        self.on_relayout(container, crop)
    }

    /// Recomputes the placement for a new container size.
    ///
    /// A previous crop is carried over in natural pixels so the same part of
    /// the image stays selected at the new scale.
    pub fn on_relayout(
        &mut self,
        container: egui::Vec2,
        crop: &mut CropState,
    ) -> Option<DisplayGeometry> {
        let (natural_w, natural_h) = self.natural?;
        if container.x <= 0.0 || container.y <= 0.0 {
            log::warn!("Skipping layout for empty container {container:?}");
            return None;
        }

        let geometry = geometry::fit_to_container(natural_w, natural_h, container);
        self.geometry = Some(geometry);
        log::debug!("Layout {natural_w}x{natural_h} into {container:?}: {geometry:?}");

        let target = if self.crop_pixels.is_empty() {
            centered_square(&geometry, crop.min_size())
        } else {
            self.reproject(&geometry, crop.min_size())
        };

        if let Err(e) = crop.commit(target, &geometry) {
            log::warn!("Re-projected crop rejected ({e}), recentering");
            let fallback = centered_square(&geometry, crop.min_size());
            if let Err(e) = crop.commit(fallback, &geometry) {
                log::warn!("Centered crop rejected: {e}");
            }
        }

        self.commit_pixels(crop);
        Some(geometry)
    }

    /// Recomputes the natural pixel crop from the current frame.
    pub fn commit_pixels(&mut self, crop: &CropState) {
        if let (Some(geometry), Some((w, h))) = (self.geometry, self.natural) {
            self.crop_pixels = crop.to_crop_pixels(&geometry, w, h).unwrap_or_default();
        }
    }

    fn reproject(&self, geometry: &DisplayGeometry, min_size: f32) -> CropRect {
        let Some((natural_w, natural_h)) = self.natural else {
            return centered_square(geometry, min_size);
        };
        let target = geometry::to_display(&self.crop_pixels, geometry, natural_w, natural_h);

        let mut size = target
            .width()
            .min(geometry.right() - target.min.x)
            .min(geometry.bottom() - target.min.y);
        if size < min_size {
            size = min_size;
        }
        // An image smaller than the floor still has to contain the frame.
        size = size.min(geometry.max_square());

        geometry::clamp_position(CropRect::new(target.min.x, target.min.y, size), geometry)
    }
}

/// Square of half the shorter image side, centered on the image.
pub fn centered_square(geometry: &DisplayGeometry, min_size: f32) -> CropRect {
    let size = (geometry.max_square() / 2.0)
        .max(min_size)
        .min(geometry.max_square());
    CropRect::new(
        geometry.offset_x + (geometry.width - size) / 2.0,
        geometry.offset_y + (geometry.height - size) / 2.0,
        size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_SIZE;
    use approx::assert_abs_diff_eq;

    fn loaded(container: egui::Vec2) -> (LayoutEngine, CropState) {
        let mut layout = LayoutEngine::new();
        let mut crop = CropState::new(MIN_SIZE);
        layout.on_image_load(800, 600, container, &mut crop);
        (layout, crop)
    }

    #[test]
    fn load_centers_half_size_square() {
        let (layout, crop) = loaded(egui::vec2(400.0, 400.0));
        assert_eq!(
            layout.geometry(),
            Some(DisplayGeometry {
                width: 400.0,
                height: 300.0,
                offset_x: 0.0,
                offset_y: 50.0,
            })
        );
        assert_eq!(crop.get(), Some(CropRect::new(125.0, 125.0, 150.0)));
        assert_eq!(
            layout.crop_pixels(),
            CropPixels {
                x: 250,
                y: 150,
                width: 300,
                height: 300,
            }
        );
    }

    #[test]
    fn relayout_preserves_natural_region() {
        let (mut layout, mut crop) = loaded(egui::vec2(400.0, 400.0));
        let g = layout.geometry().unwrap();
        crop.commit(CropRect::new(40.0, 90.0, 120.0), &g).unwrap();
        layout.commit_pixels(&crop);
        let before = layout.crop_pixels();

        layout.on_relayout(egui::vec2(700.0, 500.0), &mut crop);
        let after = layout.crop_pixels();

        assert_abs_diff_eq!(before.x as f32, after.x as f32, epsilon = 2.0);
        assert_abs_diff_eq!(before.y as f32, after.y as f32, epsilon = 2.0);
        assert_abs_diff_eq!(before.width as f32, after.width as f32, epsilon = 2.0);

        let rect = crop.get().unwrap();
        assert!(rect.is_within(&layout.geometry().unwrap(), 1e-3));
    }

    #[test]
    fn relayout_into_small_container_grows_to_floor_and_stays_inside() {
        let (mut layout, mut crop) = loaded(egui::vec2(400.0, 400.0));
        let g = layout.geometry().unwrap();
        crop.commit(CropRect::new(340.0, 290.0, 60.0), &g).unwrap();
        layout.commit_pixels(&crop);

        layout.on_relayout(egui::vec2(200.0, 200.0), &mut crop);
        let g = layout.geometry().unwrap();
        let rect = crop.get().unwrap();
        assert_abs_diff_eq!(rect.size, MIN_SIZE);
        assert!(rect.is_within(&g, 1e-3));
    }

    #[test]
    fn relayout_without_image_is_noop() {
        let mut layout = LayoutEngine::new();
        let mut crop = CropState::new(MIN_SIZE);
        assert_eq!(layout.on_relayout(egui::vec2(300.0, 300.0), &mut crop), None);
        assert_eq!(crop.get(), None);
    }

    #[test]
    fn new_image_discards_previous_crop() {
        let (mut layout, mut crop) = loaded(egui::vec2(400.0, 400.0));
        let g = layout.geometry().unwrap();
        crop.commit(CropRect::new(0.0, 50.0, 60.0), &g).unwrap();
        layout.commit_pixels(&crop);

        layout.on_image_load(800, 600, egui::vec2(400.0, 400.0), &mut crop);
        assert_eq!(crop.get(), Some(CropRect::new(125.0, 125.0, 150.0)));
    }
}
