use crate::error::CommitError;
use crate::geometry::{self, CropPixels, CropRect, DisplayGeometry};

/// Float slack for containment checks after clamping.
const EPSILON: f32 = 1e-3;

/// Authoritative crop frame. Every write goes through [`CropState::commit`],
/// so whatever `get` returns is square, inside the image and at least the
/// minimum size.
#[derive(Debug, Clone, Default)]
pub struct CropState {
    rect: Option<CropRect>,
    min_size: f32,
}

impl CropState {
    pub fn new(min_size: f32) -> Self {
        Self {
            rect: None,
            min_size,
        }
    }

    pub fn get(&self) -> Option<CropRect> {
        self.rect
    }

    pub fn min_size(&self) -> f32 {
        self.min_size
    }

    pub fn clear(&mut self) {
        self.rect = None;
    }

    /// Clamps `rect` into `bounds` and stores it.
    ///
    /// Fails with [`CommitError::BelowMinimum`] when the clamped frame is
    /// smaller than the minimum although the image could hold one of that
    /// size. Images smaller than the minimum accept their largest square.
    pub fn commit(
        &mut self,
        rect: CropRect,
        bounds: &DisplayGeometry,
    ) -> Result<CropRect, CommitError> {
        let clamped = geometry::clamp_rect_to_bounds(rect, bounds);
        let floor = self.min_size.min(bounds.max_square());
        if clamped.size + EPSILON < floor {
            return Err(CommitError::BelowMinimum {
                size: clamped.size,
                min: self.min_size,
            });
        }
        debug_assert!(clamped.is_within(bounds, EPSILON));

        self.rect = Some(clamped);
        Ok(clamped)
    }

    pub fn to_crop_pixels(
        &self,
        geometry: &DisplayGeometry,
        natural_w: u32,
        natural_h: u32,
    ) -> Option<CropPixels> {
        self.rect
            .map(|rect| geometry::to_natural(&rect, geometry, natural_w, natural_h))
    }
}
