//! Coordinate math between natural image pixels and container space.

use eframe::egui;

/// Where the image sits inside its container after an aspect-preserving fit.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DisplayGeometry {
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl DisplayGeometry {
    pub fn left(&self) -> f32 {
        self.offset_x
    }

    pub fn top(&self) -> f32 {
        self.offset_y
    }

    pub fn right(&self) -> f32 {
        self.offset_x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.offset_y + self.height
    }

    pub fn center(&self) -> egui::Pos2 {
        egui::pos2(
            self.offset_x + self.width / 2.0,
            self.offset_y + self.height / 2.0,
        )
    }

    pub fn rect(&self) -> egui::Rect {
        egui::Rect::from_min_size(
            egui::pos2(self.offset_x, self.offset_y),
            egui::vec2(self.width, self.height),
        )
    }

    /// Largest square side that fits inside the displayed image.
    pub fn max_square(&self) -> f32 {
        self.width.min(self.height)
    }
}

/// Square crop frame in container coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl CropRect {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self { x, y, size }
    }

    pub fn min(&self) -> egui::Pos2 {
        egui::pos2(self.x, self.y)
    }

    pub fn max(&self) -> egui::Pos2 {
        egui::pos2(self.x + self.size, self.y + self.size)
    }

    pub fn center(&self) -> egui::Pos2 {
        egui::pos2(self.x + self.size / 2.0, self.y + self.size / 2.0)
    }

    pub fn rect(&self) -> egui::Rect {
        egui::Rect::from_min_size(self.min(), egui::vec2(self.size, self.size))
    }

    pub fn contains(&self, pos: egui::Pos2) -> bool {
        self.rect().contains(pos)
    }

    /// Whether every edge lies inside `bounds`, allowing `eps` of float slack.
    pub fn is_within(&self, bounds: &DisplayGeometry, eps: f32) -> bool {
        self.x >= bounds.left() - eps
            && self.y >= bounds.top() - eps
            && self.x + self.size <= bounds.right() + eps
            && self.y + self.size <= bounds.bottom() + eps
    }
}

/// Crop region in natural image pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CropPixels {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropPixels {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Fits a `natural_w × natural_h` image into `container`, never magnifying
/// past 1:1, and centers it on both axes.
pub fn fit_to_container(natural_w: u32, natural_h: u32, container: egui::Vec2) -> DisplayGeometry {
    let natural = egui::vec2(natural_w as f32, natural_h as f32);
    let aspect = natural.x / natural.y;

    let (mut width, mut height) = if container.x / container.y > aspect {
        (container.y * aspect, container.y)
    } else {
        (container.x, container.x / aspect)
    };

    width = width.min(natural.x);
    height = height.min(natural.y);

    DisplayGeometry {
        width,
        height,
        offset_x: (container.x - width) / 2.0,
        offset_y: (container.y - height) / 2.0,
    }
}

fn scale(geometry: &DisplayGeometry, natural_w: u32, natural_h: u32) -> egui::Vec2 {
    egui::vec2(
        natural_w as f32 / geometry.width,
        natural_h as f32 / geometry.height,
    )
}

/// Maps a display crop frame to rounded natural pixel coordinates.
pub fn to_natural(
    rect: &CropRect,
    geometry: &DisplayGeometry,
    natural_w: u32,
    natural_h: u32,
) -> CropPixels {
    let scale = scale(geometry, natural_w, natural_h);
    let round = |v: f32| v.round().max(0.0) as u32;

    CropPixels {
        x: round((rect.x - geometry.offset_x) * scale.x),
        y: round((rect.y - geometry.offset_y) * scale.y),
        width: round(rect.size * scale.x),
        height: round(rect.size * scale.y),
    }
}

/// Maps natural pixels back into container space. The result is not forced
/// square; callers decide how to collapse it.
pub fn to_display(
    pixels: &CropPixels,
    geometry: &DisplayGeometry,
    natural_w: u32,
    natural_h: u32,
) -> egui::Rect {
    let scale = scale(geometry, natural_w, natural_h);
    egui::Rect::from_min_size(
        egui::pos2(
            pixels.x as f32 / scale.x + geometry.offset_x,
            pixels.y as f32 / scale.y + geometry.offset_y,
        ),
        egui::vec2(pixels.width as f32 / scale.x, pixels.height as f32 / scale.y),
    )
}

/// Moves `rect` so it lies inside `bounds`, keeping its size.
pub fn clamp_position(rect: CropRect, bounds: &DisplayGeometry) -> CropRect {
    let x = rect.x.max(bounds.left()).min(bounds.right() - rect.size);
    let y = rect.y.max(bounds.top()).min(bounds.bottom() - rect.size);
    CropRect { x, y, ..rect }
}

/// Clips the size to what `bounds` can hold, then clamps the position.
pub fn clamp_rect_to_bounds(rect: CropRect, bounds: &DisplayGeometry) -> CropRect {
    let size = rect.size.min(bounds.max_square()).max(0.0);
    clamp_position(CropRect { size, ..rect }, bounds)
}
