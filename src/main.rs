#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use eframe::egui;
use square_cropper::config::CONFIG_FILE_NAME;
use square_cropper::source::IMAGE_EXTENSIONS;
use square_cropper::{
    Cropper, CropperConfig, CropperError, ImageSource, Modifiers, Notice, NoticeLevel,
    RecordingSurface, RelayoutCause,
};

struct SquareCropperApp {
    cropper: Cropper<RecordingSurface>,
    texture: Option<egui::TextureHandle>,
}

impl SquareCropperApp {
    fn new(_cc: &eframe::CreationContext<'_>, config: CropperConfig) -> Self {
        Self {
            cropper: Cropper::new(config, RecordingSurface::default()),
            texture: None,
        }
    }

    fn open(&mut self, ctx: &egui::Context, result: Result<ImageSource, CropperError>) {
        match result {
            Ok(source) => {
                self.cropper.load(source);
                self.load_texture(ctx);
            }
            Err(e) => {
                log::warn!("Failed to open image: {}", e);
                self.cropper.report_load_error(&e);
            }
        }
    }

    fn load_texture(&mut self, ctx: &egui::Context) {
        if let Some(source) = self.cropper.source() {
            let image = source.image();
            let size = [image.width() as _, image.height() as _];
            let image_buffer = image.to_rgba8();
            let pixels = image_buffer.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            self.texture =
                Some(ctx.load_texture("image", color_image, egui::TextureOptions::LINEAR));
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped_files.first() else {
            return;
        };

        let result = match (&file.bytes, &file.path) {
            (Some(bytes), _) => ImageSource::decode(bytes, &file.mime),
            (None, Some(path)) => ImageSource::open(path),
            (None, None) => return,
        };
        self.open(ctx, result);
    }

    fn save(&mut self) {
        let exported = match self.cropper.export() {
            Ok(exported) => exported,
            Err(CropperError::MissingImage | CropperError::NotLaidOut) => return,
            Err(e) => {
                log::error!("Export failed: {}", e);
                self.cropper
                    .set_notice(Notice::new(NoticeLevel::Error, e.to_string()));
                return;
            }
        };

        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&exported.file_name)
            .add_filter("PNG", &["png"])
            .save_file()
        else {
            return;
        };

        match std::fs::write(&path, &exported.bytes) {
            Ok(()) => self.cropper.set_notice(Notice::new(
                NoticeLevel::Success,
                format!("Saved {}", path.display()),
            )),
            Err(e) => {
                log::error!("Failed to save image: {}", e);
                self.cropper
                    .set_notice(Notice::new(NoticeLevel::Error, e.to_string()));
            }
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Open Image").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Image", IMAGE_EXTENSIONS)
                    .pick_file()
                {
                    let result = ImageSource::open(&path);
                    self.open(ui.ctx(), result);
                }
            }

            if ui.button("Save Cropped Image").clicked() {
                self.save();
            }

            let px = self.cropper.crop_pixels();
            if !px.is_empty() {
                ui.label(format!("{}×{} at ({}, {})", px.width, px.height, px.x, px.y));
            }
        });

        if let Some(notice) = self.cropper.notice() {
            let color = match notice.level {
                NoticeLevel::Info => ui.visuals().text_color(),
                NoticeLevel::Success => egui::Color32::from_rgb(80, 180, 80),
                NoticeLevel::Warning => ui.visuals().warn_fg_color,
                NoticeLevel::Error => ui.visuals().error_fg_color,
            };
            ui.colored_label(color, &notice.text);
        }

        ui.separator();
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let padding = self.cropper.config().container_padding;
        let available_size = ui.available_size();
        let container_size = (available_size - egui::vec2(padding * 2.0, padding * 2.0))
            .max(egui::Vec2::ZERO);
        let container_rect = egui::Rect::from_min_size(
            ui.cursor().min + egui::vec2(padding, padding),
            container_size,
        );

        if container_size != self.cropper.container_size() {
            let cause = if self.cropper.container_size() == egui::Vec2::ZERO {
                RelayoutCause::Mount
            } else {
                RelayoutCause::Resize
            };
            self.cropper.request_relayout(container_size, cause);
        }
        if self.cropper.tick() {
            ui.ctx().request_repaint();
        }
        if let Some(wait) = self.cropper.relayout_pending_for() {
            ui.ctx().request_repaint_after(wait);
        }

        let response = ui.allocate_rect(container_rect, egui::Sense::drag());
        let painter = ui.painter_at(container_rect);
        let origin = container_rect.min.to_vec2();

        // Handle Input
        let modifiers = ui.ctx().input(|i| i.modifiers);
        self.cropper.set_modifiers(Modifiers {
            axis_lock: modifiers.shift,
            center_anchor: modifiers.ctrl || modifiers.command,
        });

        if response.drag_started() {
            let press = ui.ctx().input(|i| i.pointer.press_origin());
            if let Some(pos) = press.or_else(|| response.interact_pointer_pos()) {
                self.cropper.pointer_down(pos - origin);
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.cropper.pointer_move(pos - origin);
            }
        }
        if response.drag_stopped() {
            self.cropper.pointer_up();
        }

        let surface = self.cropper.surface();
        let (Some(texture), Some(geometry), Some(crop)) =
            (&self.texture, surface.geometry, surface.crop_rect)
        else {
            painter.text(
                container_rect.center(),
                egui::Align2::CENTER_CENTER,
                "Open or drop an image",
                egui::FontId::proportional(16.0),
                ui.visuals().weak_text_color(),
            );
            return;
        };

        let image_rect = geometry.rect().translate(origin);
        let crop_rect = crop.rect().translate(origin);

        // Draw image
        painter.image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        // Dim everything outside the crop
        let overlay_color = egui::Color32::from_black_alpha(150);
        for shade in [
            egui::Rect::from_min_max(image_rect.min, egui::pos2(image_rect.max.x, crop_rect.min.y)),
            egui::Rect::from_min_max(egui::pos2(image_rect.min.x, crop_rect.max.y), image_rect.max),
            egui::Rect::from_min_max(
                egui::pos2(image_rect.min.x, crop_rect.min.y),
                egui::pos2(crop_rect.min.x, crop_rect.max.y),
            ),
            egui::Rect::from_min_max(
                egui::pos2(crop_rect.max.x, crop_rect.min.y),
                egui::pos2(image_rect.max.x, crop_rect.max.y),
            ),
        ] {
            painter.rect_filled(shade, 0.0, overlay_color);
        }

        if let Some(guides) = self.cropper.guides() {
            let stroke = egui::Stroke::new(1.0, egui::Color32::from_white_alpha(120));
            painter.line_segment(guides.horizontal.map(|p| p + origin), stroke);
            painter.line_segment(guides.vertical.map(|p| p + origin), stroke);
        }

        let border_width = if self.cropper.is_dragging() { 2.0 } else { 1.0 };
        painter.rect_stroke(
            crop_rect,
            0.0,
            egui::Stroke::new(border_width, egui::Color32::WHITE),
        );

        // Corner handles
        let handle_radius = 6.0;
        let handle_stroke = egui::Stroke::new(1.0, egui::Color32::BLACK);
        for corner in [
            crop_rect.left_top(),
            crop_rect.right_top(),
            crop_rect.left_bottom(),
            crop_rect.right_bottom(),
        ] {
            painter.circle(corner, handle_radius, egui::Color32::WHITE, handle_stroke);
        }
    }
}

impl eframe::App for SquareCropperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !ctx.input(|i| i.raw.dropped_files.is_empty()) {
            self.handle_dropped_files(ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.toolbar(ui);
            self.canvas(ui);
        });
    }
}

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = CropperConfig::load_or_default(CONFIG_FILE_NAME);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([800.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Square Cropper",
        options,
        Box::new(move |cc| Ok(Box::new(SquareCropperApp::new(cc, config)))),
    )
}
