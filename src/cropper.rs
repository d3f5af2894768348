//! The cropping session: one image, one crop frame, one gesture at a time.

use eframe::egui;

use crate::config::CropperConfig;
use crate::crop_state::CropState;
use crate::error::CropperError;
use crate::export::{self, ExportedImage, PngExporter, RasterExporter};
use crate::geometry::{CropPixels, CropRect, DisplayGeometry};
use crate::interaction::{InteractionController, Modifiers};
use crate::layout::LayoutEngine;
use crate::scheduler::{Clock, Debouncer, SystemClock};
use crate::source::ImageSource;
use crate::surface::VisualSurface;

pub const INVALID_FILE_MESSAGE: &str = "画像ファイルを選択してください。";
pub const MISSING_IMAGE_MESSAGE: &str = "Please upload an image.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Message for the user, shown until replaced or cleared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// What asked for a new layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayoutCause {
    /// Container measured for the first time.
    Mount,
    Resize,
    Scroll,
    Orientation,
}

/// Center lines through the displayed image, shown while an axis locked
/// move is possible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Guides {
    pub horizontal: [egui::Pos2; 2],
    pub vertical: [egui::Pos2; 2],
}

impl Guides {
    pub fn through_center_of(geometry: &DisplayGeometry) -> Self {
        let center = geometry.center();
        Self {
            horizontal: [
                egui::pos2(geometry.left(), center.y),
                egui::pos2(geometry.right(), center.y),
            ],
            vertical: [
                egui::pos2(center.x, geometry.top()),
                egui::pos2(center.x, geometry.bottom()),
            ],
        }
    }
}

pub struct Cropper<S: VisualSurface, C: Clock = SystemClock> {
    config: CropperConfig,
    source: Option<ImageSource>,
    layout: LayoutEngine,
    crop: CropState,
    controller: InteractionController,
    relayout: Debouncer,
    container: egui::Vec2,
    modifiers: Modifiers,
    notice: Option<Notice>,
    surface: S,
    exporter: Box<dyn RasterExporter>,
    clock: C,
}

impl<S: VisualSurface> Cropper<S> {
    pub fn new(config: CropperConfig, surface: S) -> Self {
        Self::with_clock(config, surface, SystemClock)
    }
}

impl<S: VisualSurface, C: Clock> Cropper<S, C> {
    pub fn with_clock(config: CropperConfig, surface: S, clock: C) -> Self {
        Self {
            config,
            source: None,
            layout: LayoutEngine::new(),
            crop: CropState::new(config.min_size),
            controller: InteractionController::new(config.handle_tolerance),
            relayout: Debouncer::new(config.relayout_debounce()),
            container: egui::Vec2::ZERO,
            modifiers: Modifiers::default(),
            notice: None,
            surface,
            exporter: Box::new(PngExporter),
            clock,
        }
    }

    pub fn with_exporter(mut self, exporter: impl RasterExporter + 'static) -> Self {
        self.exporter = Box::new(exporter);
        self
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn source(&self) -> Option<&ImageSource> {
        self.source.as_ref()
    }

    pub fn geometry(&self) -> Option<DisplayGeometry> {
        self.layout.geometry()
    }

    pub fn crop_rect(&self) -> Option<CropRect> {
        self.crop.get()
    }

    /// Natural pixel crop as of the last committed gesture or layout.
    pub fn crop_pixels(&self) -> CropPixels {
        self.layout.crop_pixels()
    }

    pub fn container_size(&self) -> egui::Vec2 {
        self.container
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    pub fn is_resizing(&self) -> bool {
        self.controller.is_resizing()
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn guides(&self) -> Option<Guides> {
        if !(self.controller.is_dragging() && self.modifiers.axis_lock) {
            return None;
        }
        self.layout.geometry().map(|g| Guides::through_center_of(&g))
    }

    /// Decodes an uploaded file. Rejected files leave the session untouched.
    pub fn load_bytes(&mut self, bytes: &[u8], mime: &str) -> Result<(), CropperError> {
        match ImageSource::decode(bytes, mime) {
            Ok(source) => {
                self.load(source);
                Ok(())
            }
            Err(e) => {
                self.report_load_error(&e);
                Err(e)
            }
        }
    }

    /// Records the user-facing notice for a failed load.
    pub fn report_load_error(&mut self, error: &CropperError) {
        let notice = match error {
            CropperError::InvalidInput { .. } => {
                Notice::new(NoticeLevel::Error, INVALID_FILE_MESSAGE)
            }
            other => Notice::new(NoticeLevel::Error, other.to_string()),
        };
        self.notice = Some(notice);
    }

    pub fn load(&mut self, source: ImageSource) {
        log::info!(
            "Loaded image {}x{}",
            source.natural_width(),
            source.natural_height()
        );
        self.notice = None;
        self.controller.pointer_up();
        self.relayout.cancel();

        let (w, h) = (source.natural_width(), source.natural_height());
        self.source = Some(source);
        self.layout.on_image_load(w, h, self.container, &mut self.crop);
        self.push_to_surface();
    }

    /// Records a new container size and asks for a relayout. Resize and
    /// scroll requests are debounced; the rest apply at once.
    pub fn request_relayout(&mut self, container: egui::Vec2, cause: RelayoutCause) {
        self.container = container;
        match cause {
            RelayoutCause::Mount | RelayoutCause::Orientation => {
                self.relayout.cancel();
                self.relayout_now();
            }
            RelayoutCause::Resize | RelayoutCause::Scroll => {
                self.relayout.schedule(self.clock.now());
            }
        }
    }

    /// Runs a due relayout. Returns whether one ran.
    pub fn tick(&mut self) -> bool {
        if self.relayout.poll(self.clock.now()) {
            self.relayout_now();
            true
        } else {
            false
        }
    }

    /// Time until a pending relayout is due.
    pub fn relayout_pending_for(&self) -> Option<std::time::Duration> {
        self.relayout.remaining(self.clock.now())
    }

    pub fn relayout_now(&mut self) {
        if self.source.is_none() {
            return;
        }
        if self
            .layout
            .on_relayout(self.container, &mut self.crop)
            .is_some()
        {
            self.push_to_surface();
        }
    }

    /// `pos` is relative to the container. Returns whether a gesture started.
    pub fn pointer_down(&mut self, pos: egui::Pos2) -> bool {
        self.controller.pointer_down(pos, self.modifiers, &self.crop)
    }

    pub fn pointer_move(&mut self, pos: egui::Pos2) -> Option<CropRect> {
        let geometry = self.layout.geometry()?;
        let rect = self
            .controller
            .pointer_move(pos, self.modifiers, &mut self.crop, &geometry)?;
        self.surface.set_crop_rect(rect);
        Some(rect)
    }

    /// Ends the gesture and commits the natural pixel crop.
    pub fn pointer_up(&mut self) -> bool {
        if !self.controller.pointer_up() {
            return false;
        }
        self.layout.commit_pixels(&self.crop);
        log::debug!("Committed crop {:?}", self.layout.crop_pixels());
        true
    }

    /// Encodes the current crop. Without an image this only leaves a warning;
    /// an image that has not been laid out yet exports nothing.
    pub fn export(&mut self) -> Result<ExportedImage, CropperError> {
        let Some(source) = self.source.as_ref() else {
            self.notice = Some(Notice::new(NoticeLevel::Warning, MISSING_IMAGE_MESSAGE));
            return Err(CropperError::MissingImage);
        };
        let region = self
            .layout
            .geometry()
            .and_then(|geometry| {
                self.crop.to_crop_pixels(
                    &geometry,
                    source.natural_width(),
                    source.natural_height(),
                )
            })
            .ok_or(CropperError::NotLaidOut)?;

        let bytes = self.exporter.export(source.image(), region)?;
        let file_name = export::generated_file_name();
        log::info!("Exported {region:?} as {file_name} ({} bytes)", bytes.len());

        Ok(ExportedImage {
            file_name,
            region,
            bytes,
        })
    }

    fn push_to_surface(&mut self) {
        if let Some(geometry) = self.layout.geometry() {
            self.surface.set_display_geometry(geometry);
        }
        if let Some(rect) = self.crop.get() {
            self.surface.set_crop_rect(rect);
        }
    }
}
