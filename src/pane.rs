//! One image display surface and its magnifier overlay.

use crate::settings::MagnifierSettings;
use crate::signal::Signal;
use eframe::egui::{Pos2, Rect, TextureId, Vec2, pos2, vec2};
use std::sync::mpsc::Receiver;

/// Pointer activity reported by a pane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaneEvent {
    Enter,
    /// Cursor moved; position is pane-local and already clamped.
    Move { cursor: Pos2 },
    Leave,
    /// Wheel delta in web convention: positive `y` scrolls down.
    Wheel { delta: Vec2 },
}

/// A decoded image attached to a pane.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pub texture: TextureId,
    /// Pixel dimensions of the decoded bitmap.
    pub size: [u32; 2],
    pub name: String,
}

/// Where to draw the magnifier parts for one cursor position.
///
/// All rects are pane-local; use [`CropTransform::translate`] to move them
/// into screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropTransform {
    /// Indicator around the cursor.
    pub region: Rect,
    /// Fixed-size frame that shows the magnified crop.
    pub viewport: Rect,
    /// Offset of the magnified surface relative to `viewport.min`.
    pub magnified_offset: Vec2,
    pub magnified_size: Vec2,
}

impl CropTransform {
    /// Full extent of the magnified surface; only the part inside
    /// `viewport` is meant to be visible.
    pub fn magnified_rect(&self) -> Rect {
        Rect::from_min_size(self.viewport.min + self.magnified_offset, self.magnified_size)
    }

    pub fn translate(&self, by: Vec2) -> Self {
        Self {
            region: self.region.translate(by),
            viewport: self.viewport.translate(by),
            ..*self
        }
    }
}

/// Controller for a single pane.
///
/// Geometry comes from the layout through [`Pane::resize`]; the zoom factor
/// comes from the owning gallery through [`Pane::set_zoom_scale`]. Until
/// both an image and a measured rect are present, cursor and crop updates
/// are no-ops.
#[derive(Debug)]
pub struct Pane {
    magnifier: MagnifierSettings,
    source: Option<SourceImage>,
    display_rect: Option<Rect>,
    scroll: Vec2,
    scale: Vec2,
    magnified_size: Vec2,
    cursor: Option<Pos2>,
    crop: Option<CropTransform>,
    hovered: bool,
    magnifier_visible: bool,
    events: Signal<PaneEvent>,
}

impl Pane {
    pub fn new(magnifier: MagnifierSettings) -> Self {
        Self {
            magnifier,
            source: None,
            display_rect: None,
            scroll: Vec2::ZERO,
            scale: Vec2::splat(1.0),
            magnified_size: Vec2::ZERO,
            cursor: None,
            crop: None,
            hovered: false,
            magnifier_visible: false,
            events: Signal::new(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<PaneEvent> {
        self.events.subscribe()
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.source.is_some()
    }

    pub fn set_image(&mut self, source: SourceImage) {
        log::info!(
            "pane image set to {} ({}x{})",
            source.name,
            source.size[0],
            source.size[1]
        );
        self.source = Some(source);
        self.refresh();
    }

    pub fn display_rect(&self) -> Option<Rect> {
        self.display_rect
    }

    pub fn width(&self) -> f32 {
        self.display_rect.map_or(0.0, |rect| rect.width())
    }

    pub fn height(&self) -> f32 {
        self.display_rect.map_or(0.0, |rect| rect.height())
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn magnified_size(&self) -> Vec2 {
        self.magnified_size
    }

    pub fn cursor(&self) -> Option<Pos2> {
        self.cursor
    }

    /// Last computed transform, if the pane has rendered one.
    pub fn crop(&self) -> Option<CropTransform> {
        self.crop
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_magnifier_visible(&self) -> bool {
        self.magnifier_visible
    }

    pub fn show_magnifier(&mut self) {
        self.magnifier_visible = true;
    }

    pub fn hide_magnifier(&mut self) {
        self.magnifier_visible = false;
    }

    /// Stores freshly measured geometry. `display_rect` is in viewport
    /// coordinates, `scroll` is the scroll offset of the surrounding view.
    pub fn resize(&mut self, display_rect: Rect, scroll: Vec2) {
        self.display_rect = Some(display_rect);
        self.scroll = scroll;
        self.refresh();
    }

    pub fn set_zoom_scale(&mut self, scale_x: f32, scale_y: f32) {
        self.scale = vec2(scale_x, scale_y);
        self.refresh();
    }

    /// Converts a viewport position into clamped pane-local coordinates and
    /// stores it as the cursor.
    pub fn set_cursor(&mut self, client: Pos2) -> Option<Pos2> {
        let rect = self.display_rect?;
        let local = client - rect.min + self.scroll;
        let cursor = clamp_to(rect, local.to_pos2());
        self.cursor = Some(cursor);
        Some(cursor)
    }

    /// Places the cursor at a pane-local position and re-renders the crop.
    pub fn move_cursor(&mut self, local: Pos2) {
        let Some(rect) = self.display_rect else {
            return;
        };
        let cursor = clamp_to(rect, local);
        self.cursor = Some(cursor);
        self.render_crop_at(cursor.x, cursor.y);
    }

    /// Computes the magnifier layout for a pane-local cursor position.
    ///
    /// The magnified surface is offset so that the point under the cursor
    /// sits at the center of the zoom viewport.
    pub fn render_crop_at(&mut self, x: f32, y: f32) -> Option<CropTransform> {
        self.source.as_ref()?;
        self.display_rect?;

        let viewport_size = Vec2::from(self.magnifier.zoom_viewport_size);
        let region_size = Vec2::from(self.magnifier.region_size);
        let half_zoom = viewport_size / 2.0;

        let region = Rect::from_center_size(pos2(x, y), region_size);
        let viewport = Rect::from_min_size(
            region.max + Vec2::splat(self.magnifier.viewport_gap),
            viewport_size,
        );
        let magnified_offset = vec2(
            -x * self.scale.x + half_zoom.x,
            -y * self.scale.y + half_zoom.y,
        );

        let crop = CropTransform {
            region,
            viewport,
            magnified_offset,
            magnified_size: self.magnified_size,
        };
        self.crop = Some(crop);
        Some(crop)
    }

    pub fn pointer_entered(&mut self) {
        self.hovered = true;
        self.events.emit(PaneEvent::Enter);
    }

    pub fn pointer_moved(&mut self, client: Pos2) {
        if let Some(cursor) = self.set_cursor(client) {
            self.events.emit(PaneEvent::Move { cursor });
        }
    }

    pub fn pointer_left(&mut self) {
        self.hovered = false;
        self.events.emit(PaneEvent::Leave);
    }

    pub fn wheel(&mut self, delta: Vec2) {
        self.events.emit(PaneEvent::Wheel { delta });
    }

    fn refresh(&mut self) {
        if let Some(rect) = self.display_rect {
            self.magnified_size = rect.size() * self.scale;
        }
        if let Some(cursor) = self.cursor {
            self.render_crop_at(cursor.x, cursor.y);
        }
    }
}

fn clamp_to(rect: Rect, local: Pos2) -> Pos2 {
    pos2(
        local.x.clamp(0.0, rect.width()),
        local.y.clamp(0.0, rect.height()),
    )
}
