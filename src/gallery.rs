//! Coordinator that keeps a set of panes magnified in lockstep.

use crate::pane::{Pane, PaneEvent};
use crate::settings::MagnifierSettings;
use crate::zoom::{ZoomEvent, ZoomLevel};
use eframe::egui::{Pos2, pos2};
use std::sync::mpsc::Receiver;

/// Index of a pane inside its gallery.
pub type PaneId = usize;

struct Slot {
    pane: Pane,
    events: Receiver<PaneEvent>,
}

/// Owns every pane and the shared zoom level.
///
/// Panes and the zoom level only publish signals; the gallery reacts to them
/// in [`Gallery::dispatch`]:
///
/// - every magnifier is visible exactly while some pane is hovered,
/// - a move is mirrored into every pane, rescaled to its size,
/// - a wheel tick steps the zoom level,
/// - a zoom change re-applies the scale to every pane.
pub struct Gallery {
    slots: Vec<Slot>,
    zoom: ZoomLevel,
    zoom_events: Receiver<ZoomEvent>,
}

impl Gallery {
    pub fn new(mut zoom: ZoomLevel) -> Self {
        let zoom_events = zoom.subscribe();
        Self {
            slots: Vec::new(),
            zoom,
            zoom_events,
        }
    }

    /// Registers a new pane. It starts at the current zoom scale.
    pub fn add_pane(&mut self, magnifier: MagnifierSettings) -> PaneId {
        let mut pane = Pane::new(magnifier);
        let events = pane.subscribe();
        let value = self.zoom.value();
        pane.set_zoom_scale(value, value);

        self.slots.push(Slot { pane, events });
        self.slots.len() - 1
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.slots.get(id).map(|slot| &slot.pane)
    }

    pub fn pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        self.slots.get_mut(id).map(|slot| &mut slot.pane)
    }

    pub fn panes(&self) -> impl Iterator<Item = &Pane> {
        self.slots.iter().map(|slot| &slot.pane)
    }

    pub fn panes_mut(&mut self) -> impl Iterator<Item = &mut Pane> {
        self.slots.iter_mut().map(|slot| &mut slot.pane)
    }

    pub fn zoom(&self) -> &ZoomLevel {
        &self.zoom
    }

    pub fn zoom_mut(&mut self) -> &mut ZoomLevel {
        &mut self.zoom
    }

    /// Handles every pending pane and zoom signal. Returns how many were
    /// handled.
    pub fn dispatch(&mut self) -> usize {
        let mut handled = 0;

        // Pane reactions can trigger zoom changes, so zoom is drained last.
        let pending: Vec<(PaneId, PaneEvent)> = self
            .slots
            .iter()
            .enumerate()
            .flat_map(|(id, slot)| slot.events.try_iter().map(move |event| (id, event)))
            .collect();

        for (source, event) in pending {
            self.on_pane_event(source, event);
            handled += 1;
        }

        while let Ok(ZoomEvent::Changed { value }) = self.zoom_events.try_recv() {
            self.apply_scale(value);
            handled += 1;
        }

        handled
    }

    fn on_pane_event(&mut self, source: PaneId, event: PaneEvent) {
        match event {
            PaneEvent::Enter | PaneEvent::Leave => self.sync_magnifiers(),
            PaneEvent::Move { cursor } => self.broadcast_cursor(source, cursor),
            PaneEvent::Wheel { delta } => {
                if delta.y < 0.0 {
                    self.zoom.step_forward();
                } else if delta.y > 0.0 {
                    self.zoom.step_back();
                }
            }
        }
    }

    /// Hover flags are already current when the signals arrive, so a leave
    /// queued behind an enter from another pane cannot hide the magnifiers.
    fn sync_magnifiers(&mut self) {
        let visible = self.panes().any(Pane::is_hovered);
        for pane in self.panes_mut() {
            if visible {
                pane.show_magnifier();
            } else {
                pane.hide_magnifier();
            }
        }
    }

    fn broadcast_cursor(&mut self, source: PaneId, cursor: Pos2) {
        let Some(origin) = self.pane(source) else {
            return;
        };
        let (width, height) = (origin.width(), origin.height());
        if width <= 0.0 || height <= 0.0 {
            log::debug!("dropping move from unmeasured pane {source}");
            return;
        }

        for pane in self.panes_mut() {
            let scaled = pos2(
                cursor.x * (pane.width() / width),
                cursor.y * (pane.height() / height),
            );
            pane.move_cursor(scaled);
        }
    }

    fn apply_scale(&mut self, value: f32) {
        for pane in self.panes_mut() {
            pane.set_zoom_scale(value, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pane::SourceImage;
    use eframe::egui::{Rect, TextureId, Vec2, vec2};

    fn gallery_with(sizes: &[(f32, f32)]) -> Gallery {
        let zoom = ZoomLevel::new(0.1, 3.0, 0.1, 1.0).unwrap();
        let mut gallery = Gallery::new(zoom);
        for (i, &(w, h)) in sizes.iter().enumerate() {
            let id = gallery.add_pane(MagnifierSettings::default());
            let pane = gallery.pane_mut(id).unwrap();
            pane.set_image(SourceImage {
                texture: TextureId::Managed(i as u64),
                size: [w as u32, h as u32],
                name: format!("pane-{i}"),
            });
            pane.resize(
                Rect::from_min_size(pos2(i as f32 * 300.0, 0.0), vec2(w, h)),
                Vec2::ZERO,
            );
        }
        gallery
    }

    #[test]
    fn move_is_rescaled_per_pane() {
        let mut gallery = gallery_with(&[(200.0, 100.0), (100.0, 50.0)]);

        gallery.pane_mut(0).unwrap().pointer_moved(pos2(100.0, 40.0));
        gallery.dispatch();

        assert_eq!(gallery.pane(0).unwrap().cursor(), Some(pos2(100.0, 40.0)));
        assert_eq!(gallery.pane(1).unwrap().cursor(), Some(pos2(50.0, 20.0)));
    }

    #[test]
    fn enter_and_leave_toggle_every_magnifier() {
        let mut gallery = gallery_with(&[(200.0, 100.0), (100.0, 50.0)]);

        gallery.pane_mut(0).unwrap().pointer_entered();
        gallery.dispatch();
        assert!(gallery.panes().all(Pane::is_magnifier_visible));

        gallery.pane_mut(0).unwrap().pointer_left();
        gallery.dispatch();
        assert!(gallery.panes().all(|pane| !pane.is_magnifier_visible()));
    }

    #[test]
    fn crossing_between_panes_in_one_frame_keeps_magnifiers() {
        let mut gallery = gallery_with(&[(200.0, 100.0), (100.0, 50.0)]);
        gallery.pane_mut(1).unwrap().pointer_entered();
        gallery.dispatch();

        // Pane 0 drains first, so its enter is handled before pane 1's leave.
        gallery.pane_mut(1).unwrap().pointer_left();
        gallery.pane_mut(0).unwrap().pointer_entered();
        gallery.dispatch();

        assert!(gallery.pane(0).unwrap().is_hovered());
        assert!(gallery.panes().all(Pane::is_magnifier_visible));

        gallery.pane_mut(0).unwrap().pointer_left();
        gallery.dispatch();
        assert!(gallery.panes().all(|pane| !pane.is_magnifier_visible()));
    }

    #[test]
    fn wheel_up_zooms_in_and_wheel_down_zooms_out() {
        let mut gallery = gallery_with(&[(200.0, 100.0)]);
        let start = gallery.zoom().value();

        gallery.pane_mut(0).unwrap().wheel(vec2(0.0, -120.0));
        gallery.dispatch();
        assert!(gallery.zoom().value() > start);

        gallery.pane_mut(0).unwrap().wheel(vec2(0.0, 120.0));
        gallery.pane_mut(0).unwrap().wheel(vec2(0.0, 120.0));
        gallery.dispatch();
        assert!(gallery.zoom().value() < start);

        let before = gallery.zoom().value();
        gallery.pane_mut(0).unwrap().wheel(vec2(30.0, 0.0));
        gallery.dispatch();
        assert_eq!(gallery.zoom().value(), before);
    }

    #[test]
    fn zoom_change_rescales_every_pane() {
        let mut gallery = gallery_with(&[(200.0, 100.0), (100.0, 50.0)]);
        gallery.zoom_mut().set(2.0).unwrap();
        gallery.dispatch();

        let value = gallery.zoom().value();
        for pane in gallery.panes() {
            assert_eq!(pane.scale(), Vec2::splat(value));
        }
        let second = gallery.pane(1).unwrap();
        assert_eq!(second.magnified_size(), vec2(100.0, 50.0) * value);
    }

    #[test]
    fn new_panes_inherit_current_zoom() {
        let mut gallery = gallery_with(&[]);
        gallery.zoom_mut().set(2.5).unwrap();
        gallery.dispatch();

        let id = gallery.add_pane(MagnifierSettings::default());
        let value = gallery.zoom().value();
        assert_eq!(gallery.pane(id).unwrap().scale(), Vec2::splat(value));
    }

    #[test]
    fn move_from_unmeasured_pane_is_dropped() {
        let mut gallery = gallery_with(&[(200.0, 100.0)]);
        let id = gallery.add_pane(MagnifierSettings::default());

        // Not measured, so the pane itself never emits a move.
        gallery.pane_mut(id).unwrap().pointer_moved(pos2(10.0, 10.0));
        assert_eq!(gallery.dispatch(), 0);
        assert_eq!(gallery.pane(0).unwrap().cursor(), None);
    }

    #[test]
    fn dispatch_counts_handled_signals() {
        let mut gallery = gallery_with(&[(200.0, 100.0)]);
        assert_eq!(gallery.dispatch(), 0);

        gallery.pane_mut(0).unwrap().pointer_entered();
        gallery.pane_mut(0).unwrap().wheel(vec2(0.0, -1.0));
        // enter + wheel + the resulting zoom change
        assert_eq!(gallery.dispatch(), 3);
    }
}
