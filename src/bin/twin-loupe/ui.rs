//! UI rendering methods for the Twin Loupe application.

use crate::TwinLoupeApp;
use crate::colors;
use crate::constants::{
    MAGNIFIER_STROKE_WIDTH, PANE_PADDING, ZOOM_CONTROLS_MARGIN, ZOOM_CONTROLS_SIZE,
};
use eframe::egui;
use twin_loupe::{CropTransform, PaneId};

const FULL_UV: egui::Rect = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));

impl TwinLoupeApp {
    /// Handles keyboard shortcuts for zoom.
    pub fn handle_keyboard_input(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let initial_zoom = self.initial_zoom;
        let zoom = self.gallery.zoom_mut();
        ctx.input(|i| {
            if i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals) {
                zoom.step_forward();
            }
            if i.key_pressed(egui::Key::Minus) {
                zoom.step_back();
            }
            if i.key_pressed(egui::Key::Num0) {
                zoom.set_clamped(initial_zoom);
            }
        });
    }

    /// Routes dropped files to panes: the first to the pane under the
    /// pointer (or the first free pane, or pane 0), the rest to free panes.
    pub fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let mut target = self.drop_target;

        for (index, file) in dropped.into_iter().enumerate() {
            let Some(path) = file.path else {
                log::warn!("Ignoring dropped item without a file path: {}", file.name);
                continue;
            };

            let fallback = (index == 0).then_some(0);
            let Some(pane) = target.take().or_else(|| self.next_free_pane()).or(fallback) else {
                log::warn!("No free pane for {}", path.display());
                continue;
            };
            self.request_image(ctx, pane, path);
        }
    }

    /// Renders the bottom status bar with controls hint and the zoom value.
    pub fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Hover: magnify | Scroll, +/-: zoom | 0: reset zoom | Drop files onto a pane");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(self.gallery.zoom().label());
                });
            });
        });
    }

    /// Renders the central panel: one column per pane plus the zoom controls.
    pub fn show_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let panel_rect = ui.max_rect();
            self.drop_target = None;

            ui.columns(self.gallery.len(), |columns| {
                for (id, column) in columns.iter_mut().enumerate() {
                    self.show_pane(column, id);
                }
            });

            self.show_zoom_controls(ctx, panel_rect);
        });
    }

    /// Renders the floating zoom controls panel.
    fn show_zoom_controls(&mut self, ctx: &egui::Context, panel_rect: egui::Rect) {
        let anchor_pos = egui::pos2(
            panel_rect.right() - ZOOM_CONTROLS_SIZE[0] - ZOOM_CONTROLS_MARGIN,
            panel_rect.bottom() - ZOOM_CONTROLS_SIZE[1] - ZOOM_CONTROLS_MARGIN,
        );
        let initial_zoom = self.initial_zoom;

        egui::Area::new(egui::Id::new("zoom_controls"))
            .fixed_pos(anchor_pos)
            .interactable(true)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(ui.style().visuals.window_fill.gamma_multiply(0.95))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            let zoom = self.gallery.zoom_mut();

                            if ui
                                .add_enabled(!zoom.is_min(), egui::Button::new("−"))
                                .on_hover_text("Zoom out (-)")
                                .clicked()
                            {
                                zoom.step_back();
                            }

                            let mut value = zoom.value();
                            let slider = egui::Slider::new(&mut value, zoom.min()..=zoom.max())
                                .step_by(f64::from(zoom.step()))
                                .show_value(false);
                            if ui.add(slider).changed() {
                                zoom.set_clamped(value);
                            }

                            if ui
                                .add_enabled(!zoom.is_max(), egui::Button::new("+"))
                                .on_hover_text("Zoom in (+)")
                                .clicked()
                            {
                                zoom.step_forward();
                            }

                            ui.label(zoom.label());

                            if ui.button("Reset").on_hover_text("Reset zoom (0)").clicked() {
                                zoom.set_clamped(initial_zoom);
                            }
                        });
                    });
            });
    }

    /// Lays out one pane, draws its image and turns pointer input into
    /// pane signals.
    fn show_pane(&mut self, ui: &mut egui::Ui, id: PaneId) {
        let (area, _) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
        ui.painter().rect_filled(area, 4.0, colors::PANE_BACKGROUND);
        let area = area.shrink(PANE_PADDING);

        let pointer = ui.input(|i| i.pointer.hover_pos());
        if pointer.is_some_and(|p| area.contains(p)) {
            self.drop_target = Some(id);
        }

        let loading = self.is_loading(id);
        let Some(pane) = self.gallery.pane_mut(id) else {
            return;
        };

        let source = pane.source().map(|source| (source.texture, source.size));
        let Some((texture, [width, height])) = source.filter(|(_, [w, h])| *w > 0 && *h > 0)
        else {
            if pane.is_hovered() {
                pane.pointer_left();
            }
            if loading {
                ui.put(area, egui::Spinner::new());
            } else {
                ui.painter().text(
                    area.center(),
                    egui::Align2::CENTER_CENTER,
                    "Drop an image here",
                    egui::FontId::proportional(16.0),
                    colors::PLACEHOLDER_TEXT,
                );
            }
            return;
        };

        // Fit the image into the pane, keeping its aspect ratio.
        let image_size = egui::vec2(width as f32, height as f32);
        let fit_scale = (area.width() / image_size.x).min(area.height() / image_size.y);
        let display_rect = egui::Rect::from_center_size(area.center(), image_size * fit_scale);

        if pane.display_rect() != Some(display_rect) {
            pane.resize(display_rect, egui::Vec2::ZERO);
        }

        ui.painter().image(texture, display_rect, FULL_UV, egui::Color32::WHITE);

        let inside = ui.rect_contains_pointer(display_rect);
        match (inside, pane.is_hovered()) {
            (true, false) => pane.pointer_entered(),
            (false, true) => pane.pointer_left(),
            _ => {}
        }

        if inside {
            if let Some(pos) = pointer {
                pane.pointer_moved(pos);
            }
            // egui reports wheel-up as positive; panes expect web convention.
            let scroll = ui.input(|i| i.raw_scroll_delta);
            if scroll != egui::Vec2::ZERO {
                pane.wheel(-scroll);
            }
        }
    }

    /// Paints every visible magnifier above the panes.
    pub fn show_magnifiers(&self, ctx: &egui::Context) {
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("magnifiers"),
        ));

        for pane in self.gallery.panes() {
            if !pane.is_magnifier_visible() {
                continue;
            }
            let (Some(source), Some(rect), Some(crop)) =
                (pane.source(), pane.display_rect(), pane.crop())
            else {
                continue;
            };
            paint_magnifier(&painter, source.texture, crop.translate(rect.min.to_vec2()));
        }
    }
}

/// Draws the cursor indicator and the zoom frame with its magnified crop.
fn paint_magnifier(painter: &egui::Painter, texture: egui::TextureId, crop: CropTransform) {
    painter.rect_stroke(
        crop.region,
        0.0,
        egui::Stroke::new(MAGNIFIER_STROKE_WIDTH + 1.0, colors::REGION_SHADOW),
        egui::StrokeKind::Outside,
    );
    painter.rect_stroke(
        crop.region,
        0.0,
        egui::Stroke::new(MAGNIFIER_STROKE_WIDTH, colors::REGION_STROKE),
        egui::StrokeKind::Inside,
    );

    painter.rect_filled(crop.viewport, 2.0, colors::VIEWPORT_FILL);
    painter.with_clip_rect(crop.viewport).image(
        texture,
        crop.magnified_rect(),
        FULL_UV,
        egui::Color32::WHITE,
    );
    painter.rect_stroke(
        crop.viewport,
        2.0,
        egui::Stroke::new(MAGNIFIER_STROKE_WIDTH, colors::VIEWPORT_STROKE),
        egui::StrokeKind::Outside,
    );
}
