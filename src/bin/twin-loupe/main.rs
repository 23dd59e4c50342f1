#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod assets;
mod colors;
mod constants;
mod ui;

use assets::{DecodedImage, ImageLoadError, PendingImage};
use clap::Parser;
use constants::{ERROR_TOAST_SECONDS, WINDOW_SIZE};
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::path::PathBuf;
use std::sync::mpsc::TryRecvError;
use twin_loupe::{Gallery, PaneId, Settings, SourceImage, ZoomLevel};

/// Magnify several images side by side with one shared zoom level.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Images to open, one per pane in order.
    images: Vec<PathBuf>,
    /// Number of panes; defaults to the settings file, at least one per image.
    #[arg(long)]
    panes: Option<usize>,
    /// Initial zoom level.
    #[arg(long)]
    zoom: Option<f32>,
    /// Settings file to use instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Main application state for the Twin Loupe viewer.
pub struct TwinLoupeApp {
    gallery: Gallery,
    /// Zoom value restored by the reset shortcut.
    initial_zoom: f32,
    pending: Vec<PendingImage>,
    /// Keeps each pane's texture alive; indexed by pane id.
    textures: Vec<Option<TextureHandle>>,
    /// Pane under the pointer this frame, where dropped files go.
    drop_target: Option<PaneId>,
    toasts: Toasts,
}

impl TwinLoupeApp {
    fn new(cc: &eframe::CreationContext<'_>, cli: Cli) -> Self {
        let toasts = Toasts::new()
            .anchor(egui::Align2::RIGHT_TOP, (-10.0, 10.0))
            .direction(egui::Direction::TopDown);
        let mut startup_errors = Vec::new();

        let loaded = match &cli.config {
            Some(path) => Settings::load_from_path(path),
            None => Settings::load(),
        };
        let mut settings = loaded.unwrap_or_else(|err| {
            log::warn!("Using default settings: {err}");
            startup_errors.push(err.to_string());
            Settings::default()
        });
        if let Some(zoom) = cli.zoom {
            settings.zoom.initial = zoom;
        }

        let zoom = ZoomLevel::from_settings(&settings.zoom).unwrap_or_else(|err| {
            log::warn!("Using default zoom range: {err}");
            startup_errors.push(err.to_string());
            ZoomLevel::default()
        });
        let initial_zoom = zoom.value();

        let pane_count = cli
            .panes
            .unwrap_or_else(|| settings.panes.max(cli.images.len()))
            .max(1);
        let mut gallery = Gallery::new(zoom);
        for _ in 0..pane_count {
            gallery.add_pane(settings.magnifier.clone());
        }
        log::info!("Starting with {pane_count} panes at zoom {initial_zoom}");

        let mut app = Self {
            gallery,
            initial_zoom,
            pending: Vec::new(),
            textures: vec![None; pane_count],
            drop_target: None,
            toasts,
        };

        for err in startup_errors {
            app.show_error(err);
        }

        if cli.images.len() > pane_count {
            log::warn!(
                "{} images given for {pane_count} panes; ignoring the rest",
                cli.images.len()
            );
        }
        for (pane, path) in cli.images.into_iter().take(pane_count).enumerate() {
            app.request_image(&cc.egui_ctx, pane, path);
        }

        app
    }

    /// Starts decoding `path` for `pane`; a newer request for the same pane wins.
    fn request_image(&mut self, ctx: &egui::Context, pane: PaneId, path: PathBuf) {
        log::info!("Loading {} into pane {pane}", path.display());
        self.pending.retain(|pending| pending.pane != pane);
        self.pending.push(PendingImage::spawn(ctx, pane, path));
    }

    /// Polls background decoders and installs finished images.
    fn poll_pending_images(&mut self, ctx: &egui::Context) {
        let mut finished = Vec::new();

        self.pending.retain(|pending| match pending.rx.try_recv() {
            Err(TryRecvError::Empty) => true,
            result => {
                finished.push((pending.pane, pending.display_name(), result));
                false
            }
        });

        for (pane, name, result) in finished {
            match result {
                Ok(Ok(decoded)) => self.install_image(ctx, pane, name, decoded),
                Ok(Err(err)) => self.report_load_error(&err),
                Err(_) => {
                    let msg = format!("{name}: decoder thread disconnected");
                    log::error!("{msg}");
                    self.show_error(msg);
                }
            }
        }
    }

    fn install_image(
        &mut self,
        ctx: &egui::Context,
        pane: PaneId,
        name: String,
        decoded: DecodedImage,
    ) {
        let image = ColorImage::from_rgba_unmultiplied(
            [decoded.width as usize, decoded.height as usize],
            &decoded.pixels,
        );
        let texture = ctx.load_texture(name.clone(), image, TextureOptions::LINEAR);

        if let Some(target) = self.gallery.pane_mut(pane) {
            target.set_image(SourceImage {
                texture: texture.id(),
                size: [decoded.width, decoded.height],
                name,
            });
        }
        if let Some(slot) = self.textures.get_mut(pane) {
            *slot = Some(texture);
        }
    }

    fn report_load_error(&mut self, err: &ImageLoadError) {
        log::error!("{err}");
        self.show_error(err.to_string());
    }

    fn show_error(&mut self, text: String) {
        self.toasts.add(Toast {
            kind: ToastKind::Error,
            text: text.into(),
            options: ToastOptions::default()
                .duration_in_seconds(ERROR_TOAST_SECONDS)
                .show_icon(true),
            ..Default::default()
        });
    }

    fn is_loading(&self, pane: PaneId) -> bool {
        self.pending.iter().any(|pending| pending.pane == pane)
    }

    /// First pane with neither an image nor a load in flight.
    fn next_free_pane(&self) -> Option<PaneId> {
        (0..self.gallery.len()).find(|&id| {
            !self.is_loading(id) && self.gallery.pane(id).is_some_and(|pane| !pane.has_image())
        })
    }
}

impl eframe::App for TwinLoupeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_pending_images(ctx);
        self.handle_keyboard_input(ctx);
        self.handle_dropped_files(ctx);

        self.show_status_bar(ctx);
        self.show_central_panel(ctx);

        // Pane input and zoom controls only emit signals; react before painting.
        self.gallery.dispatch();
        self.show_magnifiers(ctx);

        self.toasts.show(ctx);
    }
}

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Twin Loupe",
        options,
        Box::new(move |cc| Ok(Box::new(TwinLoupeApp::new(cc, cli)))),
    )
}
