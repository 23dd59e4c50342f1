//! Background image decoding.

use eframe::egui;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use thiserror::Error;
use twin_loupe::PaneId;

/// Errors that can occur when loading and decoding images.
#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode image '{path}': {source}")]
    DecodeError {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Decoded image data ready for texture creation.
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// An image being decoded for a pane in a background thread.
pub struct PendingImage {
    pub pane: PaneId,
    pub path: PathBuf,
    pub rx: mpsc::Receiver<Result<DecodedImage, ImageLoadError>>,
}

impl PendingImage {
    /// Starts decoding `path` and requests a repaint once it is done.
    pub fn spawn(ctx: &egui::Context, pane: PaneId, path: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();
        let ctx = ctx.clone();
        let thread_path = path.clone();

        thread::spawn(move || {
            let result = load_and_decode_image(&thread_path);
            let _ = tx.send(result);
            ctx.request_repaint();
        });

        Self { pane, path, rx }
    }

    /// Name shown for the image, the file name when there is one.
    pub fn display_name(&self) -> String {
        match self.path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.path.display().to_string(),
        }
    }
}

/// Reads and decodes an image file into RGBA8 pixels.
pub fn load_and_decode_image(path: &Path) -> Result<DecodedImage, ImageLoadError> {
    let bytes = std::fs::read(path).map_err(|source| ImageLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let img = image::load_from_memory(&bytes).map_err(|source| ImageLoadError::DecodeError {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(DecodedImage {
        pixels: rgba.into_raw(),
        width,
        height,
    })
}
