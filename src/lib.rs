//! Synchronized image magnifier core.
//!
//! A [`Gallery`] owns a set of [`Pane`]s and one shared [`ZoomLevel`]. Panes
//! report pointer activity through [`PaneEvent`] signals, the gallery fans
//! those out to every pane and keeps their magnified crops in lockstep.

pub mod gallery;
pub mod pane;
pub mod settings;
pub mod signal;
pub mod zoom;

pub use gallery::{Gallery, PaneId};
pub use pane::{CropTransform, Pane, PaneEvent, SourceImage};
pub use settings::{MagnifierSettings, Settings, SettingsError, ZoomSettings};
pub use signal::Signal;
pub use zoom::{ZoomError, ZoomEvent, ZoomLevel};
