//! Color constants for the magnifier overlay and pane chrome.

use eframe::egui::Color32;

// Cursor indicator
pub const REGION_STROKE: Color32 = Color32::from_rgb(255, 215, 0);
pub const REGION_SHADOW: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 160);

// Zoom frame
pub const VIEWPORT_FILL: Color32 = Color32::from_rgb(24, 24, 24);
pub const VIEWPORT_STROKE: Color32 = Color32::from_rgb(230, 230, 230);

// Empty pane
pub const PANE_BACKGROUND: Color32 = Color32::from_rgb(32, 32, 36);
pub const PLACEHOLDER_TEXT: Color32 = Color32::from_rgb(150, 150, 150);
