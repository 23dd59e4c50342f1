/// Initial window size in logical pixels.
pub const WINDOW_SIZE: [f32; 2] = [1280.0, 720.0];

/// Gap between pane columns and around the central panel content.
pub const PANE_PADDING: f32 = 8.0;

/// Distance of the floating zoom controls from the panel corner.
pub const ZOOM_CONTROLS_MARGIN: f32 = 12.0;

/// Approximate size of the floating zoom controls, used to anchor them.
pub const ZOOM_CONTROLS_SIZE: [f32; 2] = [260.0, 36.0];

/// Width of the stroke around the cursor indicator and zoom frame.
pub const MAGNIFIER_STROKE_WIDTH: f32 = 1.5;

/// How long error toasts stay on screen.
pub const ERROR_TOAST_SECONDS: f64 = 8.0;
