//! Engine-wide constants.
//!
//! These are the defaults behind [`EditorConfig`](crate::config::EditorConfig);
//! sizes are in stage (image pixel) units unless noted otherwise.

/// Minimum width and height of a drawn or resized mask.
pub const MIN_MASK_SIZE: f32 = 5.0;

/// Minimum width and height of a crop rectangle.
pub const MIN_CROP_SIZE: f32 = 5.0;

/// Minimum width and height of a drawn or resized text box.
pub const MIN_TEXT_SIZE: f32 = 40.0;

/// Smallest allowed stage scale.
pub const MIN_ZOOM: f32 = 0.1;

/// Largest allowed stage scale.
pub const MAX_ZOOM: f32 = 8.0;

/// Multiplicative step for zoom in/out.
pub const ZOOM_STEP: f32 = 1.2;

/// Maximum number of history entries kept.
pub const HISTORY_CAPACITY: usize = 50;

/// Hit radius for resize handles, in viewport pixels.
pub const HANDLE_HIT_RADIUS: f32 = 8.0;

/// Stage pixels moved by an arrow key nudge (multiplied with Shift held).
pub const NUDGE_STEP: f32 = 1.0;

/// Multiplier applied to [`NUDGE_STEP`] while Shift is held.
pub const NUDGE_FAST_MULTIPLIER: f32 = 10.0;

/// Padding between a text box edge and its burned-in text.
pub const TEXT_PADDING: f32 = 4.0;

/// Tolerance used when comparing normalized coordinates.
pub const NORM_EPSILON: f32 = 1e-6;

/// Text style defaults.
pub mod text {
    /// Font size in stage pixels.
    pub const FONT_SIZE: f32 = 24.0;
    /// Smallest accepted font size.
    pub const MIN_FONT_SIZE: f32 = 1.0;
    /// Largest accepted font size.
    pub const MAX_FONT_SIZE: f32 = 512.0;
    /// Text color (RGBA).
    pub const COLOR: [u8; 4] = [0, 0, 0, 255];
    /// Background fill (RGB); alpha comes from the opacity.
    pub const BACKGROUND: [u8; 3] = [255, 255, 255];
    /// Background opacity in `0.0..=1.0`.
    pub const BACKGROUND_OPACITY: f32 = 0.8;
}

/// System fonts tried when no font path is configured.
pub const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Helvetica.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];
