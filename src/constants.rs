//! Shared UI constants such as colors, panel sizing, and timeline tuning.

pub const BG_DEEPEST: &str = "#09090b";
pub const BG_BASE: &str = "#0a0a0b";
pub const BG_ELEVATED: &str = "#141414";
pub const BG_SURFACE: &str = "#1a1a1a";
pub const BG_HOVER: &str = "#262626";

pub const BORDER_SUBTLE: &str = "#1f1f1f";
pub const BORDER_DEFAULT: &str = "#27272a";
pub const BORDER_STRONG: &str = "#3f3f46";

pub const TEXT_PRIMARY: &str = "#fafafa";
pub const TEXT_SECONDARY: &str = "#a1a1aa";
pub const TEXT_MUTED: &str = "#71717a";
pub const TEXT_DIM: &str = "#52525b";

pub const ACCENT_VIDEO: &str = "#22c55e";
pub const ACCENT_IMAGE: &str = "#3b82f6";

// Panel dimensions
pub const PANEL_MIN_WIDTH: f64 = 180.0;
pub const PANEL_MAX_WIDTH: f64 = 400.0;
pub const PANEL_DEFAULT_WIDTH: f64 = 250.0;
pub const TIMELINE_DEFAULT_HEIGHT: f64 = 260.0;
pub const TIMELINE_COLLAPSED_HEIGHT: f64 = 32.0; // Must match header height exactly

// Timeline clip durations. Generated media is never probed; every image is
// held for a fixed 2 seconds and every video occupies a fixed 5-second slot.
pub const IMAGE_CLIP_DURATION_SECONDS: f64 = 2.0;
pub const VIDEO_CLIP_DURATION_SECONDS: f64 = 5.0;

// Zoom bounds (pixels per second of timeline content)
pub const PIXELS_PER_SECOND_DEFAULT: f64 = 80.0;
pub const PIXELS_PER_SECOND_MIN: f64 = 40.0;
pub const PIXELS_PER_SECOND_MAX: f64 = 240.0;

// Fixed timebase and format block for FCP7 XML export
pub const EXPORT_TIMEBASE_FPS: u32 = 30;
pub const EXPORT_SEQUENCE_WIDTH: u32 = 1920;
pub const EXPORT_SEQUENCE_HEIGHT: u32 = 1080;

pub const PLAYBACK_TICK_MS: u64 = 16;
pub const GENERATION_POLL_INTERVAL_MS: u64 = 2000;
pub const GENERATION_POLL_MAX_ATTEMPTS: u32 = 240;
