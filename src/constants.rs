//! This module contains global constants used across the panel, the renderer and the host.

/// The total width of the kiosk canvas in pixels.
pub const CANVAS_WIDTH: u32 = 640;
/// The total height of the kiosk canvas in pixels.
pub const CANVAS_HEIGHT: u32 = 480;

/// Height of one city row on the composite surface.
pub const ROW_HEIGHT: u32 = 72;
/// Rows per scroll "page".
pub const ROWS_PER_PAGE: u32 = 4;
/// Width of the composite (off-screen) surface.
pub const COMPOSITE_WIDTH: u32 = CANVAS_WIDTH;

/// Top of the scrolling viewport on the visible canvas.
pub const VIEWPORT_Y: i32 = 110;
/// Height of the scrolling viewport; four rows plus a one pixel sliver.
pub const VIEWPORT_HEIGHT: u32 = 289;

/// Counter units held before scrolling starts. Shared by the dwell schedule
/// and the scroll projector so scrolling begins as the first hold ends.
pub const SCROLL_LEAD: i64 = 150;
/// Final hold once the last page is on screen.
pub const TRAILING_HOLD: u32 = 150;
/// Default milliseconds per counter unit.
pub const BASE_DELAY_MS: u64 = 20;

// Composite row layout (baseline relative)
pub const ROW_BASELINE_Y: i32 = 50;
pub const CITY_NAME_X: i32 = 80;
pub const LOW_RIGHT_X: i32 = 500;
pub const HIGH_RIGHT_X: i32 = 560;
pub const ICON_X: i32 = 330;
pub const ICON_RAISE: i32 = 35;
pub const ICON_MAX_WIDTH: u32 = 47;
pub const PLACEHOLDER_X: i32 = 400;
pub const PLACEHOLDER_LINE_GAP: i32 = 18;

/// Height of each decorative gradient band repeated down the composite.
pub const GRADIENT_BAND_HEIGHT: u32 = 346;

// Header layout on the visible canvas
pub const TITLE_BAR_Y: i32 = 30;
pub const TITLE_BAR_WIDTH: u32 = 500;
pub const TITLE_BAR_HEIGHT: u32 = 60;
pub const COLUMN_LABEL_Y: i32 = 105;
pub const LOW_LABEL_X: i32 = 455;
pub const HIGH_LABEL_X: i32 = 510;

// Forecast client defaults
pub const FORECAST_BASE_URL: &str = "https://api.weather.gov";
pub const FORECAST_CONNECT_TIMEOUT_MS: u64 = 2_000;
pub const FORECAST_TIMEOUT_MS: u64 = 8_000;
pub const ENDPOINT_CACHE_SIZE: u64 = 64;

/// Default folder holding the icon svgs.
pub const ICON_FOLDER: &str = "./assets/travel/";

/// Counter units between icon animation frames.
pub const ICON_FRAME_UNITS: i64 = 10;
