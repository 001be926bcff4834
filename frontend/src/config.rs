use log::Level;

/// localStorage key holding the serialized join record.
pub const JOIN_RECORD_KEY: &str = "landing.joinRecord";

// Signup prompt timing
pub const SHOW_DELAY_MS: u32 = 6_000;
pub const SHOW_SCROLL_RATIO: f64 = 0.45;
pub const ACCEPT_DELAY_MS: u32 = 900;
pub const CLOSE_DELAY_MS: u32 = 1_400;

pub const MIN_AGE: i32 = 13;
pub const MAX_AGE: i32 = 19;

pub const ROTATE_INTERVAL_MS: u32 = 3_000;

/// Fraction of an element that must be on screen before it is revealed.
pub const REVEAL_THRESHOLD: f64 = 0.12;

pub const NAV_THROTTLE_MS: u32 = 120;
pub const NAV_OFFSET_RATIO: f64 = 0.28;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug  // Verbose when running locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}
