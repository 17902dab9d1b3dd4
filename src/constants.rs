// --- Game Constants ---
pub const WORLD_WIDTH: f64 = 400.0;
pub const WORLD_HEIGHT: f64 = 300.0;

pub const SHIP_TURN_RATE: f64 = std::f64::consts::PI / 30.0; // Radians per tick
pub const SHIP_THRUST: f64 = 0.05;
pub const SHIP_MAX_SPEED: f64 = 5.0; // Thrust that would reach this is dropped
pub const SHIP_BASE_WIDTH: f64 = 32.0;
pub const SHIP_DEBUG_WIDTH: f64 = 128.0; // Oversized glyph for headless inspection
pub const SHIP_BLOB_GAP: f64 = 1.0;

pub const BULLET_SPEED: f64 = 5.0;
pub const BULLET_TICKS: u32 = 100; // Ticks before a bullet expires
pub const MAX_LIVE_BULLETS: usize = 5;
pub const SHOT_COOLDOWN_MS: u64 = 50;

pub const ASTEROID_POINT_COUNT: usize = 10;
pub const ASTEROID_SPLIT_STEP: f64 = 10.0;
pub const ASTEROID_MIN_SPLIT_RADIUS: f64 = 10.0; // At or below this, no children

pub const DEBRIS_TICKS: u32 = 100;

pub const FRAME_MS: u64 = 16; // Synthetic clock step for headless runs
