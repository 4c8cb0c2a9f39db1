//! Engine constants shared between the data model and the simulation.

// =============================================================================
// Timing
// =============================================================================

/// Logical simulation frames per second.
pub const TICKS: i32 = 60;

/// Ticks added to a character's wait counter by the `wait` move command.
pub const WAIT_TICKS: i32 = 20;

// =============================================================================
// Tile metrics
// =============================================================================

/// Width/height of a tile in screen pixels.
pub const TILE_SIZE: i32 = 16;

/// Width of a tile in subpixels: 16 subpixels per tile pixel, 16 pixels per
/// tile. A whole-tile step consumes this many units of `remaining_step`.
pub const SCREEN_TILE_WIDTH: i32 = 256;

// =============================================================================
// Character tuning bounds
// =============================================================================

pub const MIN_MOVE_SPEED: i32 = 1;
pub const MAX_MOVE_SPEED: i32 = 6;

pub const MIN_MOVE_FREQUENCY: i32 = 1;
pub const MAX_MOVE_FREQUENCY: i32 = 8;

pub const MIN_OPACITY: i32 = 0;
pub const MAX_OPACITY: i32 = 255;

/// Opacity change applied by the transparency move commands.
pub const TRANSP_STEP: i32 = 45;

/// Increasing transparency never drops opacity below this floor.
pub const TRANSP_FLOOR: i32 = 40;

/// Manhattan distance at which the toward/away policies stop homing on the
/// hero and fall back to random movement.
pub const HERO_CHASE_RANGE: i32 = 20;

// =============================================================================
// Character lookup codes (bit-stable, as stored in authored event commands)
// =============================================================================

pub const CHAR_PLAYER: i32 = 10001;
pub const CHAR_BOAT: i32 = 10002;
pub const CHAR_SHIP: i32 = 10003;
pub const CHAR_AIRSHIP: i32 = 10004;
pub const CHAR_THIS_EVENT: i32 = 10005;

// =============================================================================
// Audio
// =============================================================================

/// File names that mean "no sound" in authored `play_sound_effect` commands.
pub const SE_OFF_SENTINELS: [&str; 2] = ["(OFF)", "(Brak)"];
