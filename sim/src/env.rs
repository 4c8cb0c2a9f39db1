//! External collaborator interfaces.
//!
//! The simulation consumes its surroundings through the traits below; the
//! full runtime wires them to the tilemap, the event interpreter, the
//! message window, the switch table and the mixer. Tests substitute small
//! stubs.

use rpg2k_core::types::Direction;

use crate::map_state::CharId;

/// Terrain, camera and interpreter state of the current map.
///
/// `is_passable`/`is_landable` cover tile attributes and event-vs-event
/// blocking; the hero-occupancy rule is layered on top by the simulation
/// itself.
pub trait MapBackend {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    fn loop_horizontal(&self) -> bool;
    fn loop_vertical(&self) -> bool;

    fn is_valid(&self, x: i32, y: i32) -> bool;
    fn is_passable(&self, x: i32, y: i32, dir: Direction, who: CharId) -> bool;
    fn is_landable(&self, x: i32, y: i32, who: CharId) -> bool;

    fn bush_depth(&self, x: i32, y: i32) -> i32;

    /// Camera offset in subpixels.
    fn display_x(&self) -> i32;
    fn display_y(&self) -> i32;

    /// True while the map-scope event interpreter is executing; idle
    /// self-movement is suspended then.
    fn is_interpreter_running(&self) -> bool;

    /// Request an event-page refresh (raised by switch commands).
    fn set_need_refresh(&mut self, need_refresh: bool);

    /// Identity off-loop, wraps into `0..width` on a horizontally looping
    /// map.
    fn round_x(&self, x: i32) -> i32 {
        if self.loop_horizontal() {
            x.rem_euclid(self.width())
        } else {
            x
        }
    }

    /// Identity off-loop, wraps into `0..height` on a vertically looping
    /// map.
    fn round_y(&self, y: i32) -> i32 {
        if self.loop_vertical() {
            y.rem_euclid(self.height())
        } else {
            y
        }
    }
}

/// Sound-effect playback.
pub trait AudioBackend {
    fn se_play(&mut self, file: &str, volume: i32, tempo: i32);
}

/// The game-wide boolean switch table. Only written from here; the event
/// interpreter owns reads.
pub trait SwitchBackend {
    fn set_switch(&mut self, switch_id: i32, on: bool);
}

/// Message-window state consulted before idle dispatch.
pub trait MessageState {
    fn is_message_waiting(&self) -> bool;
    /// Whether events keep running while a message is displayed.
    fn continue_events(&self) -> bool;
}

/// Role-specific hooks owned by the outer runtime: the hero's step
/// bookkeeping and the touch-trigger check that runs when a character bumps
/// into a blocked cell.
pub trait RoleHooks {
    /// A character committed a step onto a new tile.
    fn begin_move(&mut self, _id: CharId) {}

    /// A step by `id` was blocked; `(x, y)` is the cell it bumped into.
    /// Return true when a touch event fired there.
    fn check_event_trigger_touch(&mut self, _id: CharId, _x: i32, _y: i32) -> bool {
        false
    }
}

/// No-op hooks for roles without any, and for tests.
pub struct NullHooks;

impl RoleHooks for NullHooks {}

/// Bundle of collaborator borrows threaded through one tick.
pub struct Env<'a> {
    pub map: &'a mut dyn MapBackend,
    pub audio: &'a mut dyn AudioBackend,
    pub switches: &'a mut dyn SwitchBackend,
    pub message: &'a dyn MessageState,
    pub hooks: &'a mut dyn RoleHooks,
}

impl<'a> Env<'a> {
    /// A displayed message blocks idle dispatch unless events are allowed
    /// to continue underneath it.
    pub(crate) fn is_message_blocking(&self) -> bool {
        self.message.is_message_waiting() && !self.message.continue_events()
    }
}
