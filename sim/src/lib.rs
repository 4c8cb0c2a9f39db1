//! Map-character simulation engine.
//!
//! One logical frame advances every live character on the map: walk-cycle
//! pattern, locomotion subpixels, jump arcs, wait timers, and the idle
//! dispatcher that runs self-movement policies and move-route programs. The
//! engine is a pure tick machine: it owns the characters and the
//! pending-move registry, and reaches everything else (tile passability,
//! camera, switches, audio, message window) through the narrow traits in
//! [`env`].
//!
//! The tick loop never fails. Blocked movement is reported in-band through
//! the character's `move_failed` flag, exactly as authored event scripts
//! expect.

pub mod character;
pub mod env;
pub mod map_state;

mod move_route;
mod movement;
mod self_movement;

#[cfg(test)]
mod testutil;

pub use character::{Character, Role};
pub use env::{AudioBackend, Env, MapBackend, MessageState, NullHooks, RoleHooks, SwitchBackend};
pub use map_state::{CharId, MapState, AIRSHIP, BOAT, HERO, SHIP};
