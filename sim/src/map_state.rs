//! Character ownership and the per-frame tick loop.
//!
//! Characters live in a slot arena; the slot index is the stable id used
//! everywhere (the registry, the collaborator traits, lookups from event
//! commands). Slots 0..=3 are reserved for the hero and the three vehicles
//! and exist for the lifetime of the map; events are spawned into the slots
//! above as their pages activate and freed again on page change.

use rand::rngs::StdRng;
use rand::SeedableRng;

use rpg2k_core::constants::{CHAR_AIRSHIP, CHAR_BOAT, CHAR_PLAYER, CHAR_SHIP, CHAR_THIS_EVENT};
use rpg2k_core::types::VehicleKind;

use crate::character::{Character, Role};
use crate::env::Env;

/// Stable character id: the arena slot index.
pub type CharId = usize;

pub const HERO: CharId = 0;
pub const BOAT: CharId = 1;
pub const SHIP: CharId = 2;
pub const AIRSHIP: CharId = 3;

const FIRST_EVENT_SLOT: CharId = 4;

/// All characters on the current map plus the pending-move registry and the
/// map-local random stream.
pub struct MapState {
    pub(crate) characters: Vec<Character>,
    /// Ids of characters currently executing a forced move route.
    pending_moves: Vec<CharId>,
    pub(crate) rng: StdRng,
}

impl MapState {
    pub fn new() -> MapState {
        MapState::with_rng(StdRng::from_entropy())
    }

    /// Deterministic construction for tests and replays.
    pub fn with_rng_seed(seed: u64) -> MapState {
        MapState::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> MapState {
        let mut characters = Vec::with_capacity(FIRST_EVENT_SLOT);

        let mut hero = Character::new(Role::Hero);
        hero.used = true;
        characters.push(hero);

        for kind in [VehicleKind::Boat, VehicleKind::Ship, VehicleKind::Airship] {
            let mut vehicle = Character::new(Role::Vehicle(kind));
            vehicle.used = true;
            characters.push(vehicle);
        }

        MapState {
            characters,
            pending_moves: Vec::new(),
            rng,
        }
    }

    // ── Arena ───────────────────────────────────────────────────────────

    /// Place an event character on the map, reusing the first free slot.
    pub fn spawn_event(&mut self, event_id: i32, mut character: Character) -> CharId {
        character.role = Role::Event { event_id };
        character.used = true;

        let id = match self.characters[FIRST_EVENT_SLOT..]
            .iter()
            .position(|slot| !slot.used)
        {
            Some(free) => {
                let id = FIRST_EVENT_SLOT + free;
                self.characters[id] = character;
                id
            }
            None => {
                self.characters.push(character);
                self.characters.len() - 1
            }
        };

        log::debug!("spawned event {} as character {}", event_id, id);
        id
    }

    /// Free an event slot. The id leaves the pending-move registry here,
    /// and only here, so removal happens exactly once.
    pub fn remove_character(&mut self, id: CharId) {
        if id < FIRST_EVENT_SLOT {
            log::warn!("refusing to remove reserved character {}", id);
            return;
        }
        if !self.characters[id].used {
            return;
        }

        self.remove_pending_move(id);
        self.characters[id].used = false;
        log::debug!("removed character {}", id);
    }

    pub fn get(&self, id: CharId) -> Option<&Character> {
        self.characters.get(id).filter(|ch| ch.used)
    }

    pub fn get_mut(&mut self, id: CharId) -> Option<&mut Character> {
        self.characters.get_mut(id).filter(|ch| ch.used)
    }

    pub fn hero(&self) -> &Character {
        &self.characters[HERO]
    }

    pub fn hero_mut(&mut self) -> &mut Character {
        &mut self.characters[HERO]
    }

    pub fn get_vehicle(&self, kind: VehicleKind) -> CharId {
        match kind {
            VehicleKind::Boat => BOAT,
            VehicleKind::Ship => SHIP,
            VehicleKind::Airship => AIRSHIP,
        }
    }

    /// Live events in arena order.
    pub fn events(&self) -> impl Iterator<Item = (i32, CharId)> + '_ {
        self.characters
            .iter()
            .enumerate()
            .filter(|(_, ch)| ch.used)
            .filter_map(|(id, ch)| match ch.role {
                Role::Event { event_id } => Some((event_id, id)),
                _ => None,
            })
    }

    pub fn event_by_id(&self, event_id: i32) -> Option<CharId> {
        self.events()
            .find(|(eid, _)| *eid == event_id)
            .map(|(_, id)| id)
    }

    /// Resolve an authored character reference. `event_id` identifies the
    /// event whose command is asking, for the "this event" code.
    pub fn lookup_character(&self, character_id: i32, event_id: i32) -> Option<CharId> {
        match character_id {
            CHAR_PLAYER => Some(HERO),
            CHAR_BOAT => Some(BOAT),
            CHAR_SHIP => Some(SHIP),
            CHAR_AIRSHIP => Some(AIRSHIP),
            CHAR_THIS_EVENT => self.event_by_id(event_id),
            other => self.event_by_id(other),
        }
    }

    // ── Pending-move registry ───────────────────────────────────────────

    pub(crate) fn add_pending_move(&mut self, id: CharId) {
        self.pending_moves.push(id);
    }

    pub(crate) fn remove_pending_move(&mut self, id: CharId) {
        self.pending_moves.retain(|pending| *pending != id);
    }

    pub fn has_pending_move(&self, id: CharId) -> bool {
        self.pending_moves.contains(&id)
    }

    /// Characters whose forced route is still running.
    pub fn pending_moves(&self) -> &[CharId] {
        &self.pending_moves
    }

    // ── Tick ────────────────────────────────────────────────────────────

    /// Advance the whole map one logical frame. Characters update in arena
    /// order, which is fixed for the lifetime of the map.
    pub fn tick(&mut self, env: &mut Env) {
        for id in 0..self.characters.len() {
            if self.characters[id].used {
                self.update_character(id, env);
            }
        }
    }

    /// One character frame: animation, locomotion or jump, wait
    /// consumption, then the idle dispatcher.
    pub fn update_character(&mut self, id: CharId, env: &mut Env) {
        let ch = &mut self.characters[id];

        if ch.is_jumping() {
            ch.update_jump();
            if ch.is_spinning() {
                ch.anime_count += 1;
            }
        } else if ch.is_continuous() || ch.is_spinning() {
            ch.update_move();
            ch.update_stop();
        } else if ch.is_moving() {
            ch.update_move();
        } else {
            ch.update_stop();
        }

        if ch.anime_count >= ch.stepping_speed() {
            ch.advance_pattern();
        }

        if ch.wait_count > 0 {
            ch.wait_count -= 1;
            return;
        }

        if ch.stop_count < ch.max_stop_count {
            return;
        }

        if self.characters[id].move_route_overwritten {
            self.move_type_custom(id, env);
        } else if !env.is_message_blocking() && !env.map.is_interpreter_running() {
            self.update_self_movement(id, env);
        }
    }
}

impl Default for MapState {
    fn default() -> MapState {
        MapState::new()
    }
}
