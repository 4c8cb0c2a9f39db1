//! Character state and the per-tick sub-machines that need no map access:
//! walk-cycle pattern, locomotion subpixels, and the jump arc. Anything that
//! consults the map or other characters lives on [`MapState`].
//!
//! [`MapState`]: crate::map_state::MapState

use bitflags::bitflags;

use rpg2k_core::constants::{MAX_OPACITY, MIN_OPACITY, SCREEN_TILE_WIDTH, TILE_SIZE, WAIT_TICKS};
use rpg2k_core::types::{AnimationType, Direction, Frame, Layer, MoveRoute, MoveType, VehicleKind};

use crate::env::MapBackend;

bitflags! {
    /// Persistent character options. Volatile machine state (jumping,
    /// move_failed, route bookkeeping) stays in plain fields.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CharacterFlags: u8 {
        /// Ignores passability and hero collision.
        const THROUGH = 0x01;
        /// Facing commands and steps no longer change the sprite facing.
        const FACING_LOCKED = 0x02;
        /// Walking advances the animation pattern.
        const WALK_ANIMATION = 0x04;
        const VISIBLE = 0x08;
    }
}

/// What a character is on the map. One struct serves all three; the role
/// only matters for lookup and for the hooks the outer runtime installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Hero,
    Vehicle(VehicleKind),
    Event { event_id: i32 },
}

/// Jump subpixel decrement per tick, indexed by `move_speed - 1`:
/// `48 / (2 + 2^(3-s))` for speeds below 5 (integer arithmetic, so speed 4
/// divides by 2), `64 / (7-s)` above.
const JUMP_STEP: [i32; 6] = [8, 12, 16, 24, 32, 64];

/// A map character: the hero, an event, or a vehicle.
#[derive(Debug, Clone)]
pub struct Character {
    pub(crate) used: bool,
    pub(crate) role: Role,

    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) direction: Direction,
    pub(crate) sprite_direction: Direction,

    pub(crate) pattern: Frame,
    pub(crate) original_pattern: Frame,
    /// Which extreme frame the walk cycle visited last.
    pub(crate) last_pattern: Frame,
    pub(crate) animation_type: AnimationType,

    pub(crate) move_type: MoveType,
    pub(crate) move_speed: i32,
    pub(crate) move_frequency: i32,

    /// Subpixel progress of the current step or jump, counted down from
    /// `SCREEN_TILE_WIDTH` to 0.
    pub(crate) remaining_step: i32,
    pub(crate) jumping: bool,
    pub(crate) jump_x: i32,
    pub(crate) jump_y: i32,
    pub(crate) jump_plus_x: i32,
    pub(crate) jump_plus_y: i32,

    pub(crate) anime_count: i32,
    pub(crate) stop_count: i32,
    pub(crate) max_stop_count: i32,
    pub(crate) wait_count: i32,

    pub(crate) flags: CharacterFlags,
    pub(crate) opacity: i32,

    /// Forced route installed by the event interpreter.
    pub(crate) move_route: MoveRoute,
    /// Route from the active event page.
    pub(crate) original_move_route: MoveRoute,
    pub(crate) move_route_index: usize,
    pub(crate) original_move_route_index: usize,
    pub(crate) move_route_overwritten: bool,
    pub(crate) move_route_repeated: bool,
    pub(crate) original_move_frequency: i32,

    pub(crate) move_failed: bool,
    /// Cycle policies: false walks Right/Down, true walks Left/Up.
    pub(crate) cycle_stat: bool,

    pub(crate) sprite_name: String,
    pub(crate) sprite_index: i32,
    pub(crate) layer: Layer,
}

impl Character {
    pub fn new(role: Role) -> Character {
        Character {
            used: false,
            role,
            x: 0,
            y: 0,
            direction: Direction::Down,
            sprite_direction: Direction::Down,
            pattern: Frame::Middle,
            original_pattern: Frame::Middle,
            last_pattern: Frame::Left,
            animation_type: AnimationType::NonContinuous,
            move_type: MoveType::Stationary,
            move_speed: 4,
            move_frequency: 3,
            remaining_step: 0,
            jumping: false,
            jump_x: 0,
            jump_y: 0,
            jump_plus_x: 0,
            jump_plus_y: 0,
            anime_count: 0,
            stop_count: 0,
            max_stop_count: 0,
            wait_count: 0,
            flags: CharacterFlags::WALK_ANIMATION | CharacterFlags::VISIBLE,
            opacity: MAX_OPACITY,
            move_route: MoveRoute::default(),
            original_move_route: MoveRoute::default(),
            move_route_index: 0,
            original_move_route_index: 0,
            move_route_overwritten: false,
            move_route_repeated: false,
            original_move_frequency: -1,
            move_failed: false,
            cycle_stat: false,
            sprite_name: String::new(),
            sprite_index: 0,
            layer: Layer::Same,
        }
    }

    // ── State predicates ────────────────────────────────────────────────

    pub fn is_moving(&self) -> bool {
        !self.jumping && self.remaining_step > 0
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn is_stopping(&self) -> bool {
        !(self.is_moving() || self.is_jumping())
    }

    pub fn is_spinning(&self) -> bool {
        self.animation_type.is_spinning()
    }

    pub fn is_continuous(&self) -> bool {
        self.animation_type.is_continuous()
    }

    pub fn is_direction_fixed(&self) -> bool {
        self.animation_type.fixes_facing() || self.flags.contains(CharacterFlags::FACING_LOCKED)
    }

    pub fn is_in_position(&self, x: i32, y: i32) -> bool {
        self.x == x && self.y == y
    }

    // ── Per-tick sub-machines ───────────────────────────────────────────

    /// Ticks between pattern changes, derived from `move_speed`. All
    /// divisions are integer.
    pub fn stepping_speed(&self) -> i32 {
        let move_speed = self.move_speed;
        if self.is_spinning() {
            // 24, 16, 12, 8, 6, 4
            if move_speed < 4 {
                48 / (move_speed + 1)
            } else {
                24 / (move_speed - 1)
            }
        } else if self.is_moving() {
            // 12, 10, 8, 6, 5, 4
            if move_speed < 4 {
                60 / (move_speed + 4)
            } else {
                30 / (move_speed + 1)
            }
        } else {
            // 16, 12, 10, 8, 7, 6
            if move_speed < 2 {
                16
            } else {
                60 / (move_speed + 3)
            }
        }
    }

    /// Advance the subpixel progress of a walking step.
    pub(crate) fn update_move(&mut self) {
        if self.remaining_step > 0 {
            self.remaining_step = (self.remaining_step - (1 << (1 + self.move_speed))).max(0);
        }

        if self.animation_type != AnimationType::FixedGraphic
            && self.flags.contains(CharacterFlags::WALK_ANIMATION)
        {
            self.anime_count += 1;
        }
    }

    /// Advance a jump in flight; the jump ends when the progress runs out.
    pub(crate) fn update_jump(&mut self) {
        self.remaining_step =
            (self.remaining_step - JUMP_STEP[(self.move_speed - 1) as usize]).max(0);
        if self.remaining_step == 0 {
            self.jumping = false;
        }
    }

    /// Hold still for the fixed wait-command duration.
    pub(crate) fn wait(&mut self) {
        self.wait_count += WAIT_TICKS;
    }

    /// Accumulate idle time while stopped.
    pub(crate) fn update_stop(&mut self) {
        if self.pattern != self.original_pattern && !self.is_continuous() {
            self.anime_count += 1;
        }
        self.stop_count += 1;
    }

    /// One pattern transition, fired when `anime_count` reaches the
    /// stepping speed. The walk cycle always passes through Middle between
    /// the extremes; `last_pattern` remembers which extreme came last.
    pub(crate) fn advance_pattern(&mut self) {
        if self.is_spinning() {
            self.sprite_direction = self.sprite_direction.turn_right_90();
        } else if !self.is_continuous() && self.is_stopping() {
            self.pattern = self.original_pattern;
            self.last_pattern = if self.last_pattern == Frame::Left {
                Frame::Right
            } else {
                Frame::Left
            };
        } else if self.last_pattern == Frame::Left {
            if self.pattern == Frame::Right {
                self.pattern = Frame::Middle;
                self.last_pattern = Frame::Right;
            } else {
                self.pattern = Frame::Right;
            }
        } else if self.pattern == Frame::Left {
            self.pattern = Frame::Middle;
            self.last_pattern = Frame::Left;
        } else {
            self.pattern = Frame::Left;
        }

        self.anime_count = 0;
    }

    // ── Subpixel position and screen projection ─────────────────────────

    /// Horizontal position in map subpixels, interpolated mid-step and
    /// mid-jump.
    pub fn get_real_x(&self) -> i32 {
        let mut x = self.x * SCREEN_TILE_WIDTH;

        if self.is_moving() {
            x -= self.direction.dx() * self.remaining_step;
        } else if self.is_jumping() {
            x -= (self.x - self.jump_x) * self.remaining_step;
        }

        x
    }

    /// Vertical position in map subpixels.
    pub fn get_real_y(&self) -> i32 {
        let mut y = self.y * SCREEN_TILE_WIDTH;

        if self.is_moving() {
            y -= self.direction.dy() * self.remaining_step;
        } else if self.is_jumping() {
            y -= (self.y - self.jump_y) * self.remaining_step;
        }

        y
    }

    /// Horizontal screen pixel, wrapped on looping maps.
    pub fn get_screen_x(&self, map: &dyn MapBackend) -> i32 {
        let mut x = self.get_real_x() / TILE_SIZE - map.display_x() / TILE_SIZE + TILE_SIZE / 2;

        if map.loop_horizontal() {
            let map_width = map.width() * TILE_SIZE;
            x = (x + map_width) % map_width;
        }

        x
    }

    /// Vertical screen pixel, wrapped on looping maps, lifted along the
    /// jump arc while airborne.
    pub fn get_screen_y(&self, map: &dyn MapBackend) -> i32 {
        let mut y = self.get_real_y() / TILE_SIZE - map.display_y() / TILE_SIZE + TILE_SIZE;

        if map.loop_vertical() {
            let map_height = map.height() * TILE_SIZE;
            y = (y + map_height) % map_height;
        }

        if self.is_jumping() {
            let jump_height = if self.remaining_step > SCREEN_TILE_WIDTH / 2 {
                SCREEN_TILE_WIDTH - self.remaining_step
            } else {
                self.remaining_step
            } / 8;
            y -= if jump_height < 5 {
                jump_height * 2
            } else if jump_height < 13 {
                jump_height + 4
            } else {
                16
            };
        }

        y
    }

    /// Z-ordering value for the sprite sorter.
    pub fn get_screen_z(&self, map: &dyn MapBackend) -> i32 {
        let mut z =
            (self.get_real_y() - map.display_y() + 3) / TILE_SIZE + SCREEN_TILE_WIDTH / TILE_SIZE;

        // wrap on map boundaries
        if z < 0 {
            z += map.height() * TILE_SIZE;
        }

        match self.layer {
            Layer::Below => z -= TILE_SIZE,
            Layer::Above => z += TILE_SIZE,
            Layer::Same => {}
        }

        // z = 0 would vanish behind the lowest tile layer
        if z < 1 {
            z = 1;
        }

        z - 1
    }

    pub fn get_bush_depth(&self, map: &dyn MapBackend) -> i32 {
        map.bush_depth(self.x, self.y)
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn get_role(&self) -> Role {
        self.role
    }

    pub fn get_x(&self) -> i32 {
        self.x
    }

    pub fn get_y(&self) -> i32 {
        self.y
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn get_sprite_direction(&self) -> Direction {
        self.sprite_direction
    }

    pub fn set_sprite_direction(&mut self, direction: Direction) {
        self.sprite_direction = direction;
    }

    pub fn get_pattern(&self) -> Frame {
        self.pattern
    }

    /// Which extreme frame the walk cycle visited last. Only Left and
    /// Right are meaningful here.
    pub fn get_last_pattern(&self) -> Frame {
        self.last_pattern
    }

    pub fn set_last_pattern(&mut self, last_pattern: Frame) {
        self.last_pattern = last_pattern;
    }

    pub fn get_animation_type(&self) -> AnimationType {
        self.animation_type
    }

    pub fn set_animation_type(&mut self, animation_type: AnimationType) {
        self.animation_type = animation_type;
    }

    pub fn get_move_type(&self) -> MoveType {
        self.move_type
    }

    pub fn set_move_type(&mut self, move_type: MoveType) {
        self.move_type = move_type;
    }

    pub fn get_move_speed(&self) -> i32 {
        self.move_speed
    }

    pub fn set_move_speed(&mut self, move_speed: i32) {
        self.move_speed = move_speed;
    }

    pub fn get_move_frequency(&self) -> i32 {
        self.move_frequency
    }

    pub fn set_move_frequency(&mut self, move_frequency: i32) {
        self.move_frequency = move_frequency;
    }

    pub fn get_remaining_step(&self) -> i32 {
        self.remaining_step
    }

    pub fn get_stop_count(&self) -> i32 {
        self.stop_count
    }

    pub fn get_max_stop_count(&self) -> i32 {
        self.max_stop_count
    }

    pub fn get_wait_count(&self) -> i32 {
        self.wait_count
    }

    pub fn get_move_failed(&self) -> bool {
        self.move_failed
    }

    pub fn is_move_route_overwritten(&self) -> bool {
        self.move_route_overwritten
    }

    pub fn is_move_route_repeated(&self) -> bool {
        self.move_route_repeated
    }

    pub fn set_original_move_route(&mut self, route: MoveRoute) {
        self.original_move_route = route;
        self.original_move_route_index = 0;
    }

    pub fn get_through(&self) -> bool {
        self.flags.contains(CharacterFlags::THROUGH)
    }

    pub fn set_through(&mut self, through: bool) {
        self.flags.set(CharacterFlags::THROUGH, through);
    }

    pub fn is_facing_locked(&self) -> bool {
        self.flags.contains(CharacterFlags::FACING_LOCKED)
    }

    pub fn set_facing_locked(&mut self, locked: bool) {
        self.flags.set(CharacterFlags::FACING_LOCKED, locked);
    }

    pub fn has_walk_animation(&self) -> bool {
        self.flags.contains(CharacterFlags::WALK_ANIMATION)
    }

    pub fn set_walk_animation(&mut self, walk_animation: bool) {
        self.flags.set(CharacterFlags::WALK_ANIMATION, walk_animation);
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(CharacterFlags::VISIBLE)
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.flags.set(CharacterFlags::VISIBLE, visible);
    }

    pub fn get_opacity(&self) -> i32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: i32) {
        self.opacity = opacity.clamp(MIN_OPACITY, MAX_OPACITY);
    }

    pub fn get_sprite_name(&self) -> &str {
        &self.sprite_name
    }

    pub fn get_sprite_index(&self) -> i32 {
        self.sprite_index
    }

    /// Swap the character sheet; the pattern snaps back to the middle
    /// frame, the rest frame is left alone.
    pub fn set_graphic(&mut self, sprite_name: &str, sprite_index: i32) {
        self.sprite_name = sprite_name.to_string();
        self.sprite_index = sprite_index;
        self.pattern = Frame::Middle;
    }

    pub fn get_layer(&self) -> Layer {
        self.layer
    }

    pub fn set_layer(&mut self, layer: Layer) {
        self.layer = layer;
    }
}
