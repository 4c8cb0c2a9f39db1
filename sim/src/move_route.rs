//! The move-route interpreter.
//!
//! A character can hold two route programs: the one from its event page and
//! a forced route overlaid by the event interpreter. While a forced route is
//! active the character consumes it with the forced frequency and the page
//! route's cursor is paused; when the forced route runs off its end (or is
//! cancelled from outside) the original frequency comes back and the page
//! route resumes where it left off.

use rpg2k_core::constants::{
    MAX_MOVE_FREQUENCY, MAX_MOVE_SPEED, MIN_MOVE_FREQUENCY, MIN_MOVE_SPEED, SCREEN_TILE_WIDTH,
    SE_OFF_SENTINELS, TRANSP_FLOOR, TRANSP_STEP,
};
use rpg2k_core::types::{MoveCommand, MoveRoute};

use crate::env::Env;
use crate::map_state::{CharId, MapState};

impl MapState {
    /// Overlay a forced route. The character re-enters the pending-move
    /// registry and its idle window opens immediately, so execution starts
    /// on the same tick's dispatch.
    pub fn force_move_route(&mut self, id: CharId, route: MoveRoute, frequency: i32) {
        self.remove_pending_move(id);
        self.add_pending_move(id);

        let ch = &mut self.characters[id];
        ch.original_move_frequency = ch.move_frequency;
        ch.move_route = route;
        ch.move_route_index = 0;
        ch.move_route_overwritten = true;
        ch.move_route_repeated = false;
        ch.move_frequency = frequency;
        ch.wait_count = 0;
        ch.max_stop_count = 0;

        log::debug!(
            "forced move route on character {} at frequency {}",
            id,
            frequency
        );
    }

    /// Drop the forced route and restore the saved frequency. Also used by
    /// the interpreter itself when a non-repeating forced route finishes.
    pub fn cancel_move_route(&mut self, id: CharId) {
        let ch = &mut self.characters[id];
        ch.move_route_overwritten = false;
        ch.move_frequency = ch.original_move_frequency;
        self.remove_pending_move(id);

        log::debug!("move route on character {} finished or cancelled", id);
    }

    /// One dispatch of the custom policy: consume commands from the active
    /// route until the character starts moving, waits, or the idle throttle
    /// closes the window.
    pub(crate) fn move_type_custom(&mut self, id: CharId, env: &mut Env) {
        let was_overwritten = self.characters[id].move_route_overwritten;
        let route = if was_overwritten {
            self.characters[id].move_route.clone()
        } else {
            self.characters[id].original_move_route.clone()
        };
        let mut index = if was_overwritten {
            self.characters[id].move_route_index
        } else {
            self.characters[id].original_move_route_index
        };

        if self.characters[id].is_stopping() {
            self.characters[id].move_failed = false;

            if index >= route.move_commands.len() {
                if route.repeat {
                    index = 0;
                    self.characters[id].move_route_repeated = true;
                } else if self.characters[id].move_route_overwritten {
                    self.cancel_move_route(id);
                    self.characters[id].stop_count = 0;
                }
            } else {
                while index < route.move_commands.len() {
                    {
                        let ch = &self.characters[id];
                        if !ch.is_stopping() || ch.wait_count > 0 || ch.stop_count < ch.max_stop_count
                        {
                            break;
                        }
                    }

                    self.execute_move_command(id, &route, &mut index, env);

                    if self.characters[id].move_failed {
                        if route.skippable {
                            index += 1;
                        }
                        break;
                    }

                    index += 1;
                }
            }
        }

        // The cursor always returns to the route that was active when this
        // dispatch began, even if that route stopped being the active one
        // mid-step (forced route finished above).
        if was_overwritten {
            self.characters[id].move_route_index = index;
        } else {
            self.characters[id].original_move_route_index = index;
        }
    }

    fn execute_move_command(
        &mut self,
        id: CharId,
        route: &MoveRoute,
        index: &mut usize,
        env: &mut Env,
    ) {
        match route.move_commands[*index].clone() {
            MoveCommand::Move(dir) => self.move_character(id, dir, env),
            MoveCommand::MoveRandom => self.move_random(id, env),
            MoveCommand::MoveTowardsHero => self.move_towards_hero(id, env),
            MoveCommand::MoveAwayFromHero => self.move_away_from_hero(id, env),
            MoveCommand::MoveForward => self.move_forward(id, env),
            MoveCommand::Face(dir) => self.turn(id, dir),
            MoveCommand::Turn90Right => self.turn_90_right(id),
            MoveCommand::Turn90Left => self.turn_90_left(id),
            MoveCommand::Turn180 => self.turn_180(id),
            MoveCommand::Turn90Random => self.turn_90_random(id),
            MoveCommand::FaceRandomDirection => self.face_random_direction(id),
            MoveCommand::FaceHero => self.face_hero(id, env.map),
            MoveCommand::FaceAwayFromHero => self.face_away_from_hero(id, env.map),
            MoveCommand::Wait => self.characters[id].wait(),
            MoveCommand::BeginJump => self.begin_jump(id, route, index, env),
            MoveCommand::EndJump => {}
            MoveCommand::LockFacing => self.characters[id].set_facing_locked(true),
            MoveCommand::UnlockFacing => self.characters[id].set_facing_locked(false),
            MoveCommand::IncreaseMoveSpeed => {
                let ch = &mut self.characters[id];
                ch.move_speed = (ch.move_speed + 1).min(MAX_MOVE_SPEED);
            }
            MoveCommand::DecreaseMoveSpeed => {
                let ch = &mut self.characters[id];
                ch.move_speed = (ch.move_speed - 1).max(MIN_MOVE_SPEED);
            }
            MoveCommand::IncreaseMoveFrequency => {
                let ch = &mut self.characters[id];
                ch.move_frequency = (ch.move_frequency + 1).min(MAX_MOVE_FREQUENCY);
            }
            MoveCommand::DecreaseMoveFrequency => {
                let ch = &mut self.characters[id];
                ch.move_frequency = (ch.move_frequency - 1).max(MIN_MOVE_FREQUENCY);
            }
            MoveCommand::SwitchOn(switch_id) => {
                env.switches.set_switch(switch_id, true);
                env.map.set_need_refresh(true);
            }
            MoveCommand::SwitchOff(switch_id) => {
                env.switches.set_switch(switch_id, false);
                env.map.set_need_refresh(true);
            }
            MoveCommand::ChangeGraphic {
                file,
                index: sprite_index,
            } => self.characters[id].set_graphic(&file, sprite_index),
            MoveCommand::PlaySoundEffect {
                file,
                volume,
                tempo,
            } => {
                if !SE_OFF_SENTINELS.contains(&file.as_str()) {
                    env.audio.se_play(&file, volume, tempo);
                }
            }
            MoveCommand::WalkEverywhereOn => self.characters[id].set_through(true),
            MoveCommand::WalkEverywhereOff => self.characters[id].set_through(false),
            MoveCommand::StopAnimation => self.characters[id].set_walk_animation(false),
            MoveCommand::StartAnimation => self.characters[id].set_walk_animation(true),
            MoveCommand::IncreaseTransparency => {
                let ch = &mut self.characters[id];
                let opacity = (ch.opacity - TRANSP_STEP).max(TRANSP_FLOOR);
                ch.set_opacity(opacity);
            }
            MoveCommand::DecreaseTransparency => {
                let ch = &mut self.characters[id];
                let opacity = ch.opacity + TRANSP_STEP;
                ch.set_opacity(opacity);
            }
        }
    }

    /// Assemble and launch a jump. Movement commands between `begin_jump`
    /// and `end_jump` only accumulate a displacement (the character is
    /// already flagged as jumping); the jump itself commits here in one
    /// piece. `index` is left on the `end_jump` command on success, at the
    /// end of the program when no `end_jump` exists, and untouched on a
    /// refused landing unless the route is skippable.
    fn begin_jump(&mut self, id: CharId, route: &MoveRoute, index: &mut usize, env: &mut Env) {
        {
            let ch = &mut self.characters[id];
            ch.jump_x = ch.x;
            ch.jump_y = ch.y;
            ch.jump_plus_x = 0;
            ch.jump_plus_y = 0;
            ch.jumping = true;
        }

        let mut scan = *index;
        let mut end_found = false;
        while scan < route.move_commands.len() {
            match &route.move_commands[scan] {
                MoveCommand::Move(dir) => self.move_character(id, *dir, env),
                MoveCommand::MoveRandom => self.move_random(id, env),
                MoveCommand::MoveTowardsHero => self.move_towards_hero(id, env),
                MoveCommand::MoveAwayFromHero => self.move_away_from_hero(id, env),
                MoveCommand::MoveForward => self.move_forward(id, env),
                MoveCommand::EndJump => {
                    end_found = true;
                    break;
                }
                _ => {}
            }
            scan += 1;
        }

        if !end_found {
            // the program ran out mid-jump; drop the jump and end the route
            log::warn!(
                "move route for character {} has begin_jump without end_jump",
                id
            );
            *index = scan;
            self.characters[id].jumping = false;
            return;
        }

        let (mut new_x, mut new_y) = {
            let ch = &self.characters[id];
            (ch.jump_x + ch.jump_plus_x, ch.jump_y + ch.jump_plus_y)
        };

        if env.map.loop_horizontal() {
            let map_width = env.map.width();
            if new_x < 0 {
                self.characters[id].jump_x += map_width;
                new_x += map_width;
            } else if new_x >= map_width {
                self.characters[id].jump_x -= map_width;
                new_x -= map_width;
            }
        }

        if env.map.loop_vertical() {
            let map_height = env.map.height();
            if new_y < 0 {
                self.characters[id].jump_y += map_height;
                new_y += map_height;
            } else if new_y >= map_height {
                self.characters[id].jump_y -= map_height;
                new_y -= map_height;
            }
        }

        let stood_still = {
            let ch = &self.characters[id];
            ch.jump_plus_x == 0 && ch.jump_plus_y == 0
        };

        // a character can always land on the tile it started from
        if !stood_still && !self.is_landable(id, new_x, new_y, env.map) {
            let ch = &mut self.characters[id];
            ch.move_failed = true;
            ch.jumping = false;

            if route.skippable {
                *index = scan;
            }
            return;
        }

        let ch = &mut self.characters[id];
        ch.x = new_x;
        ch.y = new_y;
        *index = scan;

        ch.remaining_step = SCREEN_TILE_WIDTH;
        ch.stop_count = 0;
        ch.max_stop_count = if ch.move_frequency > 7 {
            0
        } else {
            1 << (9 - ch.move_frequency)
        };
        ch.move_failed = false;
    }
}
