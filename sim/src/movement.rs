//! The movement primitive, facing changes, hero-relative steering, and the
//! passability/landability oracles.

use rand::Rng;

use rpg2k_core::constants::SCREEN_TILE_WIDTH;
use rpg2k_core::types::{Direction, Layer};

use crate::env::{Env, MapBackend};
use crate::map_state::{CharId, MapState, HERO};

impl MapState {
    /// Attempt one whole-tile step. On success the logical position commits
    /// immediately and `remaining_step` starts the subpixel slide; on
    /// failure `move_failed` is raised and the touch-trigger hook fires at
    /// the blocked cell. Either way the idle timers restart. While a jump
    /// is being assembled the step only accumulates into the jump
    /// displacement.
    pub fn move_character(&mut self, id: CharId, dir: Direction, env: &mut Env) {
        let dx = dir.dx();
        let dy = dir.dy();

        self.apply_step_facing(id, dir);

        {
            let ch = &mut self.characters[id];
            if ch.jumping {
                ch.jump_plus_x += dx;
                ch.jump_plus_y += dy;
                return;
            }
        }

        let (x, y) = {
            let ch = &self.characters[id];
            (ch.x, ch.y)
        };

        let passable = self.is_passable(id, x, y, dir, env.map);
        self.characters[id].move_failed = !passable;

        if !passable {
            let touch_x = env.map.round_x(x + dx);
            let touch_y = env.map.round_y(y + dy);
            env.hooks.check_event_trigger_touch(id, touch_x, touch_y);
        } else {
            let new_x = env.map.round_x(x + dx);
            let new_y = env.map.round_y(y + dy);
            let ch = &mut self.characters[id];
            ch.x = new_x;
            ch.y = new_y;
            ch.remaining_step = SCREEN_TILE_WIDTH;
            env.hooks.begin_move(id);
        }

        let ch = &mut self.characters[id];
        ch.stop_count = 0;
        ch.max_stop_count = if ch.move_frequency > 7 {
            0
        } else {
            1 << (9 - ch.move_frequency)
        };
    }

    /// Step facing: the logical direction always follows the step; the
    /// sprite only turns when nothing pins it, and on a diagonal step it
    /// keeps whichever axis it is already on.
    fn apply_step_facing(&mut self, id: CharId, dir: Direction) {
        let ch = &mut self.characters[id];
        ch.direction = dir;

        if ch.is_direction_fixed() {
            return;
        }

        if dir.is_diagonal() {
            ch.sprite_direction = if ch.sprite_direction.code() % 2 == 1 {
                if dir.dx() > 0 {
                    Direction::Right
                } else {
                    Direction::Left
                }
            } else if dir.dy() > 0 {
                Direction::Down
            } else {
                Direction::Up
            };
        } else {
            ch.sprite_direction = dir;
        }
    }

    pub fn move_forward(&mut self, id: CharId, env: &mut Env) {
        let dir = self.characters[id].direction;
        self.move_character(id, dir, env);
    }

    pub fn move_random(&mut self, id: CharId, env: &mut Env) {
        let dir = self.random_cardinal();
        self.move_character(id, dir, env);
    }

    /// Close on the hero: longer axis first, the other axis as fallback
    /// when the first step is blocked.
    pub fn move_towards_hero(&mut self, id: CharId, env: &mut Env) {
        let sx = self.distance_x_from_hero(id, env.map);
        let sy = self.distance_y_from_hero(id, env.map);

        if sx == 0 && sy == 0 {
            return;
        }

        if sx.abs() > sy.abs() {
            let dir = if sx > 0 { Direction::Left } else { Direction::Right };
            self.move_character(id, dir, env);
            if self.characters[id].move_failed && sy != 0 {
                let dir = if sy > 0 { Direction::Up } else { Direction::Down };
                self.move_character(id, dir, env);
            }
        } else {
            let dir = if sy > 0 { Direction::Up } else { Direction::Down };
            self.move_character(id, dir, env);
            if self.characters[id].move_failed && sx != 0 {
                let dir = if sx > 0 { Direction::Left } else { Direction::Right };
                self.move_character(id, dir, env);
            }
        }
    }

    pub fn move_away_from_hero(&mut self, id: CharId, env: &mut Env) {
        let sx = self.distance_x_from_hero(id, env.map);
        let sy = self.distance_y_from_hero(id, env.map);

        if sx == 0 && sy == 0 {
            return;
        }

        if sx.abs() > sy.abs() {
            let dir = if sx > 0 { Direction::Right } else { Direction::Left };
            self.move_character(id, dir, env);
            if self.characters[id].move_failed && sy != 0 {
                let dir = if sy > 0 { Direction::Down } else { Direction::Up };
                self.move_character(id, dir, env);
            }
        } else {
            let dir = if sy > 0 { Direction::Down } else { Direction::Up };
            self.move_character(id, dir, env);
            if self.characters[id].move_failed && sx != 0 {
                let dir = if sx > 0 { Direction::Right } else { Direction::Left };
                self.move_character(id, dir, env);
            }
        }
    }

    /// Teleport. The position wraps modulo the map size whether or not the
    /// map loops.
    pub fn move_to(&mut self, id: CharId, x: i32, y: i32, map: &dyn MapBackend) {
        let ch = &mut self.characters[id];
        ch.x = x % map.width();
        ch.y = y % map.height();
    }

    // ── Facing ──────────────────────────────────────────────────────────

    /// Face `dir` with both the logical and the sprite facing, and restart
    /// the idle timer on the shorter turn cadence.
    pub fn turn(&mut self, id: CharId, dir: Direction) {
        let ch = &mut self.characters[id];
        ch.direction = dir;
        ch.sprite_direction = dir;
        ch.move_failed = false;
        ch.stop_count = 0;
        ch.max_stop_count = if ch.move_frequency > 7 {
            0
        } else {
            1 << (8 - ch.move_frequency)
        };
    }

    pub fn turn_90_right(&mut self, id: CharId) {
        let dir = self.characters[id].sprite_direction.turn_right_90();
        self.turn(id, dir);
    }

    pub fn turn_90_left(&mut self, id: CharId) {
        let dir = self.characters[id].sprite_direction.turn_left_90();
        self.turn(id, dir);
    }

    pub fn turn_180(&mut self, id: CharId) {
        let dir = self.characters[id].sprite_direction.reverse();
        self.turn(id, dir);
    }

    pub fn turn_90_random(&mut self, id: CharId) {
        if self.rng.gen_range(0..2) == 0 {
            self.turn_90_left(id);
        } else {
            self.turn_90_right(id);
        }
    }

    pub fn face_random_direction(&mut self, id: CharId) {
        let dir = self.random_cardinal();
        self.turn(id, dir);
    }

    /// Face the hero along the longer axis; a tie leaves the facing alone.
    pub fn face_hero(&mut self, id: CharId, map: &dyn MapBackend) {
        let sx = self.distance_x_from_hero(id, map);
        let sy = self.distance_y_from_hero(id, map);

        if sx.abs() > sy.abs() {
            let dir = if sx > 0 { Direction::Left } else { Direction::Right };
            self.turn(id, dir);
        } else if sx.abs() < sy.abs() {
            let dir = if sy > 0 { Direction::Up } else { Direction::Down };
            self.turn(id, dir);
        }
    }

    pub fn face_away_from_hero(&mut self, id: CharId, map: &dyn MapBackend) {
        let sx = self.distance_x_from_hero(id, map);
        let sy = self.distance_y_from_hero(id, map);

        if sx.abs() > sy.abs() {
            let dir = if sx > 0 { Direction::Right } else { Direction::Left };
            self.turn(id, dir);
        } else if sx.abs() < sy.abs() {
            let dir = if sy > 0 { Direction::Down } else { Direction::Up };
            self.turn(id, dir);
        }
    }

    // ── Hero-relative distance ──────────────────────────────────────────

    /// Signed x distance to the hero, folded across the seam of a
    /// horizontally looping map.
    pub(crate) fn distance_x_from_hero(&self, id: CharId, map: &dyn MapBackend) -> i32 {
        let mut sx = self.characters[id].x - self.characters[HERO].x;
        if map.loop_horizontal() && sx.abs() > map.width() / 2 {
            sx -= map.width();
        }
        sx
    }

    pub(crate) fn distance_y_from_hero(&self, id: CharId, map: &dyn MapBackend) -> i32 {
        let mut sy = self.characters[id].y - self.characters[HERO].y;
        if map.loop_vertical() && sy.abs() > map.height() / 2 {
            sy -= map.height();
        }
        sy
    }

    // ── Passability ─────────────────────────────────────────────────────

    /// Can `id` step from `(x, y)` in direction `dir`? A diagonal is
    /// passable when either of its two L-shaped decompositions is passable
    /// in both legs.
    pub fn is_passable(&self, id: CharId, x: i32, y: i32, dir: Direction, map: &dyn MapBackend) -> bool {
        if dir.is_diagonal() {
            let dx = dir.dx();
            let dy = dir.dy();
            let horizontal = if dx > 0 { Direction::Right } else { Direction::Left };
            let vertical = if dy > 0 { Direction::Down } else { Direction::Up };

            return (self.is_passable(id, x, y, horizontal, map)
                && self.is_passable(id, x + dx, y, vertical, map))
                || (self.is_passable(id, x, y, vertical, map)
                    && self.is_passable(id, x, y + dy, horizontal, map));
        }

        let new_x = map.round_x(x + dir.dx());
        let new_y = map.round_y(y + dir.dy());

        if !map.is_valid(new_x, new_y) {
            return false;
        }

        let ch = &self.characters[id];
        if ch.get_through() {
            return true;
        }

        if !map.is_passable(x, y, dir, id) {
            return false;
        }
        if !map.is_passable(new_x, new_y, dir.reverse(), id) {
            return false;
        }

        let hero = &self.characters[HERO];
        if hero.is_in_position(new_x, new_y)
            && !hero.get_through()
            && !ch.sprite_name.is_empty()
            && ch.layer == Layer::Same
        {
            return false;
        }

        true
    }

    /// Can `id` end a jump on `(x, y)`?
    pub fn is_landable(&self, id: CharId, x: i32, y: i32, map: &dyn MapBackend) -> bool {
        if !map.is_valid(x, y) {
            return false;
        }

        let ch = &self.characters[id];
        if ch.get_through() {
            return true;
        }

        if !map.is_landable(x, y, id) {
            return false;
        }

        let hero = &self.characters[HERO];
        if hero.is_in_position(x, y)
            && !hero.get_through()
            && !ch.sprite_name.is_empty()
            && id != HERO
        {
            return false;
        }

        true
    }

    pub(crate) fn random_cardinal(&mut self) -> Direction {
        match self.rng.gen_range(0..4) {
            0 => Direction::Up,
            1 => Direction::Right,
            2 => Direction::Down,
            _ => Direction::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Character, Role};
    use crate::testutil::TestEnv;

    fn spawn(map: &mut MapState, x: i32, y: i32) -> CharId {
        let mut ch = Character::new(Role::Event { event_id: 1 });
        ch.set_position(x, y);
        ch.set_graphic("npc", 0);
        map.spawn_event(1, ch)
    }

    #[test]
    fn successful_step_commits_position_and_starts_the_slide() {
        let mut world = MapState::with_rng_seed(7);
        let mut fixture = TestEnv::new(10, 10);
        let id = spawn(&mut world, 3, 3);

        world.move_character(id, Direction::Right, &mut fixture.env());

        let ch = world.get(id).unwrap();
        assert!(!ch.get_move_failed());
        assert_eq!((ch.get_x(), ch.get_y()), (4, 3));
        assert_eq!(ch.get_remaining_step(), SCREEN_TILE_WIDTH);
        assert_eq!(ch.get_direction(), Direction::Right);
        assert_eq!(ch.get_sprite_direction(), Direction::Right);
        // frequency 3 -> 2^(9-3)
        assert_eq!(ch.get_max_stop_count(), 64);
    }

    #[test]
    fn blocked_step_raises_move_failed_but_still_faces() {
        let mut world = MapState::with_rng_seed(7);
        let mut fixture = TestEnv::new(10, 10);
        fixture.map.block(3, 2);
        let id = spawn(&mut world, 3, 3);

        world.move_character(id, Direction::Up, &mut fixture.env());

        let ch = world.get(id).unwrap();
        assert!(ch.get_move_failed());
        assert_eq!((ch.get_x(), ch.get_y()), (3, 3));
        assert_eq!(ch.get_direction(), Direction::Up);
        assert_eq!(ch.get_sprite_direction(), Direction::Up);
        assert_eq!(ch.get_remaining_step(), 0);
        // the idle timer restarts even when the step was refused
        assert_eq!(ch.get_max_stop_count(), 64);
    }

    #[test]
    fn blocked_step_reports_the_touched_cell() {
        let mut world = MapState::with_rng_seed(7);
        let mut fixture = TestEnv::new(10, 10);
        fixture.map.block(4, 3);
        let id = spawn(&mut world, 3, 3);

        world.move_character(id, Direction::Right, &mut fixture.env());
        assert_eq!(fixture.hooks.touches, vec![(id, 4, 3)]);
    }

    #[test]
    fn through_ignores_blocked_tiles() {
        let mut world = MapState::with_rng_seed(7);
        let mut fixture = TestEnv::new(10, 10);
        fixture.map.block(4, 3);
        let id = spawn(&mut world, 3, 3);
        world.get_mut(id).unwrap().set_through(true);

        world.move_character(id, Direction::Right, &mut fixture.env());
        assert!(!world.get(id).unwrap().get_move_failed());
        assert_eq!(world.get(id).unwrap().get_x(), 4);
    }

    #[test]
    fn steps_wrap_on_a_looping_map() {
        let mut world = MapState::with_rng_seed(7);
        let mut fixture = TestEnv::new(10, 10);
        fixture.map.loop_horizontal = true;
        let id = spawn(&mut world, 0, 5);

        world.move_character(id, Direction::Left, &mut fixture.env());
        assert_eq!(world.get(id).unwrap().get_x(), 9);
    }

    #[test]
    fn hero_occupancy_blocks_same_layer_sprites() {
        let mut world = MapState::with_rng_seed(7);
        let mut fixture = TestEnv::new(10, 10);
        world.hero_mut().set_position(4, 3);
        let id = spawn(&mut world, 3, 3);

        world.move_character(id, Direction::Right, &mut fixture.env());
        assert!(world.get(id).unwrap().get_move_failed());

        // a through hero does not block
        world.hero_mut().set_through(true);
        world.move_character(id, Direction::Right, &mut fixture.env());
        assert!(!world.get(id).unwrap().get_move_failed());
    }

    #[test]
    fn diagonal_passability_needs_one_open_elbow() {
        let mut world = MapState::with_rng_seed(7);
        let mut fixture = TestEnv::new(10, 10);
        let id = spawn(&mut world, 3, 3);

        // target (4, 2); corner cells (4, 3) and (3, 2)
        assert!(world.is_passable(id, 3, 3, Direction::UpRight, &fixture.map));

        fixture.map.block(4, 3);
        assert!(world.is_passable(id, 3, 3, Direction::UpRight, &fixture.map));

        fixture.map.block(3, 2);
        assert!(!world.is_passable(id, 3, 3, Direction::UpRight, &fixture.map));
    }

    #[test]
    fn diagonal_steps_keep_the_sprite_axis() {
        let mut world = MapState::with_rng_seed(7);
        let mut fixture = TestEnv::new(10, 10);
        let id = spawn(&mut world, 3, 3);

        world.get_mut(id).unwrap().set_sprite_direction(Direction::Right);
        world.move_character(id, Direction::UpLeft, &mut fixture.env());
        assert_eq!(world.get(id).unwrap().get_sprite_direction(), Direction::Left);
        assert_eq!(world.get(id).unwrap().get_direction(), Direction::UpLeft);

        world.get_mut(id).unwrap().set_sprite_direction(Direction::Down);
        world.move_character(id, Direction::UpRight, &mut fixture.env());
        assert_eq!(world.get(id).unwrap().get_sprite_direction(), Direction::Up);
    }

    #[test]
    fn teleports_wrap_into_the_map() {
        let mut world = MapState::with_rng_seed(7);
        let fixture = TestEnv::new(10, 10);
        let id = spawn(&mut world, 3, 3);

        world.move_to(id, 23, 7, &fixture.map);
        let ch = world.get(id).unwrap();
        assert_eq!((ch.get_x(), ch.get_y()), (3, 7));
    }

    #[test]
    fn turns_restart_the_idle_timer_on_the_short_cadence() {
        let mut world = MapState::with_rng_seed(7);
        let id = spawn(&mut world, 3, 3);
        world.get_mut(id).unwrap().set_move_frequency(3);

        world.turn(id, Direction::Left);
        let ch = world.get(id).unwrap();
        assert_eq!(ch.get_direction(), Direction::Left);
        assert_eq!(ch.get_sprite_direction(), Direction::Left);
        // frequency 3 -> 2^(8-3)
        assert_eq!(ch.get_max_stop_count(), 32);
    }

    #[test]
    fn four_right_turns_are_the_identity() {
        let mut world = MapState::with_rng_seed(7);
        let id = spawn(&mut world, 3, 3);
        let start = world.get(id).unwrap().get_sprite_direction();

        for _ in 0..4 {
            world.turn_90_right(id);
        }
        assert_eq!(world.get(id).unwrap().get_sprite_direction(), start);

        world.turn_180(id);
        world.turn_180(id);
        assert_eq!(world.get(id).unwrap().get_sprite_direction(), start);
    }

    #[test]
    fn facing_the_hero_prefers_the_longer_axis() {
        let mut world = MapState::with_rng_seed(7);
        let fixture = TestEnv::new(20, 20);
        world.hero_mut().set_position(2, 2);
        let id = spawn(&mut world, 8, 3);

        world.face_hero(id, &fixture.map);
        assert_eq!(world.get(id).unwrap().get_sprite_direction(), Direction::Left);

        world.face_away_from_hero(id, &fixture.map);
        assert_eq!(world.get(id).unwrap().get_sprite_direction(), Direction::Right);
    }

    #[test]
    fn tied_hero_distance_leaves_the_facing_alone() {
        let mut world = MapState::with_rng_seed(7);
        let fixture = TestEnv::new(20, 20);
        world.hero_mut().set_position(2, 2);
        let id = spawn(&mut world, 5, 5);
        world.turn(id, Direction::Up);

        world.face_hero(id, &fixture.map);
        assert_eq!(world.get(id).unwrap().get_sprite_direction(), Direction::Up);
    }

    #[test]
    fn hero_distance_folds_across_the_loop_seam() {
        let mut world = MapState::with_rng_seed(7);
        let mut fixture = TestEnv::new(20, 20);
        fixture.map.loop_horizontal = true;
        world.hero_mut().set_position(1, 0);
        let id = spawn(&mut world, 18, 0);

        // unfolded distance 17, folded -3: the hero is three tiles east
        assert_eq!(world.distance_x_from_hero(id, &fixture.map), -3);
    }
}
