//! The idle dispatcher's self-movement policies. Each policy acts only when
//! the character is fully stopped; the idle throttle (`max_stop_count`) has
//! already been checked by the caller.

use rand::Rng;

use rpg2k_core::constants::HERO_CHASE_RANGE;
use rpg2k_core::types::{Direction, MoveType};

use crate::env::Env;
use crate::map_state::{CharId, MapState, HERO};

impl MapState {
    pub(crate) fn update_self_movement(&mut self, id: CharId, env: &mut Env) {
        match self.characters[id].move_type {
            MoveType::Stationary => {}
            MoveType::Random => self.move_type_random(id, env),
            MoveType::Vertical => self.move_type_cycle_up_down(id, env),
            MoveType::Horizontal => self.move_type_cycle_left_right(id, env),
            MoveType::Toward => self.move_type_towards_hero(id, env),
            MoveType::Away => self.move_type_away_from_hero(id, env),
            MoveType::Custom => self.move_type_custom(id, env),
        }
    }

    /// Mostly drifts forward, sometimes picks a new direction, sometimes
    /// just stands around a while longer.
    fn move_type_random(&mut self, id: CharId, env: &mut Env) {
        if !self.characters[id].is_stopping() {
            return;
        }
        match self.rng.gen_range(0..6) {
            0 => self.characters[id].stop_count = 0,
            1 | 2 => self.move_random(id, env),
            _ => self.move_forward(id, env),
        }
    }

    /// Ping-pong between the walls to the left and right. On a blocked
    /// step the character waits out a beat and reverses.
    fn move_type_cycle_left_right(&mut self, id: CharId, env: &mut Env) {
        if !self.characters[id].is_stopping() {
            return;
        }

        let dir = if self.characters[id].cycle_stat {
            Direction::Left
        } else {
            Direction::Right
        };
        self.move_character(id, dir, env);

        if self.characters[id].move_failed {
            let ch = &mut self.characters[id];
            ch.wait();
            ch.stop_count = 0;
            ch.cycle_stat = !ch.cycle_stat;
        }
    }

    fn move_type_cycle_up_down(&mut self, id: CharId, env: &mut Env) {
        if !self.characters[id].is_stopping() {
            return;
        }

        let dir = if self.characters[id].cycle_stat {
            Direction::Up
        } else {
            Direction::Down
        };
        self.move_character(id, dir, env);

        if self.characters[id].move_failed {
            let ch = &mut self.characters[id];
            ch.wait();
            ch.stop_count = 0;
            ch.cycle_stat = !ch.cycle_stat;
        }
    }

    /// Home in on the hero while close; out of range the character just
    /// wanders. The range test uses the raw coordinate difference, not the
    /// loop-folded distance.
    fn move_type_towards_hero(&mut self, id: CharId, env: &mut Env) {
        if !self.characters[id].is_stopping() {
            return;
        }

        let sx = self.characters[id].x - self.characters[HERO].x;
        let sy = self.characters[id].y - self.characters[HERO].y;

        if sx.abs() + sy.abs() >= HERO_CHASE_RANGE {
            self.move_random(id, env);
        } else {
            match self.rng.gen_range(0..6) {
                0 => self.move_random(id, env),
                1 => self.move_forward(id, env),
                _ => self.move_towards_hero(id, env),
            }
        }
    }

    fn move_type_away_from_hero(&mut self, id: CharId, env: &mut Env) {
        if !self.characters[id].is_stopping() {
            return;
        }

        let sx = self.characters[id].x - self.characters[HERO].x;
        let sy = self.characters[id].y - self.characters[HERO].y;

        if sx.abs() + sy.abs() >= HERO_CHASE_RANGE {
            self.move_random(id, env);
        } else {
            match self.rng.gen_range(0..6) {
                0 => self.move_random(id, env),
                1 => self.move_forward(id, env),
                _ => self.move_away_from_hero(id, env),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Character, Role};
    use crate::testutil::TestEnv;
    use rpg2k_core::constants::{SCREEN_TILE_WIDTH, WAIT_TICKS};

    fn spawn_with_move_type(world: &mut MapState, x: i32, y: i32, move_type: MoveType) -> CharId {
        let mut ch = Character::new(Role::Event { event_id: 1 });
        ch.set_position(x, y);
        ch.set_graphic("npc", 0);
        ch.set_move_type(move_type);
        ch.set_move_frequency(8); // no idle throttle between steps
        world.spawn_event(1, ch)
    }

    fn run(world: &mut MapState, fixture: &mut TestEnv, ticks: usize) {
        for _ in 0..ticks {
            world.tick(&mut fixture.env());
        }
    }

    #[test]
    fn stationary_characters_never_move() {
        let mut world = MapState::with_rng_seed(5);
        let mut fixture = TestEnv::new(10, 10);
        let id = spawn_with_move_type(&mut world, 4, 4, MoveType::Stationary);

        run(&mut world, &mut fixture, 120);
        let ch = world.get(id).unwrap();
        assert_eq!((ch.get_x(), ch.get_y()), (4, 4));
    }

    #[test]
    fn cycle_left_right_bounces_between_walls() {
        let mut world = MapState::with_rng_seed(5);
        // a corridor with the hero parked at its east end
        let mut fixture = TestEnv::new(4, 1);
        world.hero_mut().set_position(3, 0);
        let id = spawn_with_move_type(&mut world, 1, 0, MoveType::Horizontal);

        // first dispatch walks right onto x = 2
        run(&mut world, &mut fixture, 1);
        assert_eq!(world.get(id).unwrap().get_x(), 2);

        // finish the slide, then the step into the hero fails, flips the
        // cycle and waits
        run(&mut world, &mut fixture, 9);
        let ch = world.get(id).unwrap();
        assert_eq!(ch.get_x(), 2);
        assert!(ch.cycle_stat);
        assert!(ch.get_wait_count() > 0 && ch.get_wait_count() <= WAIT_TICKS);

        // wait drains, then the character walks back across the corridor
        run(&mut world, &mut fixture, WAIT_TICKS as usize + 20);
        assert_eq!(world.get(id).unwrap().get_x(), 0);
    }

    #[test]
    fn cycle_up_down_flips_on_failure_too() {
        let mut world = MapState::with_rng_seed(5);
        let mut fixture = TestEnv::new(1, 2);
        let id = spawn_with_move_type(&mut world, 0, 1, MoveType::Vertical);

        // down is the map edge: the very first step fails and reverses
        run(&mut world, &mut fixture, 1);
        let ch = world.get(id).unwrap();
        assert_eq!(ch.get_y(), 1);
        assert!(ch.cycle_stat);
        assert!(ch.get_move_failed());
    }

    #[test]
    fn random_policy_stays_on_the_map() {
        let mut world = MapState::with_rng_seed(99);
        let mut fixture = TestEnv::new(5, 5);
        let id = spawn_with_move_type(&mut world, 2, 2, MoveType::Random);

        for _ in 0..300 {
            world.tick(&mut fixture.env());
            let ch = world.get(id).unwrap();
            assert!((0..5).contains(&ch.get_x()));
            assert!((0..5).contains(&ch.get_y()));
            assert!(ch.get_remaining_step() <= SCREEN_TILE_WIDTH);
        }
    }

    #[test]
    fn toward_policy_closes_on_the_hero() {
        let mut world = MapState::with_rng_seed(12);
        let mut fixture = TestEnv::new(30, 30);
        world.hero_mut().set_position(5, 5);
        let id = spawn_with_move_type(&mut world, 12, 5, MoveType::Toward);

        run(&mut world, &mut fixture, 600);
        let ch = world.get(id).unwrap();
        let distance = (ch.get_x() - 5).abs() + (ch.get_y() - 5).abs();
        assert!(
            distance <= 5,
            "expected the chaser near the hero, ended at ({}, {})",
            ch.get_x(),
            ch.get_y()
        );
    }

    #[test]
    fn away_policy_retreats_from_the_hero() {
        let mut world = MapState::with_rng_seed(12);
        let mut fixture = TestEnv::new(30, 30);
        world.hero_mut().set_position(15, 15);
        let id = spawn_with_move_type(&mut world, 17, 15, MoveType::Away);

        run(&mut world, &mut fixture, 400);
        let ch = world.get(id).unwrap();
        let distance = (ch.get_x() - 15).abs() + (ch.get_y() - 15).abs();
        assert!(distance > 2, "expected retreat, ended at distance {}", distance);
    }
}
