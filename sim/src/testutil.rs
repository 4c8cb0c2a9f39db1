//! In-crate stubs for the collaborator traits.

use std::collections::HashSet;

use rpg2k_core::types::Direction;

use crate::env::{AudioBackend, Env, MapBackend, MessageState, RoleHooks, SwitchBackend};
use crate::map_state::CharId;

/// Flat grid where cells are either open or blocked in every direction.
pub(crate) struct GridMap {
    pub width: i32,
    pub height: i32,
    pub loop_horizontal: bool,
    pub loop_vertical: bool,
    pub display_x: i32,
    pub display_y: i32,
    pub interpreter_running: bool,
    pub need_refresh: bool,
    blocked: HashSet<(i32, i32)>,
}

impl GridMap {
    pub fn new(width: i32, height: i32) -> GridMap {
        GridMap {
            width,
            height,
            loop_horizontal: false,
            loop_vertical: false,
            display_x: 0,
            display_y: 0,
            interpreter_running: false,
            need_refresh: false,
            blocked: HashSet::new(),
        }
    }

    pub fn block(&mut self, x: i32, y: i32) {
        self.blocked.insert((x, y));
    }

    pub fn unblock(&mut self, x: i32, y: i32) {
        self.blocked.remove(&(x, y));
    }
}

impl MapBackend for GridMap {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn loop_horizontal(&self) -> bool {
        self.loop_horizontal
    }

    fn loop_vertical(&self) -> bool {
        self.loop_vertical
    }

    fn is_valid(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn is_passable(&self, x: i32, y: i32, _dir: Direction, _who: CharId) -> bool {
        !self.blocked.contains(&(x, y))
    }

    fn is_landable(&self, x: i32, y: i32, _who: CharId) -> bool {
        !self.blocked.contains(&(x, y))
    }

    fn bush_depth(&self, _x: i32, _y: i32) -> i32 {
        0
    }

    fn display_x(&self) -> i32 {
        self.display_x
    }

    fn display_y(&self) -> i32 {
        self.display_y
    }

    fn is_interpreter_running(&self) -> bool {
        self.interpreter_running
    }

    fn set_need_refresh(&mut self, need_refresh: bool) {
        self.need_refresh = need_refresh;
    }
}

#[derive(Default)]
pub(crate) struct RecordingAudio {
    pub plays: Vec<(String, i32, i32)>,
}

impl AudioBackend for RecordingAudio {
    fn se_play(&mut self, file: &str, volume: i32, tempo: i32) {
        self.plays.push((file.to_string(), volume, tempo));
    }
}

#[derive(Default)]
pub(crate) struct SwitchBoard {
    pub writes: Vec<(i32, bool)>,
}

impl SwitchBackend for SwitchBoard {
    fn set_switch(&mut self, switch_id: i32, on: bool) {
        self.writes.push((switch_id, on));
    }
}

#[derive(Default)]
pub(crate) struct MessageStub {
    pub waiting: bool,
    pub continue_events: bool,
}

impl MessageState for MessageStub {
    fn is_message_waiting(&self) -> bool {
        self.waiting
    }

    fn continue_events(&self) -> bool {
        self.continue_events
    }
}

#[derive(Default)]
pub(crate) struct HookStub {
    pub touches: Vec<(CharId, i32, i32)>,
    pub touch_result: bool,
    pub steps_begun: Vec<CharId>,
}

impl RoleHooks for HookStub {
    fn begin_move(&mut self, id: CharId) {
        self.steps_begun.push(id);
    }

    fn check_event_trigger_touch(&mut self, id: CharId, x: i32, y: i32) -> bool {
        self.touches.push((id, x, y));
        self.touch_result
    }
}

/// Owns one of each stub and lends them out bundled as an [`Env`].
pub(crate) struct TestEnv {
    pub map: GridMap,
    pub audio: RecordingAudio,
    pub switches: SwitchBoard,
    pub message: MessageStub,
    pub hooks: HookStub,
}

impl TestEnv {
    pub fn new(width: i32, height: i32) -> TestEnv {
        TestEnv {
            map: GridMap::new(width, height),
            audio: RecordingAudio::default(),
            switches: SwitchBoard::default(),
            message: MessageStub::default(),
            hooks: HookStub::default(),
        }
    }

    pub fn env(&mut self) -> Env<'_> {
        Env {
            map: &mut self.map,
            audio: &mut self.audio,
            switches: &mut self.switches,
            message: &self.message,
            hooks: &mut self.hooks,
        }
    }
}
