//! Move routes: the command programs attached to event pages and issued by
//! the event interpreter.
//!
//! Authored data stores each command as an integer id plus up to two integer
//! parameters and one string parameter. The ids are bit-stable (they must
//! match what the original editors wrote into the game files), but inside the
//! engine commands are a tagged enum so dispatch is exhaustive. `from_raw` is
//! the only place raw ids are interpreted; anything unknown is rejected
//! there.

use serde::{Deserialize, Serialize};

use crate::types::Direction;

/// One step of a move route program.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum MoveCommand {
    /// Step one tile in the given direction (wire ids 0..=7 are the
    /// direction codes themselves).
    Move(Direction),
    MoveRandom,
    MoveTowardsHero,
    MoveAwayFromHero,
    MoveForward,
    /// Face the given cardinal.
    Face(Direction),
    Turn90Right,
    Turn90Left,
    Turn180,
    Turn90Random,
    FaceRandomDirection,
    FaceHero,
    FaceAwayFromHero,
    Wait,
    BeginJump,
    EndJump,
    LockFacing,
    UnlockFacing,
    IncreaseMoveSpeed,
    DecreaseMoveSpeed,
    IncreaseMoveFrequency,
    DecreaseMoveFrequency,
    SwitchOn(i32),
    SwitchOff(i32),
    ChangeGraphic { file: String, index: i32 },
    PlaySoundEffect { file: String, volume: i32, tempo: i32 },
    WalkEverywhereOn,
    WalkEverywhereOff,
    StopAnimation,
    StartAnimation,
    IncreaseTransparency,
    DecreaseTransparency,
}

impl MoveCommand {
    /// Decode a raw authored command. `parameter_a`/`parameter_b` carry the
    /// switch id, graphic index or volume/tempo depending on the command;
    /// unused parameters are ignored as the original runtime does.
    pub fn from_raw(
        command_id: i32,
        parameter_a: i32,
        parameter_b: i32,
        parameter_string: &str,
    ) -> Result<MoveCommand, String> {
        let command = match command_id {
            0..=7 => {
                // from_raw only sees 0..=7 here, from_code cannot fail
                MoveCommand::Move(Direction::from_code(command_id).unwrap())
            }
            8 => MoveCommand::MoveRandom,
            9 => MoveCommand::MoveTowardsHero,
            10 => MoveCommand::MoveAwayFromHero,
            11 => MoveCommand::MoveForward,
            12 => MoveCommand::Face(Direction::Up),
            13 => MoveCommand::Face(Direction::Right),
            14 => MoveCommand::Face(Direction::Down),
            15 => MoveCommand::Face(Direction::Left),
            16 => MoveCommand::Turn90Right,
            17 => MoveCommand::Turn90Left,
            18 => MoveCommand::Turn180,
            19 => MoveCommand::Turn90Random,
            20 => MoveCommand::FaceRandomDirection,
            21 => MoveCommand::FaceHero,
            22 => MoveCommand::FaceAwayFromHero,
            23 => MoveCommand::Wait,
            24 => MoveCommand::BeginJump,
            25 => MoveCommand::EndJump,
            26 => MoveCommand::LockFacing,
            27 => MoveCommand::UnlockFacing,
            28 => MoveCommand::IncreaseMoveSpeed,
            29 => MoveCommand::DecreaseMoveSpeed,
            30 => MoveCommand::IncreaseMoveFrequency,
            31 => MoveCommand::DecreaseMoveFrequency,
            32 => MoveCommand::SwitchOn(parameter_a),
            33 => MoveCommand::SwitchOff(parameter_a),
            34 => MoveCommand::ChangeGraphic {
                file: parameter_string.to_string(),
                index: parameter_a,
            },
            35 => MoveCommand::PlaySoundEffect {
                file: parameter_string.to_string(),
                volume: parameter_a,
                tempo: parameter_b,
            },
            36 => MoveCommand::WalkEverywhereOn,
            37 => MoveCommand::WalkEverywhereOff,
            38 => MoveCommand::StopAnimation,
            39 => MoveCommand::StartAnimation,
            40 => MoveCommand::IncreaseTransparency,
            41 => MoveCommand::DecreaseTransparency,
            other => return Err(format!("unknown move command id {}", other)),
        };
        Ok(command)
    }

    /// The wire id this command is stored under in authored data.
    pub fn command_id(&self) -> i32 {
        match self {
            MoveCommand::Move(dir) => dir.code(),
            MoveCommand::MoveRandom => 8,
            MoveCommand::MoveTowardsHero => 9,
            MoveCommand::MoveAwayFromHero => 10,
            MoveCommand::MoveForward => 11,
            MoveCommand::Face(Direction::Up) => 12,
            MoveCommand::Face(Direction::Right) => 13,
            MoveCommand::Face(Direction::Down) => 14,
            MoveCommand::Face(Direction::Left) => 15,
            // Face is only ever built with a cardinal
            MoveCommand::Face(other) => unreachable!("face command with {:?}", other),
            MoveCommand::Turn90Right => 16,
            MoveCommand::Turn90Left => 17,
            MoveCommand::Turn180 => 18,
            MoveCommand::Turn90Random => 19,
            MoveCommand::FaceRandomDirection => 20,
            MoveCommand::FaceHero => 21,
            MoveCommand::FaceAwayFromHero => 22,
            MoveCommand::Wait => 23,
            MoveCommand::BeginJump => 24,
            MoveCommand::EndJump => 25,
            MoveCommand::LockFacing => 26,
            MoveCommand::UnlockFacing => 27,
            MoveCommand::IncreaseMoveSpeed => 28,
            MoveCommand::DecreaseMoveSpeed => 29,
            MoveCommand::IncreaseMoveFrequency => 30,
            MoveCommand::DecreaseMoveFrequency => 31,
            MoveCommand::SwitchOn(_) => 32,
            MoveCommand::SwitchOff(_) => 33,
            MoveCommand::ChangeGraphic { .. } => 34,
            MoveCommand::PlaySoundEffect { .. } => 35,
            MoveCommand::WalkEverywhereOn => 36,
            MoveCommand::WalkEverywhereOff => 37,
            MoveCommand::StopAnimation => 38,
            MoveCommand::StartAnimation => 39,
            MoveCommand::IncreaseTransparency => 40,
            MoveCommand::DecreaseTransparency => 41,
        }
    }
}

/// An ordered move command program plus its looping flags.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveRoute {
    pub move_commands: Vec<MoveCommand>,
    /// Restart from the first command after the last one finishes.
    pub repeat: bool,
    /// On a blocked command, advance past it instead of retrying.
    pub skippable: bool,
}

impl MoveRoute {
    pub fn new(move_commands: Vec<MoveCommand>, repeat: bool, skippable: bool) -> MoveRoute {
        MoveRoute {
            move_commands,
            repeat,
            skippable,
        }
    }

    /// Decode a whole authored route. Fails on the first unknown command id.
    pub fn from_raw(
        raw_commands: &[(i32, i32, i32, String)],
        repeat: bool,
        skippable: bool,
    ) -> Result<MoveRoute, String> {
        let mut move_commands = Vec::with_capacity(raw_commands.len());
        for (index, (id, a, b, s)) in raw_commands.iter().enumerate() {
            let command = MoveCommand::from_raw(*id, *a, *b, s)
                .map_err(|e| format!("command {}: {}", index, e))?;
            move_commands.push(command);
        }
        Ok(MoveRoute {
            move_commands,
            repeat,
            skippable,
        })
    }
}
