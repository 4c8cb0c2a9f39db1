//! Small data-model enums mirroring the integer codes used in authored game
//! data. Every enum keeps its wire value reachable through `code()` and is
//! only constructed from raw data via `from_code`, so out-of-range values are
//! caught at the ingestion boundary instead of inside the simulation.

use serde::{Deserialize, Serialize};

/// Facing and step direction. Codes 0..=3 are the cardinals, 4..=7 the
/// diagonals; the first eight move-command ids are these same codes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
    UpRight = 4,
    DownRight = 5,
    DownLeft = 6,
    UpLeft = 7,
}

impl Direction {
    pub fn from_code(code: i32) -> Option<Direction> {
        match code {
            0 => Some(Direction::Up),
            1 => Some(Direction::Right),
            2 => Some(Direction::Down),
            3 => Some(Direction::Left),
            4 => Some(Direction::UpRight),
            5 => Some(Direction::DownRight),
            6 => Some(Direction::DownLeft),
            7 => Some(Direction::UpLeft),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_diagonal(self) -> bool {
        self.code() > 3
    }

    /// Horizontal step component: +1 east, -1 west, 0 neither.
    pub fn dx(self) -> i32 {
        match self {
            Direction::Right | Direction::UpRight | Direction::DownRight => 1,
            Direction::Left | Direction::UpLeft | Direction::DownLeft => -1,
            _ => 0,
        }
    }

    /// Vertical step component: +1 south, -1 north, 0 neither.
    pub fn dy(self) -> i32 {
        match self {
            Direction::Down | Direction::DownRight | Direction::DownLeft => 1,
            Direction::Up | Direction::UpRight | Direction::UpLeft => -1,
            _ => 0,
        }
    }

    /// The facing 90 degrees clockwise.
    pub fn turn_right_90(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
            Direction::UpRight => Direction::DownRight,
            Direction::DownRight => Direction::DownLeft,
            Direction::DownLeft => Direction::UpLeft,
            Direction::UpLeft => Direction::UpRight,
        }
    }

    /// The facing 90 degrees counter-clockwise.
    pub fn turn_left_90(self) -> Direction {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
            Direction::UpRight => Direction::UpLeft,
            Direction::UpLeft => Direction::DownLeft,
            Direction::DownLeft => Direction::DownRight,
            Direction::DownRight => Direction::UpRight,
        }
    }

    /// The facing 180 degrees away.
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::UpRight => Direction::DownLeft,
            Direction::DownRight => Direction::UpLeft,
            Direction::DownLeft => Direction::UpRight,
            Direction::UpLeft => Direction::DownRight,
        }
    }
}

/// Walk-cycle frame of a character sheet column.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Frame {
    Left = 0,
    Middle = 1,
    Right = 2,
}

impl Frame {
    pub fn from_code(code: i32) -> Option<Frame> {
        match code {
            0 => Some(Frame::Left),
            1 => Some(Frame::Middle),
            2 => Some(Frame::Right),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Event-page animation mode.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum AnimationType {
    /// Walk cycle while moving, rest frame while stopped.
    NonContinuous = 0,
    /// Walk cycle runs whether or not the character moves.
    Continuous = 1,
    /// As `NonContinuous`, facing never changes.
    FixedNonContinuous = 2,
    /// As `Continuous`, facing never changes.
    FixedContinuous = 3,
    /// Single static frame; neither pattern nor facing changes.
    FixedGraphic = 4,
    /// Sprite facing rotates through the four cardinals.
    Spin = 5,
}

impl AnimationType {
    pub fn from_code(code: i32) -> Option<AnimationType> {
        match code {
            0 => Some(AnimationType::NonContinuous),
            1 => Some(AnimationType::Continuous),
            2 => Some(AnimationType::FixedNonContinuous),
            3 => Some(AnimationType::FixedContinuous),
            4 => Some(AnimationType::FixedGraphic),
            5 => Some(AnimationType::Spin),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    /// Pattern keeps cycling while the character stands still.
    pub fn is_continuous(self) -> bool {
        matches!(
            self,
            AnimationType::Continuous | AnimationType::FixedContinuous
        )
    }

    /// Facing is pinned by the animation mode itself.
    pub fn fixes_facing(self) -> bool {
        matches!(
            self,
            AnimationType::FixedNonContinuous
                | AnimationType::FixedContinuous
                | AnimationType::FixedGraphic
        )
    }

    pub fn is_spinning(self) -> bool {
        self == AnimationType::Spin
    }
}

/// Idle behavior selected on the event page.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum MoveType {
    Stationary = 0,
    Random = 1,
    /// Cycle up/down.
    Vertical = 2,
    /// Cycle left/right.
    Horizontal = 3,
    Toward = 4,
    Away = 5,
    Custom = 6,
}

impl MoveType {
    pub fn from_code(code: i32) -> Option<MoveType> {
        match code {
            0 => Some(MoveType::Stationary),
            1 => Some(MoveType::Random),
            2 => Some(MoveType::Vertical),
            3 => Some(MoveType::Horizontal),
            4 => Some(MoveType::Toward),
            5 => Some(MoveType::Away),
            6 => Some(MoveType::Custom),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Z-ordering class of a character relative to the hero layer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Layer {
    Below = 0,
    Same = 1,
    Above = 2,
}

impl Layer {
    pub fn from_code(code: i32) -> Option<Layer> {
        match code {
            0 => Some(Layer::Below),
            1 => Some(Layer::Same),
            2 => Some(Layer::Above),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// The three map vehicles.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum VehicleKind {
    Boat = 0,
    Ship = 1,
    Airship = 2,
}
