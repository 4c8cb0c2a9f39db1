mod enums;
mod move_route;

pub use enums::{AnimationType, Direction, Frame, Layer, MoveType, VehicleKind};
pub use move_route::{MoveCommand, MoveRoute};
