//! UseCase layer: room membership, chat and signaling operations.
//!
//! Every operation that changes a room or notifies its members runs while
//! holding that room's lock (see [`crate::domain::RoomGuard`]).

pub mod chat;
pub mod error;
pub mod join_room;
pub mod leave_room;
pub mod query_rooms;
pub mod relay_signal;

pub use chat::ChatUseCase;
pub use error::{JoinRoomError, LeaveRoomError, PostMessageError, RelaySignalError};
pub use join_room::JoinRoomUseCase;
pub use leave_room::{LeaveOutcome, LeaveRoomUseCase};
pub use query_rooms::{GetRoomDetailError, GetRoomDetailUseCase, GetRoomsUseCase};
pub use relay_signal::RelaySignalUseCase;
