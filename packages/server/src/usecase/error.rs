//! UseCase error types.
//!
//! Delivery failures are never reported here: a member that cannot be reached
//! is logged and skipped while the operation itself succeeds.

use thiserror::Error;

/// Join errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    /// Connection is already a member of the room
    #[error("connection '{0}' is already a member of the room")]
    AlreadyMember(String),
}

/// Leave errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaveRoomError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("connection '{0}' is not a member of the room")]
    NotMember(String),
}

/// Chat post errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostMessageError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("connection '{0}' is not a member of the room")]
    NotMember(String),
}

/// Signaling relay errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelaySignalError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("connection '{0}' is not a member of the room")]
    NotMember(String),
}
