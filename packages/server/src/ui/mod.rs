//! UI layer: HTTP routes, the WebSocket endpoint and per-connection dispatch.

pub mod connection;
pub mod error;
mod handler;
pub mod server;
mod signal;
pub mod state;

pub use connection::ConnectionManager;
pub use error::ServerError;
pub use server::Server;
