//! Route handlers.

mod http;
mod websocket;

pub use http::{get_room_detail, get_rooms, health_check, redirect_to_new_room, room_page};
pub use websocket::websocket_handler;
