//! Room coordinator for peer-to-peer meetings.
//!
//! Tracks WebSocket sessions, groups them into rooms, replays each room's chat
//! history to newcomers and relays WebRTC signaling between room members.

pub mod app;

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
