//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Room summary returned by `/api/rooms` and `/api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub member_count: usize,
    pub message_count: usize,
    /// RFC 3339 (UTC)
    pub created_at: String,
}
