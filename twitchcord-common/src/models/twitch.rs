use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A live stream as reported by the Helix "Get Streams" endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub id: String,
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    #[serde(default)]
    pub game_name: String,
    pub title: String,
    pub viewer_count: u32,
    pub started_at: DateTime<Utc>,
    /// Contains `{width}` and `{height}` placeholders.
    pub thumbnail_url: String,
}

/// Subset of the Helix "Get Users" record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub login: String,
    pub display_name: String,
    #[serde(default)]
    pub profile_image_url: String,
}

/// A clip from the Helix "Get Clips" endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipInfo {
    pub id: String,
    pub url: String,
    pub title: String,
    pub creator_name: String,
    #[serde(default)]
    pub view_count: u64,
    pub created_at: DateTime<Utc>,
    pub thumbnail_url: String,
}
