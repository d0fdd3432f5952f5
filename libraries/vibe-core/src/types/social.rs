/// Follow graph and profile types
use super::ids::{PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Directed follow relationship; at most one per ordered pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowEdge {
    /// User doing the following
    pub follower_id: UserId,
    /// Follower's username (denormalized for username search)
    pub follower_username: String,
    /// User being followed
    pub followee_id: UserId,
    /// Followee's username
    pub followee_username: String,
}

/// Public profile of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// User identifier
    pub id: UserId,
    /// Unique handle
    pub username: String,
    /// Display name
    pub name: String,
    /// Free-form bio
    #[serde(default)]
    pub bio: String,
    /// Avatar URL
    pub avatar: Option<String>,
}

/// Editable profile fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New display name
    pub name: String,
    /// New handle
    pub username: String,
    /// New bio
    pub bio: String,
}

/// Stored avatar image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarImage {
    /// MIME type, always `image/*`
    pub content_type: String,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

/// Short listing of a recent post on a profile card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentPost {
    /// Post identifier
    pub id: PostId,
    /// Track title
    pub name: String,
    /// Artist
    pub artist: String,
    /// When it was posted
    pub created_at: DateTime<Utc>,
}

/// Profile with its most recent posts, as shown in follower lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    /// The profile
    #[serde(flatten)]
    pub profile: Profile,
    /// Up to three most recent posts, newest first
    pub recent_posts: Vec<RecentPost>,
}
