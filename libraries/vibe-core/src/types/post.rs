/// Post, like, and comment types
use super::ids::{CommentId, PostId, UserId};
use super::song::Song;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A "song of the day" post
///
/// Immutable after creation except for its likes and comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Post identifier
    pub id: PostId,
    /// Author
    pub author_id: UserId,
    /// Author's username at read time
    pub author_username: String,
    /// Author's avatar URL
    pub author_avatar: Option<String>,
    /// Posted song
    #[serde(flatten)]
    pub song: Song,
    /// Caption written by the author
    pub caption: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Comments, oldest first
    pub comments: Vec<Comment>,
    /// Likes, in insertion order
    pub likes: Vec<Like>,
}

impl Post {
    /// Whether `user` has liked this post
    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.likes.iter().any(|like| &like.user_id == user)
    }

    /// Preview URL of the posted song, if one was resolved at creation
    pub fn preview_url(&self) -> Option<&str> {
        self.song.preview_url.as_deref()
    }
}

/// Input for creating a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    /// Author
    pub author_id: UserId,
    /// Song being posted
    pub song: Song,
    /// Caption
    #[serde(default)]
    pub caption: String,
}

/// A like: at most one per (post, user)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Like {
    /// Liked post
    pub post_id: PostId,
    /// User who liked it
    pub user_id: UserId,
}

impl Like {
    /// Create a like record
    pub fn new(post_id: PostId, user_id: UserId) -> Self {
        Self { post_id, user_id }
    }
}

/// A comment on a post (append-only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment identifier
    pub id: CommentId,
    /// Post the comment belongs to
    pub post_id: PostId,
    /// Author
    pub user_id: UserId,
    /// Author display name
    pub username: String,
    /// Comment text
    pub text: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Input for creating a comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    /// Post being commented on
    pub post_id: PostId,
    /// Author
    pub user_id: UserId,
    /// Author display name
    pub username: String,
    /// Comment text
    pub text: String,
}
