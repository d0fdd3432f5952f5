//! VibeCheck Core
//!
//! Domain types, collaborator traits, and error handling shared by every
//! VibeCheck crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Post`, `Like`, `Comment`, `FollowEdge`, `Profile`, `Song`
//! - **Collaborator Traits**: `SocialBackend` (auth + rows + storage + account
//!   deletion), `TrackCatalog` (music search), `PreviewSource` (preview URLs)
//! - **Error Handling**: Unified `VibeError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use vibe_core::types::{FeedQuery, PostId, UserId};
//!
//! let viewer = UserId::new("user-a");
//! let followee = UserId::new("user-b");
//!
//! // Page 2 of the feed: posts older than post 42 by the viewer or people they follow
//! let query = FeedQuery::new(vec![viewer, followee], 10).before(PostId::new(42));
//! assert_eq!(query.limit, 10);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use backend::SocialBackend;
pub use error::{Result, VibeError};
pub use traits::{PreviewSource, TrackCatalog};

pub use types::{
    AvatarImage, CatalogTrack, Comment, CommentId, FeedQuery, FollowEdge, Like, NewComment, NewPost, Post,
    PostId, Profile, ProfileSummary, ProfileUpdate, RecentPost, Song, UserId,
};
