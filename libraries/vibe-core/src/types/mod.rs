/// Domain types for VibeCheck
mod feed;
mod ids;
mod post;
mod social;
mod song;

pub use feed::FeedQuery;
pub use ids::{CommentId, PostId, UserId};
pub use post::{Comment, Like, NewComment, NewPost, Post};
pub use social::{AvatarImage, FollowEdge, Profile, ProfileSummary, ProfileUpdate, RecentPost};
pub use song::{CatalogTrack, Song};
