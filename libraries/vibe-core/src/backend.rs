//! Social backend trait
//!
//! Contract of the hosted backend-as-a-service: identity, row CRUD for posts,
//! likes, comments, follows and profiles, avatar storage, and the remote
//! account-deletion function.

use crate::error::Result;
use crate::types::{
    AvatarImage, Comment, FeedQuery, FollowEdge, Like, NewComment, NewPost, Post, Profile, ProfileSummary,
    ProfileUpdate, UserId,
};
use async_trait::async_trait;

/// Backend operations the client consumes
///
/// Implemented by `vibe-storage` on `SQLite`; a hosted implementation would
/// forward the same calls over the network.
#[async_trait]
pub trait SocialBackend: Send + Sync {
    // ========================================================================
    // Identity
    // ========================================================================

    /// Profile of the signed-in user, `None` when signed out
    async fn current_user(&self) -> Result<Option<Profile>>;

    // ========================================================================
    // Posts
    // ========================================================================

    /// One feed page, newest first, with likes and comments attached
    async fn fetch_posts(&self, query: &FeedQuery) -> Result<Vec<Post>>;

    /// Create a post and return it as stored
    async fn create_post(&self, post: NewPost) -> Result<Post>;

    // ========================================================================
    // Likes and comments
    // ========================================================================

    /// Record a like; liking an already-liked post is a no-op
    async fn like_post(&self, like: &Like) -> Result<()>;

    /// Remove a like; removing a missing like is a no-op
    async fn unlike_post(&self, like: &Like) -> Result<()>;

    /// Append a comment and return it as stored
    async fn add_comment(&self, comment: NewComment) -> Result<Comment>;

    // ========================================================================
    // Follow graph
    // ========================================================================

    /// Ids of everyone `user` follows
    async fn following_ids(&self, user: &UserId) -> Result<Vec<UserId>>;

    /// Create a follow edge
    async fn follow(&self, edge: &FollowEdge) -> Result<()>;

    /// Delete a follow edge; deleting a missing edge is a no-op
    async fn unfollow(&self, follower: &UserId, followee: &UserId) -> Result<()>;

    /// Whether `follower` follows `followee`
    async fn is_following(&self, follower: &UserId, followee: &UserId) -> Result<bool>;

    /// Users following `user`, optionally filtered by username substring
    async fn followers(
        &self,
        user: &UserId,
        username_filter: Option<&str>,
    ) -> Result<Vec<ProfileSummary>>;

    /// Users `user` follows, optionally filtered by username substring
    async fn following(
        &self,
        user: &UserId,
        username_filter: Option<&str>,
    ) -> Result<Vec<ProfileSummary>>;

    // ========================================================================
    // Profiles
    // ========================================================================

    /// Look up a profile
    async fn get_profile(&self, user: &UserId) -> Result<Option<Profile>>;

    /// Update editable profile fields
    async fn update_profile(&self, user: &UserId, update: ProfileUpdate) -> Result<Profile>;

    /// Store a new avatar image and return its URL
    async fn upload_avatar(&self, user: &UserId, bytes: Vec<u8>, content_type: &str)
        -> Result<String>;

    /// Stored avatar image of a user, `None` if none was uploaded
    async fn avatar(&self, user: &UserId) -> Result<Option<AvatarImage>>;

    /// Delete the account and everything it owns
    async fn delete_account(&self, user: &UserId) -> Result<()>;
}
