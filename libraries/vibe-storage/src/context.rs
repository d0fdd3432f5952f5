//! `SocialBackend` implementation over the `SQLite` slices

use crate::{avatars, comments, follows, likes, posts, users};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use vibe_core::types::{
    AvatarImage, Comment, FeedQuery, FollowEdge, Like, NewComment, NewPost, Post, Profile, ProfileSummary,
    ProfileUpdate, UserId,
};
use vibe_core::{Result, SocialBackend, VibeError};

/// Local backend scoped to the signed-in user
///
/// Writes on behalf of another user (liking as someone else, editing another
/// profile) are rejected, which is what row-level policies do on the hosted
/// backend.
pub struct LocalBackend {
    pool: SqlitePool,
    avatar_base_url: String,
    current_user: RwLock<Option<UserId>>,
}

impl LocalBackend {
    /// Create a backend over an existing pool
    ///
    /// `avatar_base_url` prefixes public avatar URLs (`{base}/avatars/{user_id}`).
    pub fn new(pool: SqlitePool, avatar_base_url: impl Into<String>) -> Self {
        Self {
            pool,
            avatar_base_url: avatar_base_url.into().trim_end_matches('/').to_string(),
            current_user: RwLock::new(None),
        }
    }

    /// Get the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Act as `user` from now on
    pub async fn sign_in(&self, user: UserId) {
        tracing::info!(user_id = %user, "Signed in");
        *self.current_user.write().await = Some(user);
    }

    /// Drop the acting identity
    pub async fn sign_out(&self) {
        *self.current_user.write().await = None;
    }

    /// Public URL of a user's avatar
    pub fn avatar_url(&self, user: &UserId) -> String {
        format!("{}/avatars/{}", self.avatar_base_url, user)
    }

    async fn require_user(&self, user: &UserId) -> Result<()> {
        match self.current_user.read().await.as_ref() {
            Some(current) if current == user => Ok(()),
            Some(_) => Err(VibeError::invalid_input(format!(
                "cannot act on behalf of {}",
                user
            ))),
            None => Err(VibeError::NotSignedIn),
        }
    }
}

#[async_trait]
impl SocialBackend for LocalBackend {
    async fn current_user(&self) -> Result<Option<Profile>> {
        let Some(id) = self.current_user.read().await.clone() else {
            return Ok(None);
        };
        Ok(users::get_by_id(&self.pool, &id).await?)
    }

    async fn fetch_posts(&self, query: &FeedQuery) -> Result<Vec<Post>> {
        Ok(posts::feed_page(&self.pool, query).await?)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        self.require_user(&post.author_id).await?;
        Ok(posts::create(&self.pool, &post).await?)
    }

    async fn like_post(&self, like: &Like) -> Result<()> {
        self.require_user(&like.user_id).await?;
        Ok(likes::create(&self.pool, like).await?)
    }

    async fn unlike_post(&self, like: &Like) -> Result<()> {
        self.require_user(&like.user_id).await?;
        Ok(likes::delete(&self.pool, like).await?)
    }

    async fn add_comment(&self, comment: NewComment) -> Result<Comment> {
        self.require_user(&comment.user_id).await?;
        Ok(comments::create(&self.pool, &comment).await?)
    }

    async fn following_ids(&self, user: &UserId) -> Result<Vec<UserId>> {
        Ok(follows::following_ids(&self.pool, user).await?)
    }

    async fn follow(&self, edge: &FollowEdge) -> Result<()> {
        self.require_user(&edge.follower_id).await?;
        Ok(follows::create(&self.pool, edge).await?)
    }

    async fn unfollow(&self, follower: &UserId, followee: &UserId) -> Result<()> {
        self.require_user(follower).await?;
        Ok(follows::delete(&self.pool, follower, followee).await?)
    }

    async fn is_following(&self, follower: &UserId, followee: &UserId) -> Result<bool> {
        Ok(follows::exists(&self.pool, follower, followee).await?)
    }

    async fn followers(
        &self,
        user: &UserId,
        username_filter: Option<&str>,
    ) -> Result<Vec<ProfileSummary>> {
        Ok(follows::list(&self.pool, user, follows::Direction::Followers, username_filter).await?)
    }

    async fn following(
        &self,
        user: &UserId,
        username_filter: Option<&str>,
    ) -> Result<Vec<ProfileSummary>> {
        Ok(follows::list(&self.pool, user, follows::Direction::Following, username_filter).await?)
    }

    async fn get_profile(&self, user: &UserId) -> Result<Option<Profile>> {
        Ok(users::get_by_id(&self.pool, user).await?)
    }

    async fn update_profile(&self, user: &UserId, update: ProfileUpdate) -> Result<Profile> {
        self.require_user(user).await?;
        Ok(users::update(&self.pool, user, &update).await?)
    }

    async fn upload_avatar(
        &self,
        user: &UserId,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        self.require_user(user).await?;
        avatars::put(&self.pool, user, &bytes, content_type).await?;

        let url = self.avatar_url(user);
        users::set_avatar_url(&self.pool, user, &url).await?;

        tracing::debug!(user_id = %user, bytes = bytes.len(), "Stored avatar");
        Ok(url)
    }

    async fn avatar(&self, user: &UserId) -> Result<Option<AvatarImage>> {
        Ok(avatars::get(&self.pool, user).await?)
    }

    async fn delete_account(&self, user: &UserId) -> Result<()> {
        self.require_user(user).await?;
        users::delete_account(&self.pool, user).await?;
        self.sign_out().await;
        Ok(())
    }
}
