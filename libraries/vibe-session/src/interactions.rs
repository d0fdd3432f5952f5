//! Likes, comments, and follows
//!
//! Likes and follows update local state first and roll back if the backend
//! call fails. Comments appear only once the backend has stored them.

use crate::error::{Result, SessionError};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};
use vibe_core::{
    Comment, FollowEdge, Like, NewComment, Post, PostId, SocialBackend, UserId,
};

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ============================================================================
// Likes
// ============================================================================

/// Like button state for one post and viewer
pub struct LikeToggle {
    backend: Arc<dyn SocialBackend>,
    post_id: PostId,
    viewer: UserId,
    likes: Mutex<Vec<Like>>,
}

impl LikeToggle {
    pub fn new(backend: Arc<dyn SocialBackend>, post: &Post, viewer: UserId) -> Self {
        Self {
            backend,
            post_id: post.id,
            viewer,
            likes: Mutex::new(post.likes.clone()),
        }
    }

    pub fn is_liked(&self) -> bool {
        locked(&self.likes)
            .iter()
            .any(|like| like.user_id == self.viewer)
    }

    pub fn count(&self) -> usize {
        locked(&self.likes).len()
    }

    pub fn likes(&self) -> Vec<Like> {
        locked(&self.likes).clone()
    }

    /// Flip the viewer's like. Returns the new liked state.
    pub async fn toggle(&self) -> Result<bool> {
        let like = Like::new(self.post_id, self.viewer.clone());
        let was_liked = self.flip(&like);

        let result = if was_liked {
            self.backend.unlike_post(&like).await
        } else {
            self.backend.like_post(&like).await
        };

        match result {
            Ok(()) => {
                debug!(post_id = %self.post_id, liked = !was_liked, "Like toggled");
                Ok(!was_liked)
            }
            Err(e) => {
                warn!(post_id = %self.post_id, error = %e, "Like toggle failed, rolling back");
                self.set(&like, was_liked);
                Err(e.into())
            }
        }
    }

    /// Flip local state, returning whether the like was present before.
    fn flip(&self, like: &Like) -> bool {
        let mut likes = locked(&self.likes);
        if let Some(pos) = likes.iter().position(|l| l.user_id == like.user_id) {
            likes.remove(pos);
            true
        } else {
            likes.push(like.clone());
            false
        }
    }

    fn set(&self, like: &Like, liked: bool) {
        let mut likes = locked(&self.likes);
        let present = likes.iter().any(|l| l.user_id == like.user_id);
        if liked && !present {
            likes.push(like.clone());
        } else if !liked && present {
            likes.retain(|l| l.user_id != like.user_id);
        }
    }
}

// ============================================================================
// Comments
// ============================================================================

/// Comment sheet state for one post
pub struct CommentThread {
    backend: Arc<dyn SocialBackend>,
    post_id: PostId,
    author: UserId,
    username: String,
    comments: Mutex<Vec<Comment>>,
}

impl CommentThread {
    pub fn new(
        backend: Arc<dyn SocialBackend>,
        post: &Post,
        author: UserId,
        username: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            post_id: post.id,
            author,
            username: username.into(),
            comments: Mutex::new(post.comments.clone()),
        }
    }

    /// Comments, oldest first.
    pub fn comments(&self) -> Vec<Comment> {
        locked(&self.comments).clone()
    }

    /// Post a comment. Blank text is rejected without a request.
    pub async fn submit(&self, text: &str) -> Result<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::InvalidInput(
                "Comment cannot be empty".to_string(),
            ));
        }

        let comment = self
            .backend
            .add_comment(NewComment {
                post_id: self.post_id,
                user_id: self.author.clone(),
                username: self.username.clone(),
                text: text.to_string(),
            })
            .await?;

        locked(&self.comments).push(comment.clone());
        debug!(post_id = %self.post_id, comment_id = %comment.id, "Comment added");
        Ok(comment)
    }
}

// ============================================================================
// Follows
// ============================================================================

/// Follow button state for one (viewer, target) pair
///
/// The status is unknown until [`FollowToggle::load`] runs; `toggle` loads
/// it first when needed.
pub struct FollowToggle {
    backend: Arc<dyn SocialBackend>,
    edge: FollowEdge,
    following: Mutex<Option<bool>>,
}

impl FollowToggle {
    pub fn new(backend: Arc<dyn SocialBackend>, edge: FollowEdge) -> Self {
        Self {
            backend,
            edge,
            following: Mutex::new(None),
        }
    }

    /// Last known status; `false` before it was loaded.
    pub fn is_following(&self) -> bool {
        locked(&self.following).unwrap_or(false)
    }

    /// Read the follow status from the backend.
    pub async fn load(&self) -> Result<bool> {
        let following = self
            .backend
            .is_following(&self.edge.follower_id, &self.edge.followee_id)
            .await?;
        *locked(&self.following) = Some(following);
        Ok(following)
    }

    /// Follow or unfollow. Returns the new status.
    pub async fn toggle(&self) -> Result<bool> {
        let known = *locked(&self.following);
        let was_following = match known {
            Some(following) => following,
            None => self.load().await?,
        };
        *locked(&self.following) = Some(!was_following);

        let result = if was_following {
            self.backend
                .unfollow(&self.edge.follower_id, &self.edge.followee_id)
                .await
        } else {
            self.backend.follow(&self.edge).await
        };

        match result {
            Ok(()) => {
                debug!(
                    followee = %self.edge.followee_id,
                    following = !was_following,
                    "Follow toggled"
                );
                Ok(!was_following)
            }
            Err(e) => {
                warn!(followee = %self.edge.followee_id, error = %e, "Follow toggle failed, rolling back");
                *locked(&self.following) = Some(was_following);
                Err(e.into())
            }
        }
    }
}
