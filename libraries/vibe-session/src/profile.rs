//! Profile screens: follower lists, profile editing, account deletion

use crate::audio::SessionAudioController;
use crate::error::{Result, SessionError};
use std::sync::Arc;
use tracing::info;
use vibe_core::{AvatarImage, Profile, ProfileSummary, ProfileUpdate, SocialBackend, UserId};

/// Which list a follow screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowList {
    Followers,
    Following,
}

/// Profile operations for the signed-in user
pub struct ProfileSession {
    backend: Arc<dyn SocialBackend>,
    user: UserId,
}

/// Avatar image picked by the user
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl ProfileSession {
    pub fn new(backend: Arc<dyn SocialBackend>, user: UserId) -> Self {
        Self { backend, user }
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Followers or followees of `user`, optionally narrowed by a username search.
    ///
    /// A blank search shows the full list.
    pub async fn follow_list(
        &self,
        user: &UserId,
        list: FollowList,
        search: &str,
    ) -> Result<Vec<ProfileSummary>> {
        let filter = Some(search.trim()).filter(|s| !s.is_empty());
        let profiles = match list {
            FollowList::Followers => self.backend.followers(user, filter).await?,
            FollowList::Following => self.backend.following(user, filter).await?,
        };
        Ok(profiles)
    }

    /// Save profile edits, uploading a new avatar first when one was picked.
    pub async fn save(
        &self,
        update: ProfileUpdate,
        avatar: Option<AvatarUpload>,
    ) -> Result<Profile> {
        if update.username.trim().is_empty() {
            return Err(SessionError::InvalidInput(
                "Username cannot be empty".to_string(),
            ));
        }

        if let Some(avatar) = avatar {
            let url = self
                .backend
                .upload_avatar(&self.user, avatar.bytes, &avatar.content_type)
                .await?;
            info!(user = %self.user, url = %url, "Avatar uploaded");
        }

        let update = ProfileUpdate {
            name: update.name.trim().to_string(),
            username: update.username.trim().to_string(),
            bio: update.bio.trim().to_string(),
        };
        Ok(self.backend.update_profile(&self.user, update).await?)
    }

    /// Avatar image of any user, for rendering profile cards.
    pub async fn avatar(&self, user: &UserId) -> Result<Option<AvatarImage>> {
        Ok(self.backend.avatar(user).await?)
    }

    /// Delete the account. Playback stops first.
    pub async fn delete_account(&self, audio: &SessionAudioController) -> Result<()> {
        audio.stop().await;
        self.backend.delete_account(&self.user).await?;
        info!(user = %self.user, "Account deleted");
        Ok(())
    }
}
