//! Like, comment, follow, and profile interaction tests

mod common;

use common::{post, FakeBackend, FakeEngine};
use std::sync::atomic::Ordering;
use vibe_core::{FollowEdge, Like, PostId, ProfileUpdate, UserId};
use vibe_session::{
    AvatarUpload, CommentThread, FollowToggle, LikeToggle, ProfileSession,
    SessionAudioController, SessionError,
};

fn viewer() -> UserId {
    UserId::new("viewer")
}

// =============================================================================
// Likes
// =============================================================================

mod likes {
    use super::*;

    #[tokio::test]
    async fn test_toggle_like_and_unlike() {
        let backend = FakeBackend::new();
        let toggle = LikeToggle::new(backend.clone(), &post(1, "author"), viewer());

        assert!(toggle.toggle().await.unwrap());
        assert!(toggle.is_liked());
        assert_eq!(toggle.count(), 1);
        assert_eq!(backend.likes.lock().unwrap().len(), 1);

        assert!(!toggle.toggle().await.unwrap());
        assert!(!toggle.is_liked());
        assert_eq!(toggle.count(), 0);
        assert!(backend.likes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_existing_like_is_not_duplicated() {
        let backend = FakeBackend::new();
        let mut liked = post(1, "author");
        liked.likes.push(Like::new(PostId::new(1), viewer()));
        liked.likes.push(Like::new(PostId::new(1), UserId::new("other")));

        let toggle = LikeToggle::new(backend.clone(), &liked, viewer());
        assert!(toggle.is_liked());

        toggle.toggle().await.unwrap();
        toggle.toggle().await.unwrap();

        let mine = toggle
            .likes()
            .iter()
            .filter(|like| like.user_id == viewer())
            .count();
        assert_eq!(mine, 1);
        assert_eq!(toggle.count(), 2);
    }

    #[tokio::test]
    async fn test_failed_like_rolls_back() {
        let backend = FakeBackend::new();
        backend.fail_writes.store(true, Ordering::SeqCst);
        let toggle = LikeToggle::new(backend.clone(), &post(1, "author"), viewer());

        assert!(toggle.toggle().await.is_err());
        assert!(!toggle.is_liked());
        assert_eq!(toggle.count(), 0);
    }

    #[tokio::test]
    async fn test_failed_unlike_rolls_back() {
        let backend = FakeBackend::new();
        let mut liked = post(1, "author");
        liked.likes.push(Like::new(PostId::new(1), viewer()));
        backend.fail_writes.store(true, Ordering::SeqCst);

        let toggle = LikeToggle::new(backend.clone(), &liked, viewer());
        assert!(toggle.toggle().await.is_err());
        assert!(toggle.is_liked());
        assert_eq!(toggle.count(), 1);
    }
}

// =============================================================================
// Comments
// =============================================================================

mod comments {
    use super::*;

    #[tokio::test]
    async fn test_submit_appends_stored_comment() {
        let backend = FakeBackend::new();
        let thread = CommentThread::new(backend.clone(), &post(1, "author"), viewer(), "viewer");

        let comment = thread.submit("  great pick  ").await.unwrap();

        assert_eq!(comment.text, "great pick");
        assert_eq!(comment.post_id, PostId::new(1));
        assert_eq!(thread.comments(), vec![comment]);
    }

    #[tokio::test]
    async fn test_blank_comment_makes_no_request() {
        let backend = FakeBackend::new();
        let thread = CommentThread::new(backend.clone(), &post(1, "author"), viewer(), "viewer");

        assert!(matches!(
            thread.submit("   ").await,
            Err(SessionError::InvalidInput(_))
        ));
        assert_eq!(backend.writes(), 0);
        assert!(thread.comments().is_empty());
    }

    #[tokio::test]
    async fn test_failed_comment_is_not_shown() {
        let backend = FakeBackend::new();
        backend.fail_writes.store(true, Ordering::SeqCst);
        let thread = CommentThread::new(backend.clone(), &post(1, "author"), viewer(), "viewer");

        assert!(thread.submit("hello").await.is_err());
        assert!(thread.comments().is_empty());
    }
}

// =============================================================================
// Follows
// =============================================================================

mod follows {
    use super::*;

    fn edge() -> FollowEdge {
        FollowEdge {
            follower_id: viewer(),
            follower_username: "viewer".to_string(),
            followee_id: UserId::new("artist"),
            followee_username: "artist".to_string(),
        }
    }

    #[tokio::test]
    async fn test_follow_then_unfollow() {
        let backend = FakeBackend::new();
        let toggle = FollowToggle::new(backend.clone(), edge());

        assert!(!toggle.load().await.unwrap());
        assert!(toggle.toggle().await.unwrap());
        assert_eq!(backend.edges.lock().unwrap().as_slice(), &[edge()]);

        assert!(!toggle.toggle().await.unwrap());
        assert!(!toggle.load().await.unwrap());
    }

    #[tokio::test]
    async fn test_toggle_before_load_unfollows_existing_edge() {
        let backend = FakeBackend::new();
        backend.edges.lock().unwrap().push(edge());
        let toggle = FollowToggle::new(backend.clone(), edge());

        assert!(!toggle.toggle().await.unwrap());
        assert!(!toggle.is_following());
        assert!(backend.edges.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_follow_rolls_back() {
        let backend = FakeBackend::new();
        backend.fail_writes.store(true, Ordering::SeqCst);
        let toggle = FollowToggle::new(backend.clone(), edge());

        assert!(toggle.toggle().await.is_err());
        assert!(!toggle.is_following());
    }
}

// =============================================================================
// Profile
// =============================================================================

mod profile {
    use super::*;

    #[tokio::test]
    async fn test_save_uploads_avatar_then_updates() {
        let backend = FakeBackend::new();
        let session = ProfileSession::new(backend.clone(), viewer());

        let profile = session
            .save(
                ProfileUpdate {
                    name: " Viewer ".to_string(),
                    username: " viewer2 ".to_string(),
                    bio: "jazz".to_string(),
                },
                Some(AvatarUpload {
                    bytes: vec![1, 2, 3],
                    content_type: "image/png".to_string(),
                }),
            )
            .await
            .unwrap();

        assert_eq!(profile.username, "viewer2");
        assert_eq!(profile.name, "Viewer");
        assert_eq!(backend.writes(), 2);

        let avatar = session.avatar(&viewer()).await.unwrap().unwrap();
        assert_eq!(avatar.bytes, vec![1, 2, 3]);
        assert_eq!(avatar.content_type, "image/png");
        assert!(session
            .avatar(&UserId::new("stranger"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_blank_username_rejected() {
        let backend = FakeBackend::new();
        let session = ProfileSession::new(backend.clone(), viewer());

        let result = session
            .save(
                ProfileUpdate {
                    name: "Viewer".to_string(),
                    username: "  ".to_string(),
                    bio: String::new(),
                },
                None,
            )
            .await;

        assert!(matches!(result, Err(SessionError::InvalidInput(_))));
        assert_eq!(backend.writes(), 0);
    }

    #[tokio::test]
    async fn test_delete_account_stops_playback() {
        let backend = FakeBackend::new();
        let engine = FakeEngine::new();
        let audio = SessionAudioController::new(engine.clone());
        audio
            .play("https://p.scdn.co/mp3-preview/x", "x")
            .await
            .unwrap();

        ProfileSession::new(backend.clone(), viewer())
            .delete_account(&audio)
            .await
            .unwrap();

        assert_eq!(engine.live_handles(), 0);
        assert_eq!(backend.writes(), 1);
    }
}
