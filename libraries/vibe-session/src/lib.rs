//! VibeCheck - Session Logic
//!
//! Platform-agnostic client session management for the VibeCheck feed.
//!
//! This crate provides:
//! - A session audio controller holding at most one preview clip
//! - Viewability tracking that picks the dominant post on screen
//! - A feed pager with cursor paging, refresh, and end-reached detection
//! - Like, comment, and follow interactions with optimistic updates
//! - Profile editing, follower lists, and account deletion
//! - Debounced song search with lazily resolved previews
//!
//! # Architecture
//!
//! The host application supplies the collaborators:
//! - [`vibe_core::SocialBackend`] for identity and rows
//! - [`AudioEngine`] for actual audio output
//! - [`vibe_core::TrackCatalog`] and [`vibe_core::PreviewSource`] for search
//!
//! # Example: Feed Playback
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vibe_session::{
//!     AudioEngine, FeedPager, FeedSession, SessionAudioController, ViewabilityTracker,
//!     VisibleItem,
//! };
//! use vibe_core::{SocialBackend, UserId};
//!
//! # async fn example(backend: Arc<dyn SocialBackend>, engine: Arc<dyn AudioEngine>) {
//! let audio = Arc::new(SessionAudioController::new(engine));
//! audio.spawn_completion_listener();
//!
//! let pager = Arc::new(FeedPager::new(backend));
//! let session = FeedSession::new(pager.clone(), audio, ViewabilityTracker::default());
//!
//! pager.set_viewer(UserId::new("user-a")).await.ok();
//!
//! let posts = pager.posts();
//! if let Some(top) = posts.first() {
//!     session.on_viewable_items_changed(&[VisibleItem::new(top, 0.9)]);
//! }
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod audio;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod feed;
pub mod interactions;
pub mod pager;
pub mod profile;
pub mod search;
pub mod viewability;

pub use audio::{NowPlaying, PlayOutcome, SessionAudioController};
pub use config::SessionConfig;
pub use engine::{AudioEngine, AudioHandle, FinishNotifier, LoadRequest};
pub use error::{Result, SessionError};
pub use events::{SessionEvent, StopReason};
pub use feed::FeedSession;
pub use interactions::{CommentThread, FollowToggle, LikeToggle};
pub use pager::{FeedPager, LoadOutcome, PagerPhase};
pub use profile::{AvatarUpload, FollowList, ProfileSession};
pub use search::{SearchOutcome, SongSearch};
pub use viewability::{ViewabilityChange, ViewabilityTracker, VisibleItem};
