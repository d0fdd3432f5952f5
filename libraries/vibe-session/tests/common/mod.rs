//! Shared fakes for session tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{oneshot, Notify};
use vibe_core::{
    AvatarImage, CatalogTrack, Comment, CommentId, FeedQuery, FollowEdge, Like, NewComment, NewPost, Post,
    PostId, PreviewSource, Profile, ProfileSummary, ProfileUpdate, Result, SocialBackend, Song,
    TrackCatalog, UserId, VibeError,
};
use vibe_session::{AudioEngine, AudioHandle, FinishNotifier, LoadRequest};

// =============================================================================
// Fixtures
// =============================================================================

pub fn song(name: &str, preview: bool) -> Song {
    let slug = name.replace(' ', "");
    Song {
        name: name.to_string(),
        artist: "Test Artist".to_string(),
        cover: format!("https://i.scdn.co/image/{}", slug),
        uri: format!("spotify:track:{}", slug),
        preview_url: preview.then(|| format!("https://p.scdn.co/mp3-preview/{}", slug)),
    }
}

pub fn post(id: i64, author: &str) -> Post {
    post_with_song(id, author, song(&format!("song{}", id), true))
}

pub fn post_with_song(id: i64, author: &str, song: Song) -> Post {
    Post {
        id: PostId::new(id),
        author_id: UserId::new(author),
        author_username: author.to_string(),
        author_avatar: None,
        song,
        caption: String::new(),
        created_at: Utc::now(),
        comments: Vec::new(),
        likes: Vec::new(),
    }
}

pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

// =============================================================================
// Audio
// =============================================================================

/// Engine whose loads can be held open and failed per URL
#[derive(Default)]
pub struct FakeEngine {
    live: Arc<AtomicUsize>,
    released: Arc<Mutex<Vec<String>>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    failing: Mutex<HashSet<String>>,
    notifiers: Mutex<Vec<FinishNotifier>>,
    loads: AtomicUsize,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Hold loads of `url` until the returned sender fires.
    pub fn gate(&self, url: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(url.to_string(), rx);
        tx
    }

    pub fn fail(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_string());
    }

    pub fn live_handles(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> Vec<String> {
        self.released.lock().unwrap().clone()
    }

    /// Completion callback of the most recent load.
    pub fn last_notifier(&self) -> FinishNotifier {
        self.notifiers.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl AudioEngine for FakeEngine {
    async fn load(&self, request: LoadRequest) -> Result<Box<dyn AudioHandle>> {
        assert!(request.autoplay);
        self.notifiers.lock().unwrap().push(request.finished.clone());
        let gate = self.gates.lock().unwrap().remove(&request.url);
        self.loads.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = gate {
            gate.await.ok();
        }

        if self.failing.lock().unwrap().contains(&request.url) {
            return Err(VibeError::audio(format!("cannot load {}", request.url)));
        }

        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeHandle {
            url: request.url,
            live: Arc::clone(&self.live),
            released: Arc::clone(&self.released),
            done: false,
        }))
    }
}

struct FakeHandle {
    url: String,
    live: Arc<AtomicUsize>,
    released: Arc<Mutex<Vec<String>>>,
    done: bool,
}

#[async_trait]
impl AudioHandle for FakeHandle {
    async fn release(&mut self) -> Result<()> {
        assert!(!self.done, "handle released twice: {}", self.url);
        self.done = true;
        self.live.fetch_sub(1, Ordering::SeqCst);
        self.released.lock().unwrap().push(self.url.clone());
        Ok(())
    }
}

// =============================================================================
// Backend
// =============================================================================

/// In-memory backend with call counters, failure switches, and a fetch gate
#[derive(Default)]
pub struct FakeBackend {
    pub posts: Mutex<Vec<Post>>,
    pub following: Mutex<HashMap<UserId, Vec<UserId>>>,
    pub likes: Mutex<Vec<Like>>,
    pub comments: Mutex<Vec<Comment>>,
    pub edges: Mutex<Vec<FollowEdge>>,
    pub profiles: Mutex<HashMap<UserId, Profile>>,
    pub avatars: Mutex<HashMap<UserId, AvatarImage>>,
    pub fetch_calls: AtomicUsize,
    pub write_calls: AtomicUsize,
    pub fail_fetch: AtomicBool,
    pub fail_writes: AtomicBool,
    fetch_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_posts(posts: Vec<Post>) -> Arc<Self> {
        let backend = Self::default();
        *backend.posts.lock().unwrap() = posts;
        Arc::new(backend)
    }

    pub fn add_post(&self, post: Post) {
        self.posts.lock().unwrap().push(post);
    }

    pub fn set_following(&self, user: &str, followees: &[&str]) {
        self.following.lock().unwrap().insert(
            UserId::new(user),
            followees.iter().map(|f| UserId::new(*f)).collect(),
        );
    }

    /// Make every following `fetch_posts` wait until the returned notify fires.
    pub fn gate_fetches(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.fetch_gate.lock().unwrap() = Some(Arc::clone(&notify));
        notify
    }

    pub fn ungate_fetches(&self) {
        *self.fetch_gate.lock().unwrap() = None;
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    fn write(&self) -> Result<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(VibeError::network("backend unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SocialBackend for FakeBackend {
    async fn current_user(&self) -> Result<Option<Profile>> {
        Ok(None)
    }

    async fn fetch_posts(&self, query: &FeedQuery) -> Result<Vec<Post>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.fetch_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(VibeError::network("feed unavailable"));
        }

        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| query.authors.contains(&p.author_id))
            .filter(|p| query.before.map_or(true, |before| p.id < before))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        posts.truncate(query.limit);
        Ok(posts)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        self.write()?;
        let mut posts = self.posts.lock().unwrap();
        let id = posts.iter().map(|p| p.id.get()).max().unwrap_or(0) + 1;
        let created = Post {
            caption: post.caption,
            ..post_with_song(id, post.author_id.as_str(), post.song)
        };
        posts.push(created.clone());
        Ok(created)
    }

    async fn like_post(&self, like: &Like) -> Result<()> {
        self.write()?;
        let mut likes = self.likes.lock().unwrap();
        if !likes.contains(like) {
            likes.push(like.clone());
        }
        Ok(())
    }

    async fn unlike_post(&self, like: &Like) -> Result<()> {
        self.write()?;
        self.likes.lock().unwrap().retain(|l| l != like);
        Ok(())
    }

    async fn add_comment(&self, comment: NewComment) -> Result<Comment> {
        self.write()?;
        let mut comments = self.comments.lock().unwrap();
        let stored = Comment {
            id: CommentId::new(comments.len() as i64 + 1),
            post_id: comment.post_id,
            user_id: comment.user_id,
            username: comment.username,
            text: comment.text,
            created_at: Utc::now(),
        };
        comments.push(stored.clone());
        Ok(stored)
    }

    async fn following_ids(&self, user: &UserId) -> Result<Vec<UserId>> {
        Ok(self
            .following
            .lock()
            .unwrap()
            .get(user)
            .cloned()
            .unwrap_or_default())
    }

    async fn follow(&self, edge: &FollowEdge) -> Result<()> {
        self.write()?;
        self.edges.lock().unwrap().push(edge.clone());
        Ok(())
    }

    async fn unfollow(&self, follower: &UserId, followee: &UserId) -> Result<()> {
        self.write()?;
        self.edges
            .lock()
            .unwrap()
            .retain(|e| !(&e.follower_id == follower && &e.followee_id == followee));
        Ok(())
    }

    async fn is_following(&self, follower: &UserId, followee: &UserId) -> Result<bool> {
        Ok(self
            .edges
            .lock()
            .unwrap()
            .iter()
            .any(|e| &e.follower_id == follower && &e.followee_id == followee))
    }

    async fn followers(
        &self,
        _user: &UserId,
        _username_filter: Option<&str>,
    ) -> Result<Vec<ProfileSummary>> {
        Ok(Vec::new())
    }

    async fn following(
        &self,
        _user: &UserId,
        _username_filter: Option<&str>,
    ) -> Result<Vec<ProfileSummary>> {
        Ok(Vec::new())
    }

    async fn get_profile(&self, user: &UserId) -> Result<Option<Profile>> {
        Ok(self.profiles.lock().unwrap().get(user).cloned())
    }

    async fn update_profile(&self, user: &UserId, update: ProfileUpdate) -> Result<Profile> {
        self.write()?;
        let profile = Profile {
            id: user.clone(),
            username: update.username,
            name: update.name,
            bio: update.bio,
            avatar: None,
        };
        self.profiles
            .lock()
            .unwrap()
            .insert(user.clone(), profile.clone());
        Ok(profile)
    }

    async fn upload_avatar(
        &self,
        user: &UserId,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        self.write()?;
        self.avatars.lock().unwrap().insert(
            user.clone(),
            AvatarImage {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(format!("https://cdn.test/avatars/{}", user))
    }

    async fn avatar(&self, user: &UserId) -> Result<Option<AvatarImage>> {
        Ok(self.avatars.lock().unwrap().get(user).cloned())
    }

    async fn delete_account(&self, _user: &UserId) -> Result<()> {
        self.write()
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Catalog returning canned tracks and recording queries
#[derive(Default)]
pub struct FakeCatalog {
    pub queries: Mutex<Vec<String>>,
}

#[async_trait]
impl TrackCatalog for FakeCatalog {
    async fn search_tracks(&self, query: &str) -> Result<Vec<CatalogTrack>> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(vec![track(&format!("{}-1", query), query)])
    }
}

pub fn track(track_id: &str, name: &str) -> CatalogTrack {
    CatalogTrack {
        track_id: track_id.to_string(),
        name: name.to_string(),
        artist: "Test Artist".to_string(),
        uri: format!("spotify:track:{}", track_id),
        cover: String::new(),
        preview_url: None,
    }
}

/// Preview source with a fixed answer per track and a lookup counter
#[derive(Default)]
pub struct FakePreviews {
    pub urls: Mutex<HashMap<String, Vec<String>>>,
    pub lookups: AtomicUsize,
}

#[async_trait]
impl PreviewSource for FakePreviews {
    async fn preview_urls(&self, track_id: &str) -> Result<Vec<String>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .urls
            .lock()
            .unwrap()
            .get(track_id)
            .cloned()
            .unwrap_or_default())
    }
}
