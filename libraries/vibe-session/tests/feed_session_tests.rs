//! Viewability tracking and feed session wiring

mod common;

use common::{post, post_with_song, song, FakeBackend, FakeEngine};
use std::sync::Arc;
use vibe_core::{PostId, UserId};
use vibe_session::{
    FeedPager, FeedSession, LoadOutcome, PlayOutcome, SessionAudioController, ViewabilityChange,
    ViewabilityTracker, VisibleItem,
};

// =============================================================================
// Tracker
// =============================================================================

#[test]
fn test_first_item_over_threshold_is_dominant() {
    let top = post(3, "a");
    let middle = post(2, "a");
    let mut tracker = ViewabilityTracker::default();

    let change = tracker.observe(&[VisibleItem::new(&top, 0.3), VisibleItem::new(&middle, 0.8)]);

    assert_eq!(
        change,
        ViewabilityChange::Play {
            post_id: PostId::new(2),
            track_id: middle.song.uri.clone(),
            url: middle.song.preview_url.clone().unwrap(),
        }
    );
}

#[test]
fn test_repeated_report_is_suppressed() {
    let top = post(1, "a");
    let mut tracker = ViewabilityTracker::default();

    assert!(matches!(
        tracker.observe(&[VisibleItem::new(&top, 1.0)]),
        ViewabilityChange::Play { .. }
    ));
    assert_eq!(
        tracker.observe(&[VisibleItem::new(&top, 0.9)]),
        ViewabilityChange::Unchanged
    );

    tracker.reset();
    assert!(matches!(
        tracker.observe(&[VisibleItem::new(&top, 0.9)]),
        ViewabilityChange::Play { .. }
    ));
}

#[test]
fn test_nothing_visible_enough_changes_nothing() {
    let top = post(1, "a");
    let mut tracker = ViewabilityTracker::new(0.5);

    assert_eq!(tracker.observe(&[]), ViewabilityChange::Unchanged);
    assert_eq!(
        tracker.observe(&[VisibleItem::new(&top, 0.49)]),
        ViewabilityChange::Unchanged
    );
    assert_eq!(tracker.last_dominant(), None);
}

#[test]
fn test_post_without_preview_asks_to_stop() {
    let silent = post_with_song(4, "a", song("Quiet", false));
    let mut tracker = ViewabilityTracker::default();

    assert_eq!(
        tracker.observe(&[VisibleItem::new(&silent, 1.0)]),
        ViewabilityChange::Stop {
            post_id: PostId::new(4)
        }
    );
}

// =============================================================================
// Feed session
// =============================================================================

fn session(backend: Arc<FakeBackend>, engine: &Arc<FakeEngine>) -> FeedSession {
    let audio = Arc::new(SessionAudioController::new(engine.clone()));
    let pager = Arc::new(FeedPager::new(backend));
    FeedSession::new(pager, audio, ViewabilityTracker::default())
}

#[tokio::test]
async fn test_dominant_post_plays_and_is_bookmarked() {
    let engine = FakeEngine::new();
    let feed = session(
        FakeBackend::with_posts(vec![post(1, "a"), post(2, "a")]),
        &engine,
    );
    feed.pager().set_viewer(UserId::new("a")).await.unwrap();

    let posts = feed.pager().posts();
    let task = feed
        .on_viewable_items_changed(&[VisibleItem::new(&posts[0], 1.0)])
        .unwrap();
    assert_eq!(task.await.unwrap().unwrap(), PlayOutcome::Started);

    assert_eq!(feed.pager().bookmark(), Some(PostId::new(2)));
    assert_eq!(
        feed.audio().now_playing().await.unwrap().track_id,
        posts[0].song.uri
    );

    assert!(feed
        .on_viewable_items_changed(&[VisibleItem::new(&posts[0], 1.0)])
        .is_none());

    let task = feed
        .on_viewable_items_changed(&[VisibleItem::new(&posts[1], 0.7)])
        .unwrap();
    task.await.unwrap().unwrap();
    assert_eq!(engine.live_handles(), 1);
    assert_eq!(feed.pager().bookmark(), Some(PostId::new(1)));
}

#[tokio::test]
async fn test_scrolling_to_silent_post_stops_playback() {
    let engine = FakeEngine::new();
    let feed = session(
        FakeBackend::with_posts(vec![
            post_with_song(1, "a", song("Quiet", false)),
            post(2, "a"),
        ]),
        &engine,
    );
    feed.pager().set_viewer(UserId::new("a")).await.unwrap();
    let posts = feed.pager().posts();

    feed.on_viewable_items_changed(&[VisibleItem::new(&posts[0], 1.0)])
        .unwrap()
        .await
        .unwrap()
        .unwrap();
    let outcome = feed
        .on_viewable_items_changed(&[VisibleItem::new(&posts[1], 1.0)])
        .unwrap()
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome, PlayOutcome::Stopped);
    assert_eq!(engine.live_handles(), 0);
}

#[tokio::test]
async fn test_unfocus_stops_and_replays_on_return() {
    let engine = FakeEngine::new();
    let feed = session(FakeBackend::with_posts(vec![post(1, "a")]), &engine);
    feed.pager().set_viewer(UserId::new("a")).await.unwrap();
    let posts = feed.pager().posts();

    feed.on_viewable_items_changed(&[VisibleItem::new(&posts[0], 1.0)])
        .unwrap()
        .await
        .unwrap()
        .unwrap();

    feed.unfocus().await;
    assert_eq!(engine.live_handles(), 0);
    assert!(feed.audio().now_playing().await.is_none());

    let replay = feed.on_viewable_items_changed(&[VisibleItem::new(&posts[0], 1.0)]);
    assert_eq!(
        replay.unwrap().await.unwrap().unwrap(),
        PlayOutcome::Started
    );
}

#[tokio::test]
async fn test_end_reached_loads_next_page() {
    let engine = FakeEngine::new();
    let backend = FakeBackend::with_posts((1..=12).map(|id| post(id, "a")).collect());
    let feed = session(backend.clone(), &engine);
    feed.pager().set_viewer(UserId::new("a")).await.unwrap();

    assert_eq!(
        feed.on_end_reached(500.0, 600.0).await.unwrap(),
        LoadOutcome::Skipped
    );
    assert_eq!(
        feed.on_end_reached(10.0, 600.0).await.unwrap(),
        LoadOutcome::Loaded(2)
    );
    assert_eq!(feed.pager().len(), 12);
    assert_eq!(backend.fetches(), 2);
}
