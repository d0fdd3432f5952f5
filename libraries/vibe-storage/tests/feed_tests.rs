//! Integration tests for the posts slice and feed paging
//!
//! Tests:
//! - Feed filtering to the viewer plus followees
//! - Cursor ("older than") paging
//! - Likes and comments attached to fetched posts


use test_helpers::*;
use vibe_core::types::{FeedQuery, Like, NewComment, PostId, UserId};
use vibe_core::SocialBackend;

#[tokio::test]
async fn test_feed_includes_self_and_followees_only() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user_a = create_test_user(pool, "usera").await;
    let user_b = create_test_user(pool, "userb").await;
    let user_c = create_test_user(pool, "userc").await;

    create_test_follow(pool, &user_a, &user_b).await;

    create_test_post(pool, &user_a, "Song A").await;
    create_test_post(pool, &user_b, "Song B").await;
    create_test_post(pool, &user_c, "Song C").await;

    let backend = test_db.backend();
    let following = backend.following_ids(&user_a).await.unwrap();
    let authors = FeedQuery::feed_authors(&user_a, following);
    let page = backend
        .fetch_posts(&FeedQuery::new(authors, 10))
        .await
        .unwrap();

    let author_ids: Vec<&UserId> = page.iter().map(|p| &p.author_id).collect();
    assert_eq!(page.len(), 2);
    assert!(author_ids.contains(&&user_a));
    assert!(author_ids.contains(&&user_b));
    assert!(!author_ids.contains(&&user_c));
}

#[tokio::test]
async fn test_feed_is_newest_first_and_pages_by_cursor() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "pager").await;
    for i in 0..25 {
        create_test_post(pool, &user, &format!("Song {}", i)).await;
    }

    let first = vibe_storage::posts::feed_page(pool, &FeedQuery::new(vec![user.clone()], 10))
        .await
        .unwrap();
    assert_eq!(first.len(), 10);
    assert!(first.windows(2).all(|w| w[0].id > w[1].id));
    assert_eq!(first[0].song.name, "Song 24");

    let cursor = first.last().unwrap().id;
    let second = vibe_storage::posts::feed_page(
        pool,
        &FeedQuery::new(vec![user.clone()], 10).before(cursor),
    )
    .await
    .unwrap();
    assert_eq!(second.len(), 10);
    assert!(second.iter().all(|p| p.id < cursor));
    assert_eq!(second[0].song.name, "Song 14");

    let third = vibe_storage::posts::feed_page(
        pool,
        &FeedQuery::new(vec![user.clone()], 10).before(second.last().unwrap().id),
    )
    .await
    .unwrap();
    assert_eq!(third.len(), 5);

    // Past the end: empty, not an error
    let past_end = vibe_storage::posts::feed_page(
        pool,
        &FeedQuery::new(vec![user], 10).before(third.last().unwrap().id),
    )
    .await
    .unwrap();
    assert!(past_end.is_empty());
}

#[tokio::test]
async fn test_feed_with_no_authors_is_empty() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "lonely").await;
    create_test_post(pool, &user, "Song").await;

    let page = vibe_storage::posts::feed_page(pool, &FeedQuery::new(Vec::new(), 10))
        .await
        .unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_fetched_posts_carry_likes_and_comments() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let author = create_test_user(pool, "author").await;
    let fan = create_test_user(pool, "fan").await;
    let post = create_test_post(pool, &author, "Liked Song").await;

    vibe_storage::likes::create(pool, &Like::new(post.id, fan.clone()))
        .await
        .unwrap();
    vibe_storage::comments::create(
        pool,
        &NewComment {
            post_id: post.id,
            user_id: fan.clone(),
            username: "fan".to_string(),
            text: "great pick".to_string(),
        },
    )
    .await
    .unwrap();
    vibe_storage::comments::create(
        pool,
        &NewComment {
            post_id: post.id,
            user_id: author.clone(),
            username: "author".to_string(),
            text: "thanks!".to_string(),
        },
    )
    .await
    .unwrap();

    let fetched = vibe_storage::posts::get_by_id(pool, post.id)
        .await
        .unwrap()
        .unwrap();

    assert!(fetched.is_liked_by(&fan));
    assert!(!fetched.is_liked_by(&author));
    assert_eq!(fetched.comments.len(), 2);
    assert_eq!(fetched.comments[0].text, "great pick");
    assert_eq!(fetched.comments[1].text, "thanks!");
    assert_eq!(fetched.author_username, "author");
}

#[tokio::test]
async fn test_create_post_requires_signed_in_author() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let author = create_test_user(pool, "poster").await;
    let other = create_test_user(pool, "other").await;
    let backend = test_db.backend();

    let new_post = vibe_core::types::NewPost {
        author_id: author.clone(),
        song: test_song("Morning Song"),
        caption: "today's pick".to_string(),
    };

    let result = backend.create_post(new_post.clone()).await;
    assert!(matches!(result, Err(vibe_core::VibeError::NotSignedIn)));

    backend.sign_in(other).await;
    assert!(backend.create_post(new_post.clone()).await.is_err());

    backend.sign_in(author.clone()).await;
    let post = backend.create_post(new_post).await.unwrap();
    assert_eq!(post.author_id, author);
    assert_eq!(post.caption, "today's pick");
    assert!(post.id > PostId::new(0));
}
