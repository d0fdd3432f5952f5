//! Post queries and feed paging

use crate::error::{Result, StorageError};
use crate::{comments, likes};
use std::collections::HashMap;
use vibe_core::types::{FeedQuery, NewPost, Post, PostId, Song, UserId};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    user_id: String,
    username: String,
    avatar: Option<String>,
    name: String,
    artist: String,
    cover: String,
    uri: String,
    preview_url: Option<String>,
    caption: String,
    created_at: i64,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            id: PostId::new(self.id),
            author_id: UserId::new(self.user_id),
            author_username: self.username,
            author_avatar: self.avatar,
            song: Song {
                name: self.name,
                artist: self.artist,
                cover: self.cover,
                uri: self.uri,
                preview_url: self.preview_url,
            },
            caption: self.caption,
            created_at: chrono::DateTime::from_timestamp(self.created_at, 0).unwrap_or_default(),
            comments: Vec::new(),
            likes: Vec::new(),
        }
    }
}

const POST_COLUMNS: &str = "SELECT p.id, p.user_id, u.username, u.avatar, p.name, p.artist, \
     p.cover, p.uri, p.preview_url, p.caption, p.created_at \
     FROM song_posts p JOIN users u ON u.id = p.user_id";

/// Insert a post
pub async fn create(pool: &SqlitePool, post: &NewPost) -> Result<Post> {
    if post.song.name.trim().is_empty() {
        return Err(StorageError::InvalidInput("song name cannot be empty".into()));
    }

    let result = sqlx::query(
        "INSERT INTO song_posts (user_id, name, artist, cover, uri, preview_url, caption, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(post.author_id.as_str())
    .bind(&post.song.name)
    .bind(&post.song.artist)
    .bind(&post.song.cover)
    .bind(&post.song.uri)
    .bind(&post.song.preview_url)
    .bind(&post.caption)
    .bind(chrono::Utc::now().timestamp())
    .execute(pool)
    .await?;

    let id = PostId::new(result.last_insert_rowid());
    tracing::debug!(post_id = %id, author = %post.author_id, "Created post");

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("post", id.to_string()))
}

/// Get a single post with its likes and comments
pub async fn get_by_id(pool: &SqlitePool, id: PostId) -> Result<Option<Post>> {
    let row = sqlx::query_as::<_, PostRow>(&format!("{} WHERE p.id = ?", POST_COLUMNS))
        .bind(id.get())
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let mut posts = vec![row.into_post()];
    attach_interactions(pool, &mut posts).await?;
    Ok(posts.pop())
}

/// One feed page: posts by `query.authors`, newest first, older than the cursor
pub async fn feed_page(pool: &SqlitePool, query: &FeedQuery) -> Result<Vec<Post>> {
    if query.authors.is_empty() || query.limit == 0 {
        return Ok(Vec::new());
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(POST_COLUMNS);
    builder.push(" WHERE p.user_id IN (");
    let mut authors = builder.separated(", ");
    for author in &query.authors {
        authors.push_bind(author.as_str().to_owned());
    }
    authors.push_unseparated(")");

    if let Some(cursor) = query.before {
        builder.push(" AND p.id < ").push_bind(cursor.get());
    }

    builder
        .push(" ORDER BY p.id DESC LIMIT ")
        .push_bind(query.limit as i64);

    let rows: Vec<PostRow> = builder.build_query_as().fetch_all(pool).await?;
    let mut posts: Vec<Post> = rows.into_iter().map(PostRow::into_post).collect();

    attach_interactions(pool, &mut posts).await?;

    tracing::debug!(
        authors = query.authors.len(),
        before = ?query.before,
        returned = posts.len(),
        "Fetched feed page"
    );

    Ok(posts)
}

async fn attach_interactions(pool: &SqlitePool, posts: &mut [Post]) -> Result<()> {
    if posts.is_empty() {
        return Ok(());
    }

    let ids: Vec<PostId> = posts.iter().map(|p| p.id).collect();

    let mut likes_by_post: HashMap<PostId, Vec<_>> = HashMap::new();
    for like in likes::for_posts(pool, &ids).await? {
        likes_by_post.entry(like.post_id).or_default().push(like);
    }

    let mut comments_by_post: HashMap<PostId, Vec<_>> = HashMap::new();
    for comment in comments::for_posts(pool, &ids).await? {
        comments_by_post
            .entry(comment.post_id)
            .or_default()
            .push(comment);
    }

    for post in posts.iter_mut() {
        post.likes = likes_by_post.remove(&post.id).unwrap_or_default();
        post.comments = comments_by_post.remove(&post.id).unwrap_or_default();
    }

    Ok(())
}
