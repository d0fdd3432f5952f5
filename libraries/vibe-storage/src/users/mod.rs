//! Profile queries and account deletion

use crate::error::{Result, StorageError};
use vibe_core::types::{Profile, ProfileUpdate, RecentPost, UserId};
use sqlx::SqlitePool;

/// Number of recent posts shown on a profile card
pub const RECENT_POSTS_PER_PROFILE: i64 = 3;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProfileRow {
    pub id: String,
    pub username: String,
    pub name: String,
    pub bio: String,
    pub avatar: Option<String>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: UserId::new(row.id),
            username: row.username,
            name: row.name,
            bio: row.bio,
            avatar: row.avatar,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RecentPostRow {
    id: i64,
    name: String,
    artist: String,
    created_at: i64,
}

/// Create a profile for a freshly signed-up user
pub async fn create(pool: &SqlitePool, id: &UserId, username: &str, name: &str) -> Result<Profile> {
    if username.trim().is_empty() {
        return Err(StorageError::InvalidInput("username cannot be empty".into()));
    }

    sqlx::query("INSERT INTO users (id, username, name) VALUES (?, ?, ?)")
        .bind(id.as_str())
        .bind(username)
        .bind(name)
        .execute(pool)
        .await
        .map_err(|e| StorageError::from_insert(e, &format!("username {}", username)))?;

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("user", id.as_str()))
}

/// Get a profile by user id
pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<Profile>> {
    let row = sqlx::query_as::<_, ProfileRow>(
        "SELECT id, username, name, bio, avatar FROM users WHERE id = ?",
    )
    .bind(id.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Profile::from))
}

/// Update name, username, and bio
pub async fn update(pool: &SqlitePool, id: &UserId, update: &ProfileUpdate) -> Result<Profile> {
    if update.username.trim().is_empty() {
        return Err(StorageError::InvalidInput("username cannot be empty".into()));
    }

    let result = sqlx::query("UPDATE users SET name = ?, username = ?, bio = ? WHERE id = ?")
        .bind(&update.name)
        .bind(&update.username)
        .bind(&update.bio)
        .bind(id.as_str())
        .execute(pool)
        .await
        .map_err(|e| StorageError::from_insert(e, &format!("username {}", update.username)))?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("user", id.as_str()));
    }

    // Keep the denormalized usernames on follow edges in step
    sqlx::query("UPDATE follows SET follower_username = ? WHERE follower_id = ?")
        .bind(&update.username)
        .bind(id.as_str())
        .execute(pool)
        .await?;
    sqlx::query("UPDATE follows SET following_username = ? WHERE following_id = ?")
        .bind(&update.username)
        .bind(id.as_str())
        .execute(pool)
        .await?;

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("user", id.as_str()))
}

/// Point the profile at a new avatar URL
pub async fn set_avatar_url(pool: &SqlitePool, id: &UserId, url: &str) -> Result<()> {
    sqlx::query("UPDATE users SET avatar = ? WHERE id = ?")
        .bind(url)
        .bind(id.as_str())
        .execute(pool)
        .await?;

    Ok(())
}

/// Most recent posts by a user, newest first
pub async fn recent_posts(pool: &SqlitePool, id: &UserId) -> Result<Vec<RecentPost>> {
    let rows = sqlx::query_as::<_, RecentPostRow>(
        "SELECT id, name, artist, created_at FROM song_posts
         WHERE user_id = ? ORDER BY id DESC LIMIT ?",
    )
    .bind(id.as_str())
    .bind(RECENT_POSTS_PER_PROFILE)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| RecentPost {
            id: vibe_core::PostId::new(row.id),
            name: row.name,
            artist: row.artist,
            created_at: chrono::DateTime::from_timestamp(row.created_at, 0).unwrap_or_default(),
        })
        .collect())
}

/// Delete a user and everything they own
///
/// Posts (with their likes and comments), the user's own likes and comments,
/// follow edges in both directions, and the avatar go in one transaction.
pub async fn delete_account(pool: &SqlitePool, id: &UserId) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "DELETE FROM post_likes WHERE user_id = ?1
            OR post_id IN (SELECT id FROM song_posts WHERE user_id = ?1)",
    )
    .bind(id.as_str())
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "DELETE FROM comments WHERE user_id = ?1
            OR post_id IN (SELECT id FROM song_posts WHERE user_id = ?1)",
    )
    .bind(id.as_str())
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM song_posts WHERE user_id = ?")
        .bind(id.as_str())
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM follows WHERE follower_id = ?1 OR following_id = ?1")
        .bind(id.as_str())
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM avatars WHERE user_id = ?")
        .bind(id.as_str())
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id.as_str())
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("user", id.as_str()));
    }

    tx.commit().await?;

    tracing::info!(user_id = %id, "Deleted account");
    Ok(())
}
