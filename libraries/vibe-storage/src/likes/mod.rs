//! Like queries

use crate::error::{Result, StorageError};
use vibe_core::types::{Like, PostId, UserId};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

#[derive(Debug, sqlx::FromRow)]
struct LikeRow {
    post_id: i64,
    user_id: String,
}

/// Record a like
///
/// The (post, user) primary key plus `OR IGNORE` keeps a second like from
/// creating a second row.
pub async fn create(pool: &SqlitePool, like: &Like) -> Result<()> {
    let result = sqlx::query("INSERT OR IGNORE INTO post_likes (post_id, user_id) VALUES (?, ?)")
        .bind(like.post_id.get())
        .bind(like.user_id.as_str())
        .execute(pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                StorageError::not_found("post", like.post_id.to_string())
            }
            _ => StorageError::Database(e),
        })?;

    if result.rows_affected() == 0 {
        tracing::debug!(post_id = %like.post_id, user_id = %like.user_id, "Like already present");
    }

    Ok(())
}

/// Remove a like (no-op if absent)
pub async fn delete(pool: &SqlitePool, like: &Like) -> Result<()> {
    sqlx::query("DELETE FROM post_likes WHERE post_id = ? AND user_id = ?")
        .bind(like.post_id.get())
        .bind(like.user_id.as_str())
        .execute(pool)
        .await?;

    Ok(())
}

/// Count likes on a post
pub async fn count(pool: &SqlitePool, post_id: PostId) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = ?")
        .bind(post_id.get())
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// All likes on the given posts, in insertion order
pub async fn for_posts(pool: &SqlitePool, post_ids: &[PostId]) -> Result<Vec<Like>> {
    if post_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT post_id, user_id FROM post_likes WHERE post_id IN (");
    let mut ids = builder.separated(", ");
    for id in post_ids {
        ids.push_bind(id.get());
    }
    ids.push_unseparated(") ORDER BY created_at, rowid");

    let rows: Vec<LikeRow> = builder.build_query_as().fetch_all(pool).await?;

    Ok(rows
        .into_iter()
        .map(|row| Like::new(PostId::new(row.post_id), UserId::new(row.user_id)))
        .collect())
}
