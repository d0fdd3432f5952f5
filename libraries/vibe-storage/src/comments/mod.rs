//! Comment queries

use crate::error::{Result, StorageError};
use vibe_core::types::{Comment, CommentId, NewComment, PostId, UserId};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: i64,
    post_id: i64,
    user_id: String,
    username: String,
    comment_text: String,
    created_at: i64,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: CommentId::new(row.id),
            post_id: PostId::new(row.post_id),
            user_id: UserId::new(row.user_id),
            username: row.username,
            text: row.comment_text,
            created_at: chrono::DateTime::from_timestamp(row.created_at, 0).unwrap_or_default(),
        }
    }
}

/// Append a comment
pub async fn create(pool: &SqlitePool, comment: &NewComment) -> Result<Comment> {
    let text = comment.text.trim();
    if text.is_empty() {
        return Err(StorageError::InvalidInput("comment cannot be empty".into()));
    }

    let created_at = chrono::Utc::now().timestamp();
    let result = sqlx::query(
        "INSERT INTO comments (post_id, user_id, username, comment_text, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(comment.post_id.get())
    .bind(comment.user_id.as_str())
    .bind(&comment.username)
    .bind(text)
    .bind(created_at)
    .execute(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StorageError::not_found("post", comment.post_id.to_string())
        }
        _ => StorageError::Database(e),
    })?;

    Ok(Comment {
        id: CommentId::new(result.last_insert_rowid()),
        post_id: comment.post_id,
        user_id: comment.user_id.clone(),
        username: comment.username.clone(),
        text: text.to_string(),
        created_at: chrono::DateTime::from_timestamp(created_at, 0).unwrap_or_default(),
    })
}

/// All comments on the given posts, oldest first
pub async fn for_posts(pool: &SqlitePool, post_ids: &[PostId]) -> Result<Vec<Comment>> {
    if post_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT id, post_id, user_id, username, comment_text, created_at
         FROM comments WHERE post_id IN (",
    );
    let mut ids = builder.separated(", ");
    for id in post_ids {
        ids.push_bind(id.get());
    }
    ids.push_unseparated(") ORDER BY id");

    let rows: Vec<CommentRow> = builder.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(Comment::from).collect())
}
