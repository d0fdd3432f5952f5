//! Avatar image bucket

use crate::error::{Result, StorageError};
use vibe_core::types::{AvatarImage, UserId};
use sqlx::SqlitePool;

/// Largest accepted avatar upload
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Store (or replace) a user's avatar
pub async fn put(pool: &SqlitePool, user: &UserId, data: &[u8], content_type: &str) -> Result<()> {
    if data.is_empty() {
        return Err(StorageError::InvalidInput("avatar image is empty".into()));
    }
    if data.len() > MAX_AVATAR_BYTES {
        return Err(StorageError::InvalidInput(format!(
            "avatar image is {} bytes, limit is {}",
            data.len(),
            MAX_AVATAR_BYTES
        )));
    }
    if !content_type.starts_with("image/") {
        return Err(StorageError::InvalidInput(format!(
            "unsupported avatar content type {}",
            content_type
        )));
    }

    sqlx::query(
        "INSERT INTO avatars (user_id, content_type, data, updated_at)
         VALUES (?, ?, ?, strftime('%s', 'now'))
         ON CONFLICT(user_id)
         DO UPDATE SET content_type = excluded.content_type, data = excluded.data,
                       updated_at = excluded.updated_at",
    )
    .bind(user.as_str())
    .bind(content_type)
    .bind(data)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch a user's avatar
pub async fn get(pool: &SqlitePool, user: &UserId) -> Result<Option<AvatarImage>> {
    let row: Option<(String, Vec<u8>)> =
        sqlx::query_as("SELECT content_type, data FROM avatars WHERE user_id = ?")
            .bind(user.as_str())
            .fetch_optional(pool)
            .await?;

    Ok(row.map(|(content_type, bytes)| AvatarImage {
        content_type,
        bytes,
    }))
}
