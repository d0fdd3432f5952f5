//! Follow graph queries

use crate::error::{Result, StorageError};
use crate::users::{self, ProfileRow};
use vibe_core::types::{FollowEdge, Profile, ProfileSummary, UserId};
use sqlx::SqlitePool;

/// Unfiltered follower list size
pub const FOLLOWERS_LIMIT: i64 = 40;
/// Unfiltered following list size
pub const FOLLOWING_LIMIT: i64 = 70;
/// Result size when searching by username
pub const SEARCH_LIMIT: i64 = 10;

/// Which side of the edge to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Users following the subject
    Followers,
    /// Users the subject follows
    Following,
}

/// Create a follow edge
pub async fn create(pool: &SqlitePool, edge: &FollowEdge) -> Result<()> {
    if edge.follower_id == edge.followee_id {
        return Err(StorageError::InvalidInput("cannot follow yourself".into()));
    }

    sqlx::query(
        "INSERT INTO follows (follower_id, follower_username, following_id, following_username)
         VALUES (?, ?, ?, ?)",
    )
    .bind(edge.follower_id.as_str())
    .bind(&edge.follower_username)
    .bind(edge.followee_id.as_str())
    .bind(&edge.followee_username)
    .execute(pool)
    .await
    .map_err(|e| {
        StorageError::from_insert(
            e,
            &format!("follow {} -> {}", edge.follower_id, edge.followee_id),
        )
    })?;

    tracing::debug!(follower = %edge.follower_id, followee = %edge.followee_id, "Created follow edge");
    Ok(())
}

/// Delete a follow edge (no-op if absent)
pub async fn delete(pool: &SqlitePool, follower: &UserId, followee: &UserId) -> Result<()> {
    sqlx::query("DELETE FROM follows WHERE follower_id = ? AND following_id = ?")
        .bind(follower.as_str())
        .bind(followee.as_str())
        .execute(pool)
        .await?;

    Ok(())
}

/// Whether `follower` follows `followee`
pub async fn exists(pool: &SqlitePool, follower: &UserId, followee: &UserId) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM follows WHERE follower_id = ? AND following_id = ?",
    )
    .bind(follower.as_str())
    .bind(followee.as_str())
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

/// Ids of everyone `user` follows
pub async fn following_ids(pool: &SqlitePool, user: &UserId) -> Result<Vec<UserId>> {
    let ids: Vec<String> =
        sqlx::query_scalar("SELECT following_id FROM follows WHERE follower_id = ?")
            .bind(user.as_str())
            .fetch_all(pool)
            .await?;

    Ok(ids.into_iter().map(UserId::new).collect())
}

/// List followers or followees with their recent posts
///
/// With a filter, matches usernames containing it (case-insensitive) and
/// returns at most [`SEARCH_LIMIT`] profiles.
pub async fn list(
    pool: &SqlitePool,
    user: &UserId,
    direction: Direction,
    username_filter: Option<&str>,
) -> Result<Vec<ProfileSummary>> {
    let (join_column, match_column, username_column, default_limit) = match direction {
        Direction::Followers => (
            "f.follower_id",
            "f.following_id",
            "f.follower_username",
            FOLLOWERS_LIMIT,
        ),
        Direction::Following => (
            "f.following_id",
            "f.follower_id",
            "f.following_username",
            FOLLOWING_LIMIT,
        ),
    };

    let filter = username_filter.map(str::trim).filter(|f| !f.is_empty());
    let (pattern, limit) = match filter {
        Some(f) => (format!("%{}%", escape_like(f)), SEARCH_LIMIT),
        None => ("%".to_string(), default_limit),
    };

    let sql = format!(
        "SELECT u.id, u.username, u.name, u.bio, u.avatar
         FROM follows f JOIN users u ON u.id = {join_column}
         WHERE {match_column} = ? AND {username_column} LIKE ? ESCAPE '\\'
         ORDER BY f.created_at DESC, f.rowid DESC
         LIMIT ?"
    );

    let rows = sqlx::query_as::<_, ProfileRow>(&sql)
        .bind(user.as_str())
        .bind(pattern)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    let mut summaries = Vec::with_capacity(rows.len());
    for row in rows {
        let profile = Profile::from(row);
        let recent_posts = users::recent_posts(pool, &profile.id).await?;
        summaries.push(ProfileSummary {
            profile,
            recent_posts,
        });
    }

    Ok(summaries)
}

fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("a_b%c"), "a\\_b\\%c");
        assert_eq!(escape_like("plain"), "plain");
    }
}
