//! VibeCheck Storage
//!
//! `SQLite` implementation of the social backend contract.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each feature (posts, likes, comments, follows,
//!   users, avatars) owns its own queries
//! - **Backend Contract**: `LocalBackend` implements `vibe_core::SocialBackend`
//!   on top of the slices, scoped to the signed-in user
//!
//! # Example
//!
//! ```rust,no_run
//! use vibe_core::SocialBackend;
//! use vibe_core::types::{FeedQuery, UserId};
//! use vibe_storage::{create_pool, run_migrations, LocalBackend};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://vibecheck.db").await?;
//! run_migrations(&pool).await?;
//!
//! let backend = LocalBackend::new(pool, "https://cdn.example.com");
//! let viewer = UserId::new("user-a");
//! backend.sign_in(viewer.clone()).await;
//!
//! let page = backend.fetch_posts(&FeedQuery::new(vec![viewer], 10)).await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod avatars;
pub mod comments;
pub mod follows;
pub mod likes;
pub mod posts;
pub mod users;

pub use context::LocalBackend;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup to bring the schema up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://vibecheck.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("SQLite pool created");

    Ok(pool)
}
