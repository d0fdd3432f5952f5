/// Feed page query
use super::ids::{PostId, UserId};
use serde::{Deserialize, Serialize};

/// One page of the following-based feed
///
/// Posts are returned newest first. `before` is an exclusive upper bound:
/// only posts with a smaller id than the cursor are included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedQuery {
    /// Authors whose posts are included (the viewer plus everyone they follow)
    pub authors: Vec<UserId>,
    /// Cursor: id of the last post already loaded
    pub before: Option<PostId>,
    /// Maximum number of posts
    pub limit: usize,
}

impl FeedQuery {
    /// First page for the given authors
    pub fn new(authors: Vec<UserId>, limit: usize) -> Self {
        Self {
            authors,
            before: None,
            limit,
        }
    }

    /// Restrict to posts older than `cursor`
    #[must_use]
    pub fn before(mut self, cursor: PostId) -> Self {
        self.before = Some(cursor);
        self
    }

    /// Authors for a viewer's feed: the viewer first, then followees, without repeats
    pub fn feed_authors(viewer: &UserId, following: Vec<UserId>) -> Vec<UserId> {
        let mut authors = Vec::with_capacity(following.len() + 1);
        authors.push(viewer.clone());
        for user in following {
            if !authors.contains(&user) {
                authors.push(user);
            }
        }
        authors
    }
}
