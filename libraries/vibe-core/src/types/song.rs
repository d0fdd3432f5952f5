/// Song metadata shared by posts and catalog search results
use serde::{Deserialize, Serialize};

/// Song attached to a post ("song of the day")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Track title
    pub name: String,
    /// Primary artist
    pub artist: String,
    /// Album cover image URL
    pub cover: String,
    /// Catalog URI used to open the track in the streaming app
    pub uri: String,
    /// Short preview clip, resolved lazily; `None` until resolved
    pub preview_url: Option<String>,
}

impl Song {
    /// Web fallback URL for the catalog URI (`spotify:track:<id>` style URIs)
    pub fn web_url(&self) -> Option<String> {
        let id = self.uri.rsplit(':').next().filter(|id| !id.is_empty())?;
        Some(format!("https://open.spotify.com/track/{}", id))
    }
}

/// Track returned by a catalog search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTrack {
    /// Catalog track id, used to look up preview URLs
    pub track_id: String,
    /// Track title
    pub name: String,
    /// First listed artist
    pub artist: String,
    /// Catalog URI
    pub uri: String,
    /// Largest album image URL (empty when the album has no images)
    pub cover: String,
    /// Preview URL once resolved
    pub preview_url: Option<String>,
}

impl CatalogTrack {
    /// Key used to collapse duplicate search results
    ///
    /// Catalogs list the same recording under several releases; two results
    /// with the same title and first artist are the same song to the user.
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.name, &self.artist)
    }

    /// Convert into the song stored on a post
    pub fn into_song(self) -> Song {
        Song {
            name: self.name,
            artist: self.artist,
            cover: self.cover,
            uri: self.uri,
            preview_url: self.preview_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(uri: &str) -> Song {
        Song {
            name: "Blinding Lights".to_string(),
            artist: "The Weeknd".to_string(),
            cover: "https://i.scdn.co/image/cover".to_string(),
            uri: uri.to_string(),
            preview_url: None,
        }
    }

    #[test]
    fn web_url_uses_last_uri_segment() {
        assert_eq!(
            song("spotify:track:0VjIjW4GlUZAMYd2vXMi3b").web_url().as_deref(),
            Some("https://open.spotify.com/track/0VjIjW4GlUZAMYd2vXMi3b")
        );
    }

    #[test]
    fn web_url_missing_for_empty_uri() {
        assert!(song("").web_url().is_none());
    }

    #[test]
    fn catalog_track_converts_to_song() {
        let track = CatalogTrack {
            track_id: "0VjIjW4GlUZAMYd2vXMi3b".to_string(),
            name: "Blinding Lights".to_string(),
            artist: "The Weeknd".to_string(),
            uri: "spotify:track:0VjIjW4GlUZAMYd2vXMi3b".to_string(),
            cover: "https://i.scdn.co/image/cover".to_string(),
            preview_url: Some("https://p.scdn.co/mp3-preview/abc".to_string()),
        };

        let song = track.into_song();
        assert_eq!(song.name, "Blinding Lights");
        assert_eq!(
            song.preview_url.as_deref(),
            Some("https://p.scdn.co/mp3-preview/abc")
        );
    }
}
