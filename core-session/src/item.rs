//! Playback item identity.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// One logical piece of playable media: an opaque identifier plus the URL the
/// engine resolves it from.
///
/// Items are immutable once created. Two items are the same item exactly when
/// their URLs match; the id is display metadata and takes no part in equality
/// or hashing, so a queue lookup finds an item under whichever id the caller
/// attached to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackItem {
    id: String,
    url: String,
}

impl PlaybackItem {
    /// Create an item with an explicit identifier.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }

    /// Create an item whose identifier is its URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id: url.clone(),
            url,
        }
    }

    /// The caller-supplied identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The resolvable media URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PartialEq for PlaybackItem {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for PlaybackItem {}

impl Hash for PlaybackItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_url_only() {
        let a = PlaybackItem::new("track-1", "https://example.com/a.mp3");
        let b = PlaybackItem::new("track-2", "https://example.com/a.mp3");
        let c = PlaybackItem::new("track-1", "https://example.com/c.mp3");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn from_url_uses_url_as_id() {
        let item = PlaybackItem::from_url("https://example.com/a.mp3");
        assert_eq!(item.id(), item.url());
    }
}
