//! Channel icon resolution
//!
//! `channelIcon` is either an absolute URL the front-end can fetch itself, or
//! a backend-relative locator such as `imagecache/41` or a picon path. The
//! latter are remembered per channel id so the front-end can ask for them
//! later.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use url::Url;

/// Check whether an icon value is an absolute URL with a remote scheme
pub fn is_remote_icon(value: &str, schemes: &[String]) -> bool {
    match Url::parse(value) {
        Ok(url) => schemes.iter().any(|s| s.eq_ignore_ascii_case(url.scheme())),
        Err(_) => false,
    }
}

/// Channel id -> local icon locator
///
/// Entries are write-once: the first locator recorded for a channel is kept
/// until `clear`.
#[derive(Debug, Default)]
pub struct IconCache {
    icons: RwLock<HashMap<String, String>>,
}

impl IconCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the locator recorded for a channel id
    pub fn get(&self, channel_id: &str) -> Option<String> {
        self.icons
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(channel_id)
            .cloned()
    }

    /// Record a locator unless one is already present
    ///
    /// Returns true if the locator was inserted.
    pub fn insert_if_absent(&self, channel_id: &str, locator: &str) -> bool {
        let mut icons = self.icons.write().unwrap_or_else(PoisonError::into_inner);
        if icons.contains_key(channel_id) {
            return false;
        }
        icons.insert(channel_id.to_string(), locator.to_string());
        true
    }

    /// Number of cached locators
    pub fn len(&self) -> usize {
        self.icons.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all locators
    pub fn clear(&self) {
        self.icons
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_schemes() -> Vec<String> {
        vec!["http".to_string(), "https".to_string()]
    }

    #[test]
    fn test_is_remote_icon() {
        let schemes = http_schemes();
        assert!(is_remote_icon("http://x/icon.png", &schemes));
        assert!(is_remote_icon("HTTPS://example.com/logo.svg", &schemes));
        assert!(!is_remote_icon("myicon.png", &schemes));
        assert!(!is_remote_icon("imagecache/41", &schemes));
        assert!(!is_remote_icon("file:///usr/share/picons/1_0_1.png", &schemes));
        assert!(!is_remote_icon("picon://1_0_19_2B66_3F3_1_C00000_0_0_0.png", &schemes));
        assert!(!is_remote_icon("", &schemes));
    }

    #[test]
    fn test_http_only() {
        let schemes = vec!["http".to_string()];
        assert!(is_remote_icon("http://x/icon.png", &schemes));
        assert!(!is_remote_icon("https://x/icon.png", &schemes));
    }

    #[test]
    fn test_first_write_wins() {
        let cache = IconCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.get("5"), None);

        assert!(cache.insert_if_absent("5", "myicon.png"));
        assert!(!cache.insert_if_absent("5", "other.png"));
        assert_eq!(cache.get("5").as_deref(), Some("myicon.png"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert_eq!(cache.get("5"), None);
    }
}
