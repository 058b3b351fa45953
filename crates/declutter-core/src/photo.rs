//! Photo Load State
//!
//! An item photo is fetched in two steps: the signed url is looked up from
//! the storage id, then the browser loads the image from that url. Either
//! step can fail and the card shows a placeholder instead of a broken image.

use crate::error::DomainResult;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PhotoState {
    /// Waiting for the url lookup
    #[default]
    Loading,
    /// Url known, image still loading
    Ready(String),
    Loaded(String),
    Failed,
}

impl PhotoState {
    /// State after the url lookup for `photo_path` finished
    pub fn from_lookup(photo_path: &str, lookup: DomainResult<Option<String>>) -> Self {
        if photo_path.is_empty() {
            return PhotoState::Failed;
        }
        match lookup {
            Ok(Some(url)) if !url.is_empty() => PhotoState::Ready(url),
            _ => PhotoState::Failed,
        }
    }

    pub fn image_loaded(&mut self) {
        if let PhotoState::Ready(url) = self {
            *self = PhotoState::Loaded(std::mem::take(url));
        }
    }

    /// The image element reported an error; an expired url lands here too
    pub fn image_failed(&mut self) {
        if self.url().is_some() {
            *self = PhotoState::Failed;
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            PhotoState::Ready(url) | PhotoState::Loaded(url) => Some(url),
            _ => None,
        }
    }

    /// Spinner stays up until the image itself has loaded
    pub fn is_loading(&self) -> bool {
        matches!(self, PhotoState::Loading | PhotoState::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PhotoState::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;

    #[test]
    fn test_lookup_then_image_load() {
        let mut state = PhotoState::from_lookup("photo-1", Ok(Some("https://cdn/p1".to_string())));
        assert_eq!(state.url(), Some("https://cdn/p1"));
        assert!(state.is_loading());

        state.image_loaded();
        assert_eq!(state, PhotoState::Loaded("https://cdn/p1".to_string()));
        assert!(!state.is_loading());
    }

    #[test]
    fn test_lookup_error_is_not_stuck_loading() {
        let state = PhotoState::from_lookup("photo-1", Err(DomainError::Backend("Network error".into())));
        assert!(state.is_failed());
        assert!(!state.is_loading());
        assert_eq!(state.url(), None);
    }

    #[test]
    fn test_missing_path_or_url_fails() {
        assert!(PhotoState::from_lookup("", Ok(Some("https://cdn/p1".to_string()))).is_failed());
        assert!(PhotoState::from_lookup("photo-1", Ok(None)).is_failed());
        assert!(PhotoState::from_lookup("photo-1", Ok(Some(String::new()))).is_failed());
    }

    #[test]
    fn test_broken_image_shows_placeholder() {
        let mut state = PhotoState::from_lookup("photo-1", Ok(Some("https://cdn/expired".to_string())));
        state.image_failed();
        assert!(state.is_failed());
        assert_eq!(state.url(), None);

        // A late load event does not bring the broken url back
        state.image_loaded();
        assert!(state.is_failed());
    }

    #[test]
    fn test_image_error_before_lookup_is_ignored() {
        let mut state = PhotoState::default();
        state.image_failed();
        assert_eq!(state, PhotoState::Loading);
    }
}
