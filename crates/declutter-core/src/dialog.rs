//! Dialog Keyboard Handling
//!
//! Open sheets close on Escape and keep Tab focus cycling inside them.

/// What a keydown inside an open dialog should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKey {
    Close,
    /// Move focus to the focusable element at this index
    Focus(usize),
    /// Leave the event to the browser
    Pass,
}

/// Decide how a dialog reacts to `key`.
///
/// `focused` is the index of the focused element among the dialog's
/// `count` focusable elements, `None` when focus is elsewhere.
pub fn dialog_key(key: &str, shift: bool, focused: Option<usize>, count: usize) -> DialogKey {
    match key {
        "Escape" => DialogKey::Close,
        "Tab" if count > 0 => {
            let last = count - 1;
            match (shift, focused) {
                (true, Some(0)) | (true, None) => DialogKey::Focus(last),
                (false, Some(i)) if i == last => DialogKey::Focus(0),
                (false, None) => DialogKey::Focus(0),
                _ => DialogKey::Pass,
            }
        }
        _ => DialogKey::Pass,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_closes() {
        assert_eq!(dialog_key("Escape", false, Some(1), 3), DialogKey::Close);
        assert_eq!(dialog_key("Escape", false, None, 0), DialogKey::Close);
    }

    #[test]
    fn test_tab_wraps_at_the_ends() {
        assert_eq!(dialog_key("Tab", false, Some(2), 3), DialogKey::Focus(0));
        assert_eq!(dialog_key("Tab", true, Some(0), 3), DialogKey::Focus(2));
    }

    #[test]
    fn test_tab_inside_is_left_to_the_browser() {
        assert_eq!(dialog_key("Tab", false, Some(0), 3), DialogKey::Pass);
        assert_eq!(dialog_key("Tab", true, Some(2), 3), DialogKey::Pass);
    }

    #[test]
    fn test_focus_outside_is_pulled_back_in() {
        assert_eq!(dialog_key("Tab", false, None, 3), DialogKey::Focus(0));
        assert_eq!(dialog_key("Tab", true, None, 3), DialogKey::Focus(2));
    }

    #[test]
    fn test_other_keys_pass() {
        assert_eq!(dialog_key("Enter", false, Some(0), 3), DialogKey::Pass);
        assert_eq!(dialog_key("Tab", false, None, 0), DialogKey::Pass);
    }
}
