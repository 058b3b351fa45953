//! Sharing
//!
//! Plain-text lists of the donate and sell piles for the share sheet or
//! the clipboard.

use crate::models::{DiscardCategory, Item};

/// Piles that can be shared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareableCategory {
    Donate,
    Sell,
}

impl ShareableCategory {
    pub fn from_discard(category: DiscardCategory) -> Option<Self> {
        match category {
            DiscardCategory::Donate => Some(ShareableCategory::Donate),
            DiscardCategory::Sell => Some(ShareableCategory::Sell),
            DiscardCategory::Trash => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ShareableCategory::Donate => "Items to Donate",
            ShareableCategory::Sell => "Items for Sale",
        }
    }

    fn emoji(&self) -> &'static str {
        match self {
            ShareableCategory::Donate => "🎁",
            ShareableCategory::Sell => "💰",
        }
    }
}

pub fn format_items_list(items: &[Item], category: ShareableCategory) -> String {
    let mut lines = Vec::with_capacity(items.len() + 4);
    lines.push(format!("{} {}", category.emoji(), category.title()));
    lines.push(String::new());
    for (i, item) in items.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, item.name));
    }
    lines.push(String::new());
    let plural = if items.len() == 1 { "" } else { "s" };
    lines.push(format!("Total: {} item{}", items.len(), plural));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemStatus;

    fn named(name: &str) -> Item {
        Item {
            id: name.to_string(),
            name: name.to_string(),
            photo_path: String::new(),
            status: ItemStatus::Donate,
            created_at: 0,
            sorted_at: None,
            r#box: None,
        }
    }

    #[test]
    fn test_format_donate_list() {
        let text = format_items_list(&[named("Lamp"), named("Chair")], ShareableCategory::Donate);
        assert_eq!(text, "🎁 Items to Donate\n\n1. Lamp\n2. Chair\n\nTotal: 2 items");
    }

    #[test]
    fn test_singular_total() {
        let text = format_items_list(&[named("Bike")], ShareableCategory::Sell);
        assert!(text.starts_with("💰 Items for Sale"));
        assert!(text.ends_with("Total: 1 item"));
    }

    #[test]
    fn test_trash_is_not_shareable() {
        assert_eq!(ShareableCategory::from_discard(DiscardCategory::Trash), None);
        assert_eq!(ShareableCategory::from_discard(DiscardCategory::Sell), Some(ShareableCategory::Sell));
    }
}
