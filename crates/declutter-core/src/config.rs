//! Configuration
//!
//! Build-time app configuration and user preferences persisted in local
//! storage.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::notifications::{parse_reminder_time, DEFAULT_REMINDER_TIME};
use crate::storage::KeyValueStore;

pub const THEME_KEY: &str = "superswiper-theme";
pub const SOUND_KEY: &str = "superswiper-sound-enabled";
pub const NOTIFICATIONS_KEY: &str = "superswiper-notifications-enabled";
pub const REMINDER_TIME_KEY: &str = "superswiper-reminder-time";
pub const NEXT_REMINDER_KEY: &str = "superswiper-next-reminder";

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub app_id: String,
}

impl AppConfig {
    /// Build from the app id baked in at compile time
    pub fn from_app_id(app_id: Option<&str>) -> DomainResult<Self> {
        match app_id.map(str::trim) {
            Some(id) if !id.is_empty() => Ok(Self { app_id: id.to_string() }),
            _ => Err(DomainError::InvalidInput("DECLUTTER_APP_ID is not set".to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => Theme::System,
        }
    }
}

/// User toggles, one storage key each
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub sound_enabled: bool,
    pub notifications_enabled: bool,
    /// `HH:MM`
    pub reminder_time: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            sound_enabled: true,
            notifications_enabled: false,
            reminder_time: DEFAULT_REMINDER_TIME.to_string(),
        }
    }
}

impl Preferences {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let reminder_time = store
            .get(REMINDER_TIME_KEY)
            .filter(|t| parse_reminder_time(t).format("%H:%M").to_string() == *t)
            .unwrap_or_else(|| DEFAULT_REMINDER_TIME.to_string());
        Self {
            theme: store.get(THEME_KEY).map(|t| Theme::from_str(&t)).unwrap_or_default(),
            // Sound is on unless explicitly turned off
            sound_enabled: store.get(SOUND_KEY).as_deref() != Some("false"),
            notifications_enabled: store.get(NOTIFICATIONS_KEY).as_deref() == Some("true"),
            reminder_time,
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) {
        store.set(THEME_KEY, self.theme.as_str());
        store.set(SOUND_KEY, &self.sound_enabled.to_string());
        store.set(NOTIFICATIONS_KEY, &self.notifications_enabled.to_string());
        store.set(REMINDER_TIME_KEY, &self.reminder_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_app_config_requires_id() {
        assert!(AppConfig::from_app_id(None).is_err());
        assert!(AppConfig::from_app_id(Some("  ")).is_err());
        assert_eq!(AppConfig::from_app_id(Some("abc")).unwrap().app_id, "abc");
    }

    #[test]
    fn test_defaults_when_storage_empty() {
        let prefs = Preferences::load(&MemoryStore::new());
        assert_eq!(prefs, Preferences::default());
        assert!(prefs.sound_enabled);
    }

    #[test]
    fn test_round_trip() {
        let store = MemoryStore::new();
        let prefs = Preferences {
            theme: Theme::Dark,
            sound_enabled: false,
            notifications_enabled: true,
            reminder_time: "07:45".to_string(),
        };
        prefs.save(&store);
        assert_eq!(Preferences::load(&store), prefs);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let store = MemoryStore::new();
        store.set(THEME_KEY, "neon");
        store.set(SOUND_KEY, "maybe");
        store.set(REMINDER_TIME_KEY, "25:99");

        let prefs = Preferences::load(&store);
        assert_eq!(prefs.theme, Theme::System);
        assert!(prefs.sound_enabled);
        assert_eq!(prefs.reminder_time, "18:00");
    }
}
