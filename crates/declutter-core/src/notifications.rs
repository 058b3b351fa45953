//! Reminder Notifications
//!
//! Push payload handling and daily reminder scheduling.

use chrono::{DateTime, Duration, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_REMINDER_TIME: &str = "18:00";
pub const DEFAULT_TITLE: &str = "SuperSwiper Reminder";
pub const DEFAULT_BODY: &str = "Time to declutter! Your items are waiting to be sorted.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationData {
    pub url: String,
}

/// Shape of a push message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub tag: String,
    pub require_interaction: bool,
    pub data: NotificationData,
    pub actions: Vec<NotificationAction>,
}

impl Default for PushPayload {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            body: DEFAULT_BODY.to_string(),
            icon: "/favicon-96x96.png".to_string(),
            badge: "/favicon-96x96.png".to_string(),
            tag: "superswiper-reminder".to_string(),
            require_interaction: true,
            data: NotificationData { url: "/".to_string() },
            actions: vec![
                NotificationAction {
                    action: "open".to_string(),
                    title: "Start Sorting".to_string(),
                },
                NotificationAction {
                    action: "dismiss".to_string(),
                    title: "Later".to_string(),
                },
            ],
        }
    }
}

impl PushPayload {
    /// Overlay the fields of a received payload on the defaults.
    ///
    /// A payload that is not a JSON object only replaces the body; an empty
    /// one keeps the default body.
    pub fn from_push(raw: &str) -> Self {
        let defaults = PushPayload::default();
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(fields)) => {
                let mut merged = match serde_json::to_value(&defaults) {
                    Ok(Value::Object(map)) => map,
                    _ => return defaults,
                };
                merged.extend(fields);
                serde_json::from_value(Value::Object(merged)).unwrap_or_else(|err| {
                    debug!(error = %err, "push payload has mistyped fields");
                    defaults
                })
            }
            _ => {
                let body = raw.trim();
                PushPayload {
                    body: if body.is_empty() { DEFAULT_BODY.to_string() } else { body.to_string() },
                    ..defaults
                }
            }
        }
    }
}

/// Parse `HH:MM`, falling back to 18:00 for anything malformed
pub fn parse_reminder_time(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(DEFAULT_REMINDER_TIME, "%H:%M"))
        .unwrap_or(NaiveTime::MIN)
}

/// Next occurrence of `time` strictly after `now`
pub fn next_reminder<Tz: TimeZone>(now: &DateTime<Tz>, time: NaiveTime) -> Option<DateTime<Tz>> {
    let tz = now.timezone();
    let today = now.date_naive().and_time(time);
    let candidate = tz.from_local_datetime(&today).earliest()?;
    if candidate > *now {
        return Some(candidate);
    }
    let tomorrow = today + Duration::days(1);
    tz.from_local_datetime(&tomorrow).earliest()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_payload_merges_over_defaults() {
        let payload = PushPayload::from_push(r#"{"title": "Weekend push", "requireInteraction": false}"#);
        assert_eq!(payload.title, "Weekend push");
        assert!(!payload.require_interaction);
        assert_eq!(payload.body, DEFAULT_BODY);
        assert_eq!(payload.actions.len(), 2);
        assert_eq!(payload.data.url, "/");
    }

    #[test]
    fn test_text_payload_replaces_body() {
        let payload = PushPayload::from_push("Your boxes miss you");
        assert_eq!(payload.body, "Your boxes miss you");
        assert_eq!(payload.title, DEFAULT_TITLE);

        assert_eq!(PushPayload::from_push("").body, DEFAULT_BODY);
    }

    #[test]
    fn test_forwarded_payload_keeps_its_target() {
        let payload = PushPayload::from_push(r#"{"tag":"weekly","data":{"url":"/stats"},"actions":[]}"#);
        assert_eq!(payload.tag, "weekly");
        assert_eq!(payload.data.url, "/stats");
        assert!(payload.actions.is_empty());
        assert_eq!(payload.icon, "/favicon-96x96.png");
    }

    #[test]
    fn test_mistyped_payload_uses_defaults() {
        let payload = PushPayload::from_push(r#"{"title": 42}"#);
        assert_eq!(payload, PushPayload::default());
    }

    #[test]
    fn test_parse_reminder_time() {
        assert_eq!(parse_reminder_time("07:30"), NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        assert_eq!(parse_reminder_time("late"), NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    }

    #[test]
    fn test_next_reminder_today_or_tomorrow() {
        let morning = Utc.with_ymd_and_hms(2024, 10, 17, 9, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 10, 17, 19, 0, 0).unwrap();
        let six_pm = parse_reminder_time("18:00");

        assert_eq!(next_reminder(&morning, six_pm).unwrap(), Utc.with_ymd_and_hms(2024, 10, 17, 18, 0, 0).unwrap());
        assert_eq!(next_reminder(&evening, six_pm).unwrap(), Utc.with_ymd_and_hms(2024, 10, 18, 18, 0, 0).unwrap());

        // Exactly at the reminder time rolls over
        let at = Utc.with_ymd_and_hms(2024, 10, 17, 18, 0, 0).unwrap();
        assert_eq!(next_reminder(&at, six_pm).unwrap().date_naive().to_string(), "2024-10-18");
    }
}
