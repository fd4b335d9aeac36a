//! Notification channel catalog
//!
//! Channel keys are stable across versions: the platform keys user-visible
//! notification settings off them, so a renamed key silently resets whatever
//! the user configured. The full set is built once and registered with the
//! display subsystem in a single call at process start.

use serde::{Deserialize, Serialize};

use crate::urgency::Urgency;

pub const CH_PERSISTENT_FG_SERVICE: &str = "persistent_fg_service";
pub const CH_PENDING_USER_ACTION: &str = "pending_user_action";
pub const CH_MISSING_PERMISSION: &str = "missing_permission";
pub const CH_MISSING_OPTIONAL_PERMISSION: &str = "missing_optional_permission";
pub const CH_MISSING_REQUIRED_APP: &str = "missing_required_app";
pub const CH_BG_ACTIVITY_START: &str = "bg_activity_start";
pub const CH_SERVICE_CRASHED: &str = "service_crashed";

/// A named category of alerts sharing display and urgency defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Stable key, never renamed once shipped
    pub key: String,
    /// User-visible title; the embedder substitutes localized text
    pub title: String,
    /// Default interruption behavior for alerts on this channel
    pub urgency: Urgency,
}

impl Channel {
    pub fn new(key: impl Into<String>, title: impl Into<String>, urgency: Urgency) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            urgency,
        }
    }
}

/// The full channel set, in registration order.
///
/// Missing-permission, missing-required-app, background-activity-start and
/// crashed-service alerts interrupt the user; everything else stays silent.
pub fn channel_set() -> Vec<Channel> {
    vec![
        Channel::new(
            CH_PERSISTENT_FG_SERVICE,
            "Persistent foreground service",
            Urgency::Low,
        ),
        Channel::new(CH_PENDING_USER_ACTION, "Pending user action", Urgency::Low),
        Channel::new(CH_MISSING_PERMISSION, "Missing permission", Urgency::High),
        Channel::new(
            CH_MISSING_OPTIONAL_PERMISSION,
            "Missing optional permission",
            Urgency::Low,
        ),
        Channel::new(CH_MISSING_REQUIRED_APP, "Missing required app", Urgency::High),
        Channel::new(
            CH_BG_ACTIVITY_START,
            "Background activity start",
            Urgency::High,
        ),
        Channel::new(CH_SERVICE_CRASHED, "Sandboxed service crashed", Urgency::High),
    ]
}
