//! Urgency classification for compatibility-layer alerts
//!
//! Each channel carries a default urgency that decides how the platform
//! presents alerts submitted on it:
//! - HIGH: heads-up presentation (missing permissions, crashed services)
//! - LOW: silent, shade-only (housekeeping alerts)

/// Urgency level for a notification channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Urgency {
    Low,
    High,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "LOW",
            Urgency::High => "HIGH",
        }
    }
}
