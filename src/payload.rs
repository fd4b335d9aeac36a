//! Alert payload model and builder
//!
//! A payload is built fresh for every dispatch and handed to the display
//! subsystem whole; the core keeps nothing afterwards except the id, which is
//! enough to cancel the alert later. Action taps come back as explicit
//! [`ActionCommand`] values instead of captured closures, so their effect can
//! be tested without ever constructing an alert.

use serde::{Deserialize, Serialize};

use crate::gate::OneShotFlow;

/// Opaque descriptor of a platform surface to open.
///
/// The embedding shim translates this into whatever the OS wants (an
/// activity launch, a settings deep-link). The core never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl Intent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }
}

/// Command bound to a user tap on an alert action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionCommand {
    /// Open a platform surface; handled outside the core
    Launch(Intent),
    /// Permanently dismiss a one-shot flow, then withdraw its alert
    DismissForever { flow: OneShotFlow, alert_id: u32 },
}

/// A single tappable action on an alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertAction {
    pub label: String,
    pub command: ActionCommand,
}

/// Structured alert handed to the display subsystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPayload {
    /// Channel key the alert is submitted on
    pub channel: String,
    /// Reserved id or one drawn from the allocator
    pub id: u32,
    pub title: String,
    pub body: String,
    /// Ordered action list, rendered left to right
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<AlertAction>,
    /// Surface opened when the body itself is tapped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tap: Option<Intent>,
    /// Remove the alert when tapped
    pub auto_dismiss: bool,
    /// Expire the alert after this long without interaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Re-submitting the same id replaces silently instead of re-alerting
    pub alert_once: bool,
}

/// Builder for [`AlertPayload`]
pub struct PayloadBuilder {
    payload: AlertPayload,
}

impl PayloadBuilder {
    pub fn new(channel: impl Into<String>, id: u32) -> Self {
        Self {
            payload: AlertPayload {
                channel: channel.into(),
                id,
                title: String::new(),
                body: String::new(),
                actions: Vec::new(),
                tap: None,
                auto_dismiss: false,
                timeout_ms: None,
                alert_once: false,
            },
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.payload.title = title.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.payload.body = body.into();
        self
    }

    pub fn action(mut self, label: impl Into<String>, command: ActionCommand) -> Self {
        self.payload.actions.push(AlertAction {
            label: label.into(),
            command,
        });
        self
    }

    pub fn tap(mut self, intent: Intent) -> Self {
        self.payload.tap = Some(intent);
        self
    }

    pub fn auto_dismiss(mut self, auto_dismiss: bool) -> Self {
        self.payload.auto_dismiss = auto_dismiss;
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.payload.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn alert_once(mut self, alert_once: bool) -> Self {
        self.payload.alert_once = alert_once;
        self
    }

    pub fn build(self) -> AlertPayload {
        self.payload
    }
}
