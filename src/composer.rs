//! Alert composition and dispatch
//!
//! [`Notifications`] owns the orchestration: channel registration at startup,
//! payload construction, the one-shot prompts, and the action round-trip that
//! persists a dismissal before withdrawing the alert. It holds the only
//! mutable state of the crate (the id counter and the gate latches) and is
//! meant to be constructed once and shared behind an `Arc`.

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::channel::{channel_set, CH_MISSING_OPTIONAL_PERMISSION, CH_SERVICE_CRASHED};
use crate::display::DisplaySink;
use crate::gate::{OneShotFlow, OneShotGate};
use crate::ids::{IdAllocator, ID_POWER_EXEMPTION_PROMPT};
use crate::payload::{ActionCommand, AlertPayload, Intent, PayloadBuilder};
use crate::power::PowerQuery;
use crate::prefs::PreferenceStore;

/// Fixed expiry for configuration-required alerts.
const CONFIG_REQUIRED_TIMEOUT_MS: u64 = 60_000;

/// Intent action understood by the shim: open the OS surface that grants a
/// battery exemption for the package named in `data`.
pub const ACTION_REQUEST_POWER_EXEMPTION: &str = "request_power_exemption";
/// Intent action: open the crash details surface for the service in `data`.
pub const ACTION_SHOW_CRASH_DETAILS: &str = "show_crash_details";

/// Notification orchestrator for the compatibility layer.
pub struct Notifications {
    display: Arc<dyn DisplaySink>,
    power: Arc<dyn PowerQuery>,
    gate: OneShotGate,
    ids: IdAllocator,
}

impl Notifications {
    pub fn new(
        display: Arc<dyn DisplaySink>,
        prefs: Arc<dyn PreferenceStore>,
        power: Arc<dyn PowerQuery>,
    ) -> Self {
        Self {
            display,
            power,
            gate: OneShotGate::new(prefs),
            ids: IdAllocator::new(),
        }
    }

    /// Register the full channel set with the platform.
    ///
    /// Called once during process initialization, before any alert goes out.
    /// A failure is surfaced unchanged: registration is a precondition for
    /// every other alert, so the caller aborts startup rather than retry.
    pub fn register_channels(&self) -> Result<()> {
        let channels = channel_set();
        info!(count = channels.len(), "Registering notification channels");
        self.display.register_channels(&channels)
    }

    /// Allocate an id for an alert outside the reserved set.
    pub fn next_id(&self) -> u32 {
        self.ids.next_id()
    }

    /// The one-shot gate, for embedders that gate flows of their own.
    pub fn gate(&self) -> &OneShotGate {
        &self.gate
    }

    /// Build a "configuration required" alert: exactly one resolution action,
    /// auto-dismissed on tap, expires after 60 seconds, and re-submitting the
    /// same id replaces silently instead of stacking a second alert.
    pub fn config_required(
        &self,
        channel: &str,
        id: u32,
        title: impl Into<String>,
        body: impl Into<String>,
        resolution_label: impl Into<String>,
        resolution: Intent,
    ) -> AlertPayload {
        PayloadBuilder::new(channel, id)
            .title(title)
            .body(body)
            .auto_dismiss(true)
            .timeout_ms(CONFIG_REQUIRED_TIMEOUT_MS)
            .alert_once(true)
            .action(resolution_label, ActionCommand::Launch(resolution))
            .build()
    }

    /// Hand a payload to the display subsystem. Its id becomes live here.
    pub fn dispatch(&self, payload: AlertPayload) -> Result<()> {
        debug!(id = payload.id, channel = %payload.channel, "Dispatching alert");
        self.display.submit(payload.id, payload)
    }

    /// Withdraw a live alert. An id with no live alert is ignored.
    pub fn cancel(&self, id: u32) {
        debug!(id, "Withdrawing alert");
        self.display.withdraw(id);
    }

    /// Offer a battery exemption for the sandboxed core service.
    ///
    /// Fires at most once per process, never once the user picked "Don't show
    /// again", and not at all when the platform already exempts `package`.
    /// Returns whether a prompt actually went out.
    pub fn power_exemption_prompt(&self, package: &str) -> Result<bool> {
        if !self.gate.try_enter(OneShotFlow::PowerExemption) {
            return Ok(false);
        }

        if self.power.is_exempt(package) {
            debug!(package, "Already exempt, skipping prompt");
            return Ok(false);
        }

        let payload = PayloadBuilder::new(CH_MISSING_OPTIONAL_PERMISSION, ID_POWER_EXEMPTION_PROMPT)
            .title("Missing optional permission")
            .body(format!(
                "Allow {package} to run in the background to keep push delivery alive"
            ))
            .tap(Intent::new(ACTION_REQUEST_POWER_EXEMPTION).with_data(package))
            .auto_dismiss(true)
            .action(
                "Don't show again",
                ActionCommand::DismissForever {
                    flow: OneShotFlow::PowerExemption,
                    alert_id: ID_POWER_EXEMPTION_PROMPT,
                },
            )
            .build();
        self.dispatch(payload)?;
        Ok(true)
    }

    /// Alert that a sandboxed service crashed, at most once per process.
    ///
    /// Returns whether an alert went out.
    pub fn crash_prompt(&self, service: &str) -> Result<bool> {
        if !self.gate.try_enter(OneShotFlow::ServiceCrashed) {
            return Ok(false);
        }

        let payload = PayloadBuilder::new(CH_SERVICE_CRASHED, self.next_id())
            .title("Sandboxed service crashed")
            .body(format!("{service} stopped unexpectedly"))
            .auto_dismiss(true)
            .action(
                "Details",
                ActionCommand::Launch(
                    Intent::new(ACTION_SHOW_CRASH_DETAILS).with_data(service),
                ),
            )
            .build();
        self.dispatch(payload)?;
        Ok(true)
    }

    /// Run the command bound to a tapped alert action.
    ///
    /// For a permanent dismissal the durable flag is flushed before the alert
    /// is withdrawn, so a crash between the two steps cannot resurrect the
    /// prompt. `Launch` commands are opened by the platform, not by this core.
    pub fn handle_action(&self, command: ActionCommand) {
        match command {
            ActionCommand::DismissForever { flow, alert_id } => {
                self.gate.record_permanent_dismissal(flow);
                self.cancel(alert_id);
            }
            ActionCommand::Launch(intent) => {
                debug!(action = %intent.action, "Launch command belongs to the platform");
            }
        }
    }
}
