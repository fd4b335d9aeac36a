//! One-shot prompt gating
//!
//! Every gated prompt has two tiers of state: an in-memory latch that lasts
//! for the process lifetime, and (for flows the user may dismiss permanently)
//! a durable flag in the preference store. The read order is fixed: the
//! durable flag is consulted first, then the session dismissal bit, then the
//! latch is taken. A permanently dismissed flow therefore never consumes the
//! latch - it is rejected for a durable reason, not because it lost a race.
//!
//! Neither tier ever resets within its scope. `Entered` lasts until the
//! process exits; `PermanentlyDismissed` lasts forever.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::prefs::PreferenceStore;

/// A prompt that must fire at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OneShotFlow {
    /// Battery-exemption prompt for the sandboxed core service; the user can
    /// dismiss it permanently
    PowerExemption,
    /// Crashed-service alert, at most once per process
    ServiceCrashed,
}

impl OneShotFlow {
    pub const ALL: [OneShotFlow; 2] = [OneShotFlow::PowerExemption, OneShotFlow::ServiceCrashed];

    /// Durable preference key, for flows that support permanent dismissal.
    pub fn dismissal_key(self) -> Option<&'static str> {
        match self {
            OneShotFlow::PowerExemption => Some("power_exemption_prompt_dismissed"),
            OneShotFlow::ServiceCrashed => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OneShotFlow::PowerExemption => "power_exemption",
            OneShotFlow::ServiceCrashed => "service_crashed",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for OneShotFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

struct FlowState {
    /// Set by the first `try_enter` of the process, never cleared
    entered: AtomicBool,
    /// Set by `record_permanent_dismissal`; keeps the flow closed for the
    /// rest of the process even when the durable write failed
    dismissed: AtomicBool,
}

impl FlowState {
    fn new() -> Self {
        Self {
            entered: AtomicBool::new(false),
            dismissed: AtomicBool::new(false),
        }
    }
}

/// In-memory latch per flow, combined with the durable dismissal tier.
pub struct OneShotGate {
    flows: [FlowState; OneShotFlow::ALL.len()],
    prefs: Arc<dyn PreferenceStore>,
}

impl OneShotGate {
    pub fn new(prefs: Arc<dyn PreferenceStore>) -> Self {
        Self {
            flows: std::array::from_fn(|_| FlowState::new()),
            prefs,
        }
    }

    /// Returns true exactly once per flow per process lifetime.
    ///
    /// Concurrent callers race on a single atomic swap; the losers get false
    /// immediately, they never block. A flow the user dismissed permanently
    /// returns false without touching the latch.
    pub fn try_enter(&self, flow: OneShotFlow) -> bool {
        if let Some(key) = flow.dismissal_key() {
            if self.prefs.get_bool(key, false) {
                debug!(flow = %flow, "flow permanently dismissed");
                return false;
            }
        }

        let state = &self.flows[flow.index()];
        if state.dismissed.load(Ordering::SeqCst) {
            return false;
        }
        if state.entered.swap(true, Ordering::SeqCst) {
            debug!(flow = %flow, "flow already entered this process");
            return false;
        }
        true
    }

    /// Permanently dismiss a flow on behalf of a user action.
    ///
    /// The durable write blocks until flushed; callers cancel the triggering
    /// alert only after this returns, so a crash in between cannot lose the
    /// dismissal and re-prompt. A failed write is logged and the flow stays
    /// closed in memory for the rest of the process.
    pub fn record_permanent_dismissal(&self, flow: OneShotFlow) {
        self.flows[flow.index()]
            .dismissed
            .store(true, Ordering::SeqCst);

        let Some(key) = flow.dismissal_key() else {
            warn!(flow = %flow, "flow has no dismissal key, dismissal lasts this process only");
            return;
        };

        if let Err(e) = self.prefs.set_bool(key, true) {
            warn!(flow = %flow, error = %e, "failed to persist dismissal");
        }
    }

    /// Whether the durable tier reports the flow as dismissed.
    pub fn is_permanently_dismissed(&self, flow: OneShotFlow) -> bool {
        flow.dismissal_key()
            .map(|key| self.prefs.get_bool(key, false))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPreferenceStore;
    use anyhow::Result;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Barrier;

    fn fresh_gate() -> OneShotGate {
        OneShotGate::new(Arc::new(MemoryPreferenceStore::new()))
    }

    #[test]
    fn test_try_enter_true_exactly_once() {
        let gate = fresh_gate();
        assert!(gate.try_enter(OneShotFlow::PowerExemption));
        assert!(!gate.try_enter(OneShotFlow::PowerExemption));
        assert!(!gate.try_enter(OneShotFlow::PowerExemption));
    }

    #[test]
    fn test_flows_are_independent() {
        let gate = fresh_gate();
        assert!(gate.try_enter(OneShotFlow::PowerExemption));
        assert!(gate.try_enter(OneShotFlow::ServiceCrashed));
        assert!(!gate.try_enter(OneShotFlow::ServiceCrashed));
    }

    #[test]
    fn test_concurrent_entry_has_single_winner() {
        let gate = Arc::new(fresh_gate());
        let barrier = Arc::new(Barrier::new(16));
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let gate = gate.clone();
                let barrier = barrier.clone();
                let winners = winners.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    if gate.try_enter(OneShotFlow::PowerExemption) {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(winners.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_durable_dismissal_rejects_without_latching() {
        let prefs = Arc::new(MemoryPreferenceStore::new());
        prefs
            .set_bool("power_exemption_prompt_dismissed", true)
            .unwrap();
        let gate = OneShotGate::new(prefs.clone());

        assert!(!gate.try_enter(OneShotFlow::PowerExemption));

        // Clearing the durable flag proves the latch was never consumed.
        prefs
            .set_bool("power_exemption_prompt_dismissed", false)
            .unwrap();
        assert!(gate.try_enter(OneShotFlow::PowerExemption));
    }

    #[test]
    fn test_dismissal_survives_simulated_restart() {
        let prefs = Arc::new(MemoryPreferenceStore::new());
        let gate = OneShotGate::new(prefs.clone());

        assert!(gate.try_enter(OneShotFlow::PowerExemption));
        gate.record_permanent_dismissal(OneShotFlow::PowerExemption);
        assert!(gate.is_permanently_dismissed(OneShotFlow::PowerExemption));

        // New gate over the same store = restarted process.
        let restarted = OneShotGate::new(prefs);
        assert!(!restarted.try_enter(OneShotFlow::PowerExemption));
    }

    #[test]
    fn test_restart_without_dismissal_is_eligible_again() {
        let prefs = Arc::new(MemoryPreferenceStore::new());
        let gate = OneShotGate::new(prefs.clone());
        assert!(gate.try_enter(OneShotFlow::PowerExemption));

        // Entered but never dismissed: the next process may prompt again.
        let restarted = OneShotGate::new(prefs);
        assert!(restarted.try_enter(OneShotFlow::PowerExemption));
    }

    /// Store whose writes always fail, for the degraded-durability path.
    struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        fn get_bool(&self, _key: &str, default: bool) -> bool {
            default
        }
        fn set_bool(&self, _key: &str, _value: bool) -> Result<()> {
            anyhow::bail!("disk full")
        }
    }

    #[test]
    fn test_failed_durable_write_still_closes_flow_for_session() {
        let gate = OneShotGate::new(Arc::new(BrokenStore));
        assert!(gate.try_enter(OneShotFlow::PowerExemption));

        // Must not panic even though the write fails.
        gate.record_permanent_dismissal(OneShotFlow::PowerExemption);

        assert!(!gate.try_enter(OneShotFlow::PowerExemption));
        assert!(!gate.is_permanently_dismissed(OneShotFlow::PowerExemption));
    }

    #[test]
    fn test_session_dismissal_rejects_before_latch() {
        // Dismiss without ever entering: the session bit alone must reject.
        let gate = OneShotGate::new(Arc::new(BrokenStore));
        gate.record_permanent_dismissal(OneShotFlow::PowerExemption);
        assert!(!gate.try_enter(OneShotFlow::PowerExemption));
    }

    #[test]
    fn test_dismissal_without_key_is_session_only() {
        let prefs = Arc::new(MemoryPreferenceStore::new());
        let gate = OneShotGate::new(prefs.clone());

        gate.record_permanent_dismissal(OneShotFlow::ServiceCrashed);
        assert!(!gate.try_enter(OneShotFlow::ServiceCrashed));

        let restarted = OneShotGate::new(prefs);
        assert!(restarted.try_enter(OneShotFlow::ServiceCrashed));
    }
}
