//! compat-notify - one-shot notification gating and dispatch for the
//! sandboxed-services compatibility layer
//!
//! # Design goals
//! 1. Show-once semantics: gated prompts fire at most once per process, and
//!    the power-exemption prompt at most once ever (durable dismissal)
//! 2. Explicit collaborators: display, preference storage and power queries
//!    sit behind traits so tests construct isolated instances per case
//! 3. Lock-free hot path: the id counter and the per-flow latches are
//!    single-word atomics; only the rare dismissal write touches disk
//!
//! # Usage
//! ```ignore
//! use compat_notify::{FilePreferenceStore, Notifications};
//! use std::sync::Arc;
//!
//! let prefs = Arc::new(FilePreferenceStore::new(FilePreferenceStore::default_path()));
//! let notifications = Notifications::new(platform_sink, prefs, power);
//! notifications.register_channels()?;
//! notifications.power_exemption_prompt("com.vendor.core")?;
//! ```

pub mod channel;
pub mod composer;
pub mod display;
pub mod gate;
pub mod ids;
pub mod payload;
pub mod power;
pub mod prefs;
pub mod urgency;

pub use channel::{channel_set, Channel};
pub use composer::{Notifications, ACTION_REQUEST_POWER_EXEMPTION, ACTION_SHOW_CRASH_DETAILS};
pub use display::DisplaySink;
pub use gate::{OneShotFlow, OneShotGate};
pub use ids::{IdAllocator, DYNAMIC_ID_START, ID_POWER_EXEMPTION_PROMPT};
pub use payload::{ActionCommand, AlertAction, AlertPayload, Intent, PayloadBuilder};
pub use power::{AlwaysExempt, PowerQuery};
pub use prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use urgency::Urgency;
