//! Display subsystem seam
//!
//! The core never draws anything. Rendering, channel metadata storage and the
//! actual OS notification calls live behind this trait in the embedding shim.

use anyhow::Result;

use crate::channel::Channel;
use crate::payload::AlertPayload;

/// Platform notification surface.
///
/// Implementations must be idempotent per id: submitting twice with the same
/// id replaces the alert rather than stacking a second one, and withdrawing an
/// id with no live alert does nothing. Safe to call from any thread.
pub trait DisplaySink: Send + Sync {
    /// Upsert the channel set by key. Registering the same set again must not
    /// duplicate or corrupt entries.
    fn register_channels(&self, channels: &[Channel]) -> Result<()>;

    /// Show or replace the alert carrying this id. The id is live afterwards.
    fn submit(&self, id: u32, payload: AlertPayload) -> Result<()>;

    /// Remove a live alert. Unknown ids are ignored.
    fn withdraw(&self, id: u32);
}
