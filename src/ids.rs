//! Reserved alert ids and the dynamic id allocator
//!
//! A handful of well-known alerts keep fixed ids so they can be cancelled or
//! replaced from anywhere in the process. Everything else draws from
//! [`IdAllocator`], which starts far above the reserved range.

use std::sync::atomic::{AtomicU32, Ordering};

pub const ID_PERSISTENT_FG_SERVICE: u32 = 1;
pub const ID_PENDING_USER_ACTION: u32 = 2;
pub const ID_MISSING_STORAGE_PERMISSION: u32 = 3;
pub const ID_MISSING_NEARBY_PERMISSION: u32 = 4;
pub const ID_MISSING_NEARBY_PERMISSION_GENERIC: u32 = 5;
pub const ID_MISSING_REQUIRED_APP: u32 = 6;
pub const ID_POWER_EXEMPTION_PROMPT: u32 = 7;

/// First id handed out for dynamically created alerts.
pub const DYNAMIC_ID_START: u32 = 10_000;

/// Process-wide allocator for alert ids outside the reserved set.
///
/// Lock-free and monotonically increasing. Ids are unique for the lifetime of
/// the process only; a restart starts over at [`DYNAMIC_ID_START`]. The
/// counter wraps at `u32::MAX`, which would take ~4 billion allocations in a
/// single process to reach.
pub struct IdAllocator {
    next: AtomicU32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU32::new(DYNAMIC_ID_START),
        }
    }

    /// Allocate the next id. Cannot fail.
    pub fn next_id(&self) -> u32 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
