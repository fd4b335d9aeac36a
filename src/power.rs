//! Power-exemption query seam

/// Read-only external fact: whether the platform already exempts a package
/// from battery-saving restrictions. Consulted before prompting the user so
/// an already-exempt process never sees the prompt.
pub trait PowerQuery: Send + Sync {
    fn is_exempt(&self, package: &str) -> bool;
}

/// Stub for platforms without battery restrictions: everything is exempt, so
/// the exemption prompt never fires.
pub struct AlwaysExempt;

impl PowerQuery for AlwaysExempt {
    fn is_exempt(&self, _package: &str) -> bool {
        true
    }
}
