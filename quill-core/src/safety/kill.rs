//! Latched kill flag

use portable_atomic::{AtomicBool, Ordering};

/// Process-wide emergency stop flag
///
/// Once tripped it stays tripped until reset; there is no clear operation.
#[derive(Debug)]
pub struct KillFlag {
    tripped: AtomicBool,
}

impl Default for KillFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl KillFlag {
    /// Create an untripped flag
    pub const fn new() -> Self {
        Self {
            tripped: AtomicBool::new(false),
        }
    }

    /// Check whether the flag has been tripped
    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::Acquire)
    }

    /// Trip the flag
    ///
    /// Returns true if this call changed the flag, false if it was
    /// already tripped.
    pub fn trip(&self) -> bool {
        !self.tripped.swap(true, Ordering::AcqRel)
    }
}
