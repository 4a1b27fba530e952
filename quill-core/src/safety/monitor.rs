//! Kill switch debouncing
//!
//! The panic button is edge triggered. Mechanical bounce produces bursts of
//! edges, so an edge is only accepted when the previous accepted edge is at
//! least `debounce_ms` old. The first edge after boot is always accepted.

use super::kill::KillFlag;
use crate::config::KillSwitchConfig;

/// Debounced kill switch input
#[derive(Debug, Clone)]
pub struct KillSwitch {
    debounce_ms: u32,
    last_trigger_ms: Option<u64>,
}

impl KillSwitch {
    /// Create a kill switch with the configured debounce window
    pub fn new(config: &KillSwitchConfig) -> Self {
        Self {
            debounce_ms: config.debounce_ms,
            last_trigger_ms: None,
        }
    }

    /// Handle an input edge at `now_ms` (monotonic milliseconds)
    ///
    /// Returns true if the edge was accepted, in which case the kill flag
    /// has been tripped and the caller must stop the pulse generator, park
    /// the pen and raise the abort signal. Rejected edges have no effect.
    pub fn on_edge(&mut self, now_ms: u64, kill: &KillFlag) -> bool {
        if let Some(last) = self.last_trigger_ms {
            if now_ms.saturating_sub(last) < u64::from(self.debounce_ms) {
                return false;
            }
        }

        self.last_trigger_ms = Some(now_ms);
        kill.trip();
        true
    }

    /// Time of the last accepted edge
    pub fn last_trigger_ms(&self) -> Option<u64> {
        self.last_trigger_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn switch() -> KillSwitch {
        KillSwitch::new(&KillSwitchConfig::default())
    }

    #[test]
    fn test_first_edge_accepted_at_boot() {
        let flag = KillFlag::new();
        let mut ks = switch();
        assert!(ks.on_edge(0, &flag));
        assert!(flag.is_tripped());
        assert_eq!(ks.last_trigger_ms(), Some(0));
    }

    #[test]
    fn test_bounce_is_ignored() {
        let flag = KillFlag::new();
        let mut ks = switch();

        let mut transitions = 0;
        let mut aborts = 0;
        for now in [1_000, 1_050] {
            let was_tripped = flag.is_tripped();
            if ks.on_edge(now, &flag) {
                aborts += 1;
            }
            if !was_tripped && flag.is_tripped() {
                transitions += 1;
            }
        }

        assert_eq!(transitions, 1);
        assert_eq!(aborts, 1);
        // Rejected edge does not move the window
        assert_eq!(ks.last_trigger_ms(), Some(1_000));
    }

    #[test]
    fn test_edge_after_window_accepted() {
        let flag = KillFlag::new();
        let mut ks = switch();
        assert!(ks.on_edge(1_000, &flag));
        assert!(!ks.on_edge(1_199, &flag));
        assert!(ks.on_edge(1_200, &flag));
        assert!(flag.is_tripped());
    }
}
