//! Guest lifecycle and the contract the per-frame cycle drives.

use crate::error::BridgeError;
use crate::pixels::GuestMemory;

/// `Unloaded → Loading → Ready → Running`, with `Faulted` reachable from
/// `Loading` (fetch/instantiate failure) and `Running` (guest panic or trap).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BridgeState {
    #[default]
    Unloaded,
    Loading,
    Ready {
        has_entry: bool,
    },
    Running,
    Faulted,
}

impl BridgeState {
    pub fn name(&self) -> &'static str {
        match self {
            BridgeState::Unloaded => "Unloaded",
            BridgeState::Loading => "Loading",
            BridgeState::Ready { .. } => "Ready",
            BridgeState::Running => "Running",
            BridgeState::Faulted => "Faulted",
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self, BridgeState::Running)
    }

    #[inline]
    pub fn is_faulted(&self) -> bool {
        matches!(self, BridgeState::Faulted)
    }

    pub fn begin_load(&mut self) -> Result<(), BridgeError> {
        match self {
            BridgeState::Unloaded => {
                *self = BridgeState::Loading;
                Ok(())
            }
            _ => Err(self.invalid("begin_load")),
        }
    }

    pub fn loaded(&mut self, has_entry: bool) -> Result<(), BridgeError> {
        match self {
            BridgeState::Loading => {
                *self = BridgeState::Ready { has_entry };
                Ok(())
            }
            _ => Err(self.invalid("loaded")),
        }
    }

    /// Schedules the first frame. Returns `Ok(false)` when the guest has no
    /// entry point: that is logged and the instance simply never runs.
    pub fn start(&mut self) -> Result<bool, BridgeError> {
        match *self {
            BridgeState::Ready { has_entry: true } => {
                *self = BridgeState::Running;
                Ok(true)
            }
            BridgeState::Ready { has_entry: false } => Ok(false),
            _ => Err(self.invalid("start")),
        }
    }

    pub fn fault(&mut self) {
        *self = BridgeState::Faulted;
    }

    fn invalid(&self, event: &'static str) -> BridgeError {
        BridgeError::InvalidTransition {
            from: self.name(),
            event,
        }
    }
}

/// What the frame cycle needs from an instantiated guest.
pub trait Guest {
    type Memory: GuestMemory + ?Sized;

    /// Calls the guest's redraw export with the elapsed milliseconds.
    fn redraw(&mut self, dt_ms: f64) -> Result<(), BridgeError>;

    /// Current linear memory. Must not hand out a view cached across a
    /// `memory.grow`.
    fn memory(&self) -> &Self::Memory;
}

/// First candidate for which `exists` holds.
pub fn resolve_export<'a, F>(candidates: &'a [String], exists: F) -> Option<&'a str>
where
    F: Fn(&str) -> bool,
{
    candidates
        .iter()
        .map(String::as_str)
        .find(|name| exists(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_reaches_running() {
        let mut s = BridgeState::default();
        s.begin_load().unwrap();
        s.loaded(true).unwrap();
        assert_eq!(s.start(), Ok(true));
        assert!(s.is_running());
    }

    #[test]
    fn missing_entry_stays_ready() {
        let mut s = BridgeState::Loading;
        s.loaded(false).unwrap();
        assert_eq!(s.start(), Ok(false));
        assert_eq!(s, BridgeState::Ready { has_entry: false });
    }

    #[test]
    fn start_before_load_is_rejected() {
        let mut s = BridgeState::Unloaded;
        assert!(matches!(
            s.start(),
            Err(BridgeError::InvalidTransition { from: "Unloaded", .. })
        ));
    }

    #[test]
    fn export_resolution_prefers_earlier_names() {
        let names = vec!["main".to_string(), "start".to_string()];
        assert_eq!(resolve_export(&names, |n| n == "start"), Some("start"));
        assert_eq!(resolve_export(&names, |_| true), Some("main"));
        assert_eq!(resolve_export(&names, |_| false), None);
    }
}
