//! Application phase
//!
//! The high-level connectivity/sync/reset status every task observes.

/// Application phases
///
/// Exactly one phase is current at any instant. There is no fixed transition
/// table: each producer (button, link monitor, sync task) decides its own
/// moves, and `AppState` keeps the previous phase for restore-on-timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Phase {
    /// No WiFi credentials stored
    #[default]
    NotConfigured = 0,
    /// Joining the configured network
    Connecting = 1,
    /// Link up, wall clock not yet trusted
    ConnectedNotSynced = 2,
    /// Time sync in progress
    ConnectedSyncing = 3,
    /// Link up and wall clock synced
    ConnectedSynced = 4,
    /// Link lost
    Disconnected = 5,
    /// Waiting for double-click to confirm a config reset
    ResetPending = 6,
}

impl Phase {
    /// Get the phase as a byte value
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a phase from a byte value
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Phase::NotConfigured),
            1 => Some(Phase::Connecting),
            2 => Some(Phase::ConnectedNotSynced),
            3 => Some(Phase::ConnectedSyncing),
            4 => Some(Phase::ConnectedSynced),
            5 => Some(Phase::Disconnected),
            6 => Some(Phase::ResetPending),
            _ => None,
        }
    }

    /// Phases in which the link is expected to be up
    pub fn is_connected(self) -> bool {
        matches!(
            self,
            Phase::ConnectedNotSynced | Phase::ConnectedSyncing | Phase::ConnectedSynced
        )
    }

    /// Phases the link monitor leaves alone
    pub fn suspends_link_monitor(self) -> bool {
        matches!(
            self,
            Phase::ResetPending | Phase::Connecting | Phase::NotConfigured
        )
    }

    /// Phases in which the sync task may start an attempt
    pub fn allows_sync(self) -> bool {
        matches!(self, Phase::ConnectedNotSynced | Phase::ConnectedSynced)
    }

    /// Phases that end the startup screen
    pub fn is_settled(self) -> bool {
        matches!(
            self,
            Phase::Disconnected | Phase::ConnectedNotSynced | Phase::ConnectedSynced
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Phase; 7] = [
        Phase::NotConfigured,
        Phase::Connecting,
        Phase::ConnectedNotSynced,
        Phase::ConnectedSyncing,
        Phase::ConnectedSynced,
        Phase::Disconnected,
        Phase::ResetPending,
    ];

    #[test]
    fn test_byte_conversion() {
        for phase in ALL {
            assert_eq!(Phase::from_u8(phase.as_u8()), Some(phase));
        }
        assert_eq!(Phase::from_u8(7), None);
    }

    #[test]
    fn test_sync_allowed_only_when_idle_and_connected() {
        let allowed: heapless::Vec<Phase, 7> = ALL.into_iter().filter(|p| p.allows_sync()).collect();
        assert_eq!(
            allowed.as_slice(),
            &[Phase::ConnectedNotSynced, Phase::ConnectedSynced]
        );
    }

    #[test]
    fn test_link_monitor_suspension() {
        assert!(Phase::ResetPending.suspends_link_monitor());
        assert!(Phase::Connecting.suspends_link_monitor());
        assert!(Phase::NotConfigured.suspends_link_monitor());
        assert!(!Phase::Disconnected.suspends_link_monitor());
        assert!(!Phase::ConnectedSyncing.suspends_link_monitor());
    }
}
