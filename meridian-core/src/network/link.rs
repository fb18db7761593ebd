//! Link supervision
//!
//! Boot-time bring-up and the periodic link check. Phases owned by someone
//! else (boot, a pending reset, missing credentials) are left alone.

use crate::state::{AppState, Phase};
use crate::traits::LinkControl;

/// Result of one [`check_link`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkOutcome {
    /// The current phase suspends link supervision
    Suspended,
    /// Link up, nothing to do
    Up,
    /// Link came back by itself; phase moved to `ConnectedNotSynced`
    Restored,
    /// Link down, reconnect back-off still running
    Down,
    /// Link down, a reconnect was attempted with this result
    Reconnected(bool),
}

/// Join the network at boot
///
/// Without credentials the phase becomes `NotConfigured` and no attempt is
/// made. Otherwise `Connecting` lasts for the join attempt, which leaves the
/// phase at `ConnectedNotSynced` or `Disconnected`.
pub async fn bring_up<L: LinkControl>(
    state: &AppState,
    link: &mut L,
    configured: bool,
    now_ms: u64,
) -> bool {
    if !configured {
        state.set_phase(Phase::NotConfigured);
        return false;
    }

    state.set_phase(Phase::Connecting);
    state.mark_reconnect_attempted(now_ms);
    let up = link.reconnect().await;
    let outcome = if up {
        Phase::ConnectedNotSynced
    } else {
        Phase::Disconnected
    };
    state.leave_phase(Phase::Connecting, outcome);
    up
}

/// Run the link check once
pub async fn check_link<L: LinkControl>(state: &AppState, link: &mut L, now_ms: u64) -> LinkOutcome {
    let phase = state.phase();
    if phase.suspends_link_monitor() {
        return LinkOutcome::Suspended;
    }

    if !link.is_link_up() {
        state.set_phase(Phase::Disconnected);
        if !state.is_reconnect_due(now_ms) {
            return LinkOutcome::Down;
        }
        state.mark_reconnect_attempted(now_ms);
        return LinkOutcome::Reconnected(link.reconnect().await);
    }

    if phase == Phase::Disconnected {
        state.set_phase(Phase::ConnectedNotSynced);
        return LinkOutcome::Restored;
    }
    LinkOutcome::Up
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Timing;
    use crate::network::testing::FakeLink;
    use embassy_futures::block_on;

    #[test]
    fn test_bring_up_without_credentials() {
        let state = AppState::new(Timing::DEFAULT);
        let mut link = FakeLink::down().reconnecting();
        assert!(!block_on(bring_up(&state, &mut link, false, 0)));
        assert_eq!(state.phase(), Phase::NotConfigured);
        assert_eq!(link.reconnects(), 0);
    }

    #[test]
    fn test_bring_up_connects() {
        let state = AppState::new(Timing::DEFAULT);
        let mut link = FakeLink::down().reconnecting();
        assert!(block_on(bring_up(&state, &mut link, true, 0)));
        assert_eq!(state.phase(), Phase::ConnectedNotSynced);
        assert_eq!(state.previous_phase(), Phase::Connecting);
    }

    #[test]
    fn test_bring_up_failure_is_disconnected() {
        let state = AppState::new(Timing::DEFAULT);
        let mut link = FakeLink::down();
        assert!(!block_on(bring_up(&state, &mut link, true, 100)));
        assert_eq!(state.phase(), Phase::Disconnected);
        // The boot attempt counts against the back-off
        assert!(!state.is_reconnect_due(100 + 1_000));
    }

    #[test]
    fn test_link_drop_respects_backoff() {
        let state = AppState::new(Timing::DEFAULT);
        state.set_phase(Phase::ConnectedSynced);
        state.mark_reconnect_attempted(1_000);
        let mut link = FakeLink::down();

        assert_eq!(block_on(check_link(&state, &mut link, 5_000)), LinkOutcome::Down);
        assert_eq!(state.phase(), Phase::Disconnected);
        assert_eq!(link.reconnects(), 0);

        assert_eq!(block_on(check_link(&state, &mut link, 26_000)), LinkOutcome::Down);
        assert_eq!(link.reconnects(), 0);

        // Attempt recorded even though it fails
        assert_eq!(
            block_on(check_link(&state, &mut link, 31_000)),
            LinkOutcome::Reconnected(false)
        );
        assert_eq!(link.reconnects(), 1);
        assert!(!state.is_reconnect_due(36_000));
        assert_eq!(state.phase(), Phase::Disconnected);
    }

    #[test]
    fn test_link_restored() {
        let state = AppState::new(Timing::DEFAULT);
        state.set_phase(Phase::Disconnected);
        let mut link = FakeLink::up();

        assert_eq!(block_on(check_link(&state, &mut link, 0)), LinkOutcome::Restored);
        assert_eq!(state.phase(), Phase::ConnectedNotSynced);
        assert_eq!(block_on(check_link(&state, &mut link, 5_000)), LinkOutcome::Up);
    }

    #[test]
    fn test_suspended_phases() {
        let mut link = FakeLink::down();
        for phase in [Phase::ResetPending, Phase::Connecting, Phase::NotConfigured] {
            let state = AppState::new(Timing::DEFAULT);
            state.set_phase(phase);
            assert_eq!(block_on(check_link(&state, &mut link, 60_000)), LinkOutcome::Suspended);
            assert_eq!(state.phase(), phase);
        }
        assert_eq!(link.reconnects(), 0);
    }
}
