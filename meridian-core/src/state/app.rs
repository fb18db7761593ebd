//! Shared application state
//!
//! One `AppState` lives for the whole program and is handed to every task by
//! `&'static` reference. Nothing is pushed to consumers: the render loop and
//! the network tasks poll it on their own period.
//!
//! Scalars are atomics. The phase and previous phase are packed into a single
//! `AtomicU16` so a reader can never observe one without the other. Only the
//! status message needs a critical section.

use core::cell::RefCell;

use critical_section::Mutex;
use portable_atomic::{AtomicBool, AtomicU16, AtomicU64, Ordering};

use super::phase::Phase;
use super::status::{StatusMessage, StatusText};
use crate::config::Timing;

const fn pack(current: Phase, previous: Phase) -> u16 {
    ((previous.as_u8() as u16) << 8) | current.as_u8() as u16
}

fn unpack(packed: u16) -> (Phase, Phase) {
    let current = Phase::from_u8(packed as u8).unwrap_or_default();
    let previous = Phase::from_u8((packed >> 8) as u8).unwrap_or_default();
    (current, previous)
}

/// Authoritative application state
pub struct AppState {
    phases: AtomicU16,
    last_sync_ms: AtomicU64,
    last_reconnect_ms: AtomicU64,
    sync_requested: AtomicBool,
    initialised: AtomicBool,
    status: Mutex<RefCell<StatusMessage>>,
    timing: Timing,
}

impl AppState {
    /// Create state in `NotConfigured` with nothing ever synced
    pub const fn new(timing: Timing) -> Self {
        Self {
            phases: AtomicU16::new(pack(Phase::NotConfigured, Phase::NotConfigured)),
            last_sync_ms: AtomicU64::new(0),
            last_reconnect_ms: AtomicU64::new(0),
            sync_requested: AtomicBool::new(false),
            initialised: AtomicBool::new(false),
            status: Mutex::new(RefCell::new(StatusMessage::new())),
            timing,
        }
    }

    /// Timing the due checks are evaluated against
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Adopt `new` as the current phase
    ///
    /// The old current phase becomes the previous phase. Setting the phase
    /// that is already current changes nothing. Returns whether a transition
    /// happened.
    pub fn set_phase(&self, new: Phase) -> bool {
        self.phases
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |packed| {
                let (current, _) = unpack(packed);
                (current != new).then_some(pack(new, current))
            })
            .is_ok()
    }

    /// Move out of `from` into `to`, if `from` is still the caller's to leave
    ///
    /// When `from` is current it is replaced as with [`set_phase`]. When another
    /// producer has moved on and `from` is only the previous phase (say a
    /// reset prompt armed meanwhile), `to` becomes the phase that prompt falls
    /// back to. Otherwise nothing changes. Returns whether `to` became current.
    ///
    /// [`set_phase`]: AppState::set_phase
    pub fn leave_phase(&self, from: Phase, to: Phase) -> bool {
        let mut became_current = false;
        let _ = self
            .phases
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |packed| {
                let (current, previous) = unpack(packed);
                became_current = current == from;
                if current == from {
                    (from != to).then_some(pack(to, from))
                } else if previous == from {
                    Some(pack(current, to))
                } else {
                    None
                }
            });
        became_current
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        unpack(self.phases.load(Ordering::Acquire)).0
    }

    /// Phase that was current before the last distinct transition
    pub fn previous_phase(&self) -> Phase {
        unpack(self.phases.load(Ordering::Acquire)).1
    }

    /// Record a successful time sync at `now_ms`
    pub fn mark_synced(&self, now_ms: u64) {
        // 0 is reserved for "never"
        self.last_sync_ms.store(now_ms.max(1), Ordering::Release);
    }

    /// Record a reconnect attempt at `now_ms`
    pub fn mark_reconnect_attempted(&self, now_ms: u64) {
        self.last_reconnect_ms.store(now_ms.max(1), Ordering::Release);
    }

    /// Monotonic time of the last successful sync (0 = never)
    pub fn last_sync_ms(&self) -> u64 {
        self.last_sync_ms.load(Ordering::Acquire)
    }

    /// Whether a periodic sync is due
    pub fn is_sync_due(&self, now_ms: u64) -> bool {
        is_due(&self.last_sync_ms, self.timing.sync_interval_ms, now_ms)
    }

    /// Whether the reconnect back-off has elapsed
    pub fn is_reconnect_due(&self, now_ms: u64) -> bool {
        is_due(&self.last_reconnect_ms, self.timing.reconnect_interval_ms, now_ms)
    }

    /// Show `text` until `now_ms + timeout_ms`
    pub fn set_status_message(&self, text: &str, timeout_ms: u64, now_ms: u64) {
        critical_section::with(|cs| {
            self.status.borrow_ref_mut(cs).set(text, timeout_ms, now_ms);
        });
    }

    /// Copy of the status message while it is active
    pub fn status_message_if_active(&self, now_ms: u64) -> Option<StatusText> {
        critical_section::with(|cs| {
            self.status
                .borrow_ref_mut(cs)
                .active(now_ms)
                .and_then(|text| StatusText::try_from(text).ok())
        })
    }

    /// Ask the sync task for an immediate sync
    pub fn request_sync(&self) {
        self.sync_requested.store(true, Ordering::Release);
    }

    /// Whether a sync request is pending, without consuming it
    pub fn is_sync_requested(&self) -> bool {
        self.sync_requested.load(Ordering::Acquire)
    }

    /// Test-and-clear the sync request
    pub fn consume_sync_request(&self) -> bool {
        self.sync_requested.swap(false, Ordering::AcqRel)
    }

    /// Mark boot as finished
    pub fn set_initialised(&self) {
        self.initialised.store(true, Ordering::Release);
    }

    /// Whether boot has finished
    pub fn is_initialised(&self) -> bool {
        self.initialised.load(Ordering::Acquire)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Timing::DEFAULT)
    }
}

fn is_due(stamp: &AtomicU64, interval_ms: u64, now_ms: u64) -> bool {
    match stamp.load(Ordering::Acquire) {
        0 => true,
        last => now_ms.saturating_sub(last) >= interval_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn phase_strategy() -> impl Strategy<Value = Phase> {
        (0u8..7).prop_map(|b| Phase::from_u8(b).unwrap())
    }

    #[test]
    fn test_initial_state() {
        let state = AppState::default();
        assert_eq!(state.phase(), Phase::NotConfigured);
        assert_eq!(state.previous_phase(), Phase::NotConfigured);
        assert!(!state.is_sync_requested());
        assert!(!state.is_initialised());
    }

    #[test]
    fn test_repeated_set_keeps_previous() {
        let state = AppState::default();
        assert!(state.set_phase(Phase::Connecting));
        assert!(state.set_phase(Phase::ConnectedNotSynced));
        assert!(!state.set_phase(Phase::ConnectedNotSynced));

        assert_eq!(state.phase(), Phase::ConnectedNotSynced);
        assert_eq!(state.previous_phase(), Phase::Connecting);
    }

    #[test]
    fn test_leave_phase_when_current() {
        let state = AppState::default();
        state.set_phase(Phase::ConnectedSyncing);
        assert!(state.leave_phase(Phase::ConnectedSyncing, Phase::ConnectedSynced));
        assert_eq!(state.phase(), Phase::ConnectedSynced);
        assert_eq!(state.previous_phase(), Phase::ConnectedSyncing);
    }

    #[test]
    fn test_leave_phase_keeps_newer_phase() {
        let state = AppState::default();
        state.set_phase(Phase::ConnectedSyncing);
        state.set_phase(Phase::ResetPending);

        assert!(!state.leave_phase(Phase::ConnectedSyncing, Phase::ConnectedSynced));
        assert_eq!(state.phase(), Phase::ResetPending);
        // The prompt now falls back to the outcome, not to the stale phase
        assert_eq!(state.previous_phase(), Phase::ConnectedSynced);
    }

    #[test]
    fn test_leave_phase_unrelated_is_noop() {
        let state = AppState::default();
        state.set_phase(Phase::Connecting);
        state.set_phase(Phase::Disconnected);

        assert!(!state.leave_phase(Phase::ConnectedSyncing, Phase::ConnectedSynced));
        assert_eq!(state.phase(), Phase::Disconnected);
        assert_eq!(state.previous_phase(), Phase::Connecting);
    }

    #[test]
    fn test_due_checks() {
        let state = AppState::default();
        let timing = *state.timing();

        // Never synced: due immediately
        assert!(state.is_sync_due(0));
        assert!(state.is_reconnect_due(0));

        state.mark_synced(5_000);
        assert!(!state.is_sync_due(5_000));
        assert!(!state.is_sync_due(5_000 + timing.sync_interval_ms - 1));
        assert!(state.is_sync_due(5_000 + timing.sync_interval_ms));

        state.mark_reconnect_attempted(100);
        assert!(!state.is_reconnect_due(100 + timing.reconnect_interval_ms - 1));
        assert!(state.is_reconnect_due(100 + timing.reconnect_interval_ms));
    }

    #[test]
    fn test_mark_at_zero_is_not_never() {
        let state = AppState::default();
        state.mark_synced(0);
        assert!(!state.is_sync_due(0));
        assert_eq!(state.last_sync_ms(), 1);
    }

    #[test]
    fn test_status_message_expiry() {
        let state = AppState::default();
        state.set_status_message("Time synced", 3000, 10_000);

        assert_eq!(
            state.status_message_if_active(12_999).as_deref(),
            Some("Time synced")
        );
        assert_eq!(state.status_message_if_active(13_000), None);
        assert_eq!(state.status_message_if_active(13_001), None);
    }

    #[test]
    fn test_sync_request_consumed_once() {
        let state = AppState::default();
        state.request_sync();
        assert!(state.is_sync_requested());
        assert!(state.consume_sync_request());
        assert!(!state.consume_sync_request());
        assert!(!state.is_sync_requested());
    }

    proptest! {
        #[test]
        fn prop_phase_history(phases in proptest::collection::vec(phase_strategy(), 1..40)) {
            let state = AppState::default();
            let mut current = Phase::NotConfigured;
            let mut previous = Phase::NotConfigured;

            for phase in phases {
                if phase != current {
                    previous = current;
                    current = phase;
                }
                state.set_phase(phase);
                prop_assert_eq!(state.phase(), current);
                prop_assert_eq!(state.previous_phase(), previous);
            }
        }

        #[test]
        fn prop_due_is_monotone(mark in 1u64..1_000_000, a in 0u64..10_000_000, b in 0u64..10_000_000) {
            let state = AppState::default();
            state.mark_reconnect_attempted(mark);
            let (early, late) = if a <= b { (a, b) } else { (b, a) };
            if state.is_reconnect_due(mark + early) {
                prop_assert!(state.is_reconnect_due(mark + late));
            }
        }
    }
}
