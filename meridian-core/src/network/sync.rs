//! Time-sync policy
//!
//! Runs on the sync task's period. A sync is attempted only while connected
//! and either due (hourly, or never synced) or explicitly requested. Servers
//! are tried in order, each polled a bounded number of times.

use embedded_hal_async::delay::DelayNs;
use heapless::Vec;

use crate::state::{AppState, Phase};
use crate::traits::{LinkStatus, Monotonic, TimeSource};

/// Servers tried after the configured one
pub const FALLBACK_SERVERS: [&str; 5] = [
    "pool.ntp.org",
    "time.google.com",
    "time.cloudflare.com",
    "time.windows.com",
    "hu.pool.ntp.org",
];

/// Upper bound on the server list
pub const MAX_SERVERS: usize = FALLBACK_SERVERS.len() + 1;

/// Status message published on success
pub const MSG_SYNCED: &str = "Time synced";
/// Status message published when every server failed
pub const MSG_FAILED: &str = "Sync failed";
/// Status message published when the link is down at trigger time
pub const MSG_NO_WIFI: &str = "No WiFi";

/// Result of one [`check_sync`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncOutcome<'a> {
    /// Not due, not requested, or not in a phase that syncs
    Idle,
    /// Triggered while the link was down
    NoLink,
    /// Clock set from `server`
    Synced { server: &'a str },
    /// Every server failed
    Failed,
}

/// Servers in the order they are tried
///
/// The configured server first, then the fallbacks. Empty entries and
/// duplicates are dropped.
pub fn server_list(configured: &str) -> Vec<&str, MAX_SERVERS> {
    let mut servers: Vec<&str, MAX_SERVERS> = Vec::new();
    for server in core::iter::once(configured).chain(FALLBACK_SERVERS) {
        let server = server.trim();
        if server.is_empty() || servers.contains(&server) {
            continue;
        }
        // Capacity covers every candidate
        let _ = servers.push(server);
    }
    servers
}

/// Whether the sync task should trigger now
pub fn should_sync(state: &AppState, now_ms: u64) -> bool {
    state.phase().allows_sync() && (state.is_sync_requested() || state.is_sync_due(now_ms))
}

/// Poll `source` until it reports success or the attempts run out
async fn try_server<T, D>(source: &mut T, server: &str, attempts: u8, delay_ms: u32, delay: &mut D) -> bool
where
    T: TimeSource,
    D: DelayNs,
{
    source.begin(server).await;

    let mut synced = source.poll().await;
    let mut tries = 0;
    while !synced && tries < attempts {
        delay.delay_ms(delay_ms).await;
        tries += 1;
        synced = source.poll().await;
    }
    synced
}

/// Run the sync policy once
///
/// Sets `ConnectedSyncing` for the duration of the attempt and leaves the
/// phase at `ConnectedSynced`, `ConnectedNotSynced` or `Disconnected`. A
/// phase another task set meanwhile (a reset prompt) is kept, and the
/// outcome becomes the phase it falls back to.
pub async fn check_sync<'a, L, T, D, M>(
    state: &AppState,
    configured: &'a str,
    link: &L,
    source: &mut T,
    delay: &mut D,
    clock: &M,
) -> SyncOutcome<'a>
where
    L: LinkStatus,
    T: TimeSource,
    D: DelayNs,
    M: Monotonic,
{
    if !should_sync(state, clock.now_ms()) {
        return SyncOutcome::Idle;
    }

    state.consume_sync_request();
    state.set_phase(Phase::ConnectedSyncing);
    let timing = *state.timing();

    if !link.is_link_up() {
        state.set_status_message(MSG_NO_WIFI, timing.status_message_ms, clock.now_ms());
        state.leave_phase(Phase::ConnectedSyncing, Phase::Disconnected);
        return SyncOutcome::NoLink;
    }

    for server in server_list(configured) {
        let synced = try_server(
            source,
            server,
            timing.sync_poll_attempts,
            timing.sync_poll_delay_ms,
            delay,
        )
        .await;

        if synced {
            let now = clock.now_ms();
            state.mark_synced(now);
            state.set_status_message(MSG_SYNCED, timing.status_message_ms, now);
            state.leave_phase(Phase::ConnectedSyncing, Phase::ConnectedSynced);
            return SyncOutcome::Synced { server };
        }
    }

    state.leave_phase(Phase::ConnectedSyncing, Phase::ConnectedNotSynced);
    state.set_status_message(MSG_FAILED, timing.status_message_ms, clock.now_ms());
    SyncOutcome::Failed
}
