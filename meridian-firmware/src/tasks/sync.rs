//! Time-sync task

use defmt::*;
use embassy_net::Stack;
use embassy_time::{Delay, Duration, Ticker};
use heapless::String;

use meridian_core::config::MAX_SERVER_LEN;
use meridian_core::network::{check_sync, SyncOutcome};
use meridian_core::state::AppState;

use crate::clock::{SystemClock, Uptime};
use crate::ntp::NtpSource;
use crate::wifi::StackStatus;

#[embassy_executor::task]
pub async fn sync_task(
    state: &'static AppState,
    stack: Stack<'static>,
    clock: &'static SystemClock,
    server: String<MAX_SERVER_LEN>,
) {
    info!("Sync task started");

    let link = StackStatus(stack);
    let mut source = NtpSource::new(stack, clock);
    let mut delay = Delay;
    let mut ticker = Ticker::every(Duration::from_millis(state.timing().sync_check_ms));

    loop {
        ticker.next().await;

        match check_sync(state, &server, &link, &mut source, &mut delay, &Uptime).await {
            SyncOutcome::Idle => {}
            SyncOutcome::Synced { server } => info!("Time synced from {}", server),
            SyncOutcome::NoLink => warn!("Sync skipped, WiFi down"),
            SyncOutcome::Failed => warn!("Time sync failed on every server"),
        }
    }
}
