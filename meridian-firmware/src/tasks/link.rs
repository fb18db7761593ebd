//! Link monitor task
//!
//! Joins the network at boot, then checks the link every few seconds and
//! rejoins with back-off when it drops.

use defmt::*;
use embassy_time::{Duration, Ticker};

use meridian_core::network::{bring_up, check_link, LinkOutcome};
use meridian_core::state::AppState;
use meridian_core::traits::Monotonic;

use crate::clock::Uptime;
use crate::wifi::WifiLink;

#[embassy_executor::task]
pub async fn link_task(state: &'static AppState, mut link: WifiLink, configured: bool) {
    info!("Link task started");

    if bring_up(state, &mut link, configured, Uptime.now_ms()).await {
        info!("Network up");
    } else if configured {
        warn!("Could not join WiFi at boot, will retry");
    } else {
        warn!("No WiFi configured");
    }
    state.set_initialised();

    let mut ticker = Ticker::every(Duration::from_millis(state.timing().link_check_ms));
    loop {
        ticker.next().await;

        match check_link(state, &mut link, Uptime.now_ms()).await {
            LinkOutcome::Restored => info!("WiFi link restored"),
            LinkOutcome::Reconnected(true) => info!("WiFi reconnected"),
            LinkOutcome::Reconnected(false) => warn!("WiFi reconnect failed"),
            LinkOutcome::Down => debug!("WiFi down, waiting for back-off"),
            LinkOutcome::Up | LinkOutcome::Suspended => {}
        }
    }
}
