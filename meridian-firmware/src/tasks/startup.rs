//! Startup screen task
//!
//! Owns the display until boot settles, then hands over to the render task.

use defmt::*;
use embassy_time::{Duration, Ticker};

use meridian_core::render::StartupScreen;
use meridian_core::state::AppState;

use crate::channels::STARTUP_DONE;
use crate::display::SharedDisplay;

/// Spinner step period
const SPINNER_INTERVAL_MS: u64 = 150;

#[embassy_executor::task]
pub async fn startup_task(state: &'static AppState, display: &'static SharedDisplay) {
    info!("Startup screen shown");

    let mut screen = StartupScreen::new();
    let mut ticker = Ticker::every(Duration::from_millis(SPINNER_INTERVAL_MS));

    while !StartupScreen::is_finished(state) {
        {
            let mut panel = display.lock().await;
            screen.draw(&mut *panel, state.phase());
        }
        ticker.next().await;
    }

    info!("Startup finished in phase {}", state.phase());
    STARTUP_DONE.signal(());
}
