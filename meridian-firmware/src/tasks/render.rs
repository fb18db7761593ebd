//! Render task
//!
//! Draws the active face once per blink interval after the startup screen
//! has finished.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use meridian_core::config::FaceKind;
use meridian_core::render::Renderer;
use meridian_core::state::AppState;

use crate::channels::{FACE_CHANGED, STARTUP_DONE};
use crate::clock::SystemClock;
use crate::display::SharedDisplay;

#[embassy_executor::task]
pub async fn render_task(
    state: &'static AppState,
    display: &'static SharedDisplay,
    clock: &'static SystemClock,
    face: FaceKind,
) {
    STARTUP_DONE.wait().await;
    info!("Render task started with face {}", face.as_str());

    let mut renderer = Renderer::new(face);
    let mut ticker = Ticker::every(Duration::from_millis(
        state.timing().blink_interval_ms,
    ));

    loop {
        if let Some(kind) = FACE_CHANGED.try_take() {
            info!("Switching to face {}", kind.as_str());
            renderer.set_face(kind);
        }

        let now_ms = Instant::now().as_millis();
        let stats = renderer.tick(display, state, clock, now_ms).await;
        if stats.dropped > 0 {
            warn!("Hand diff overflow: {} pixels not tracked", stats.dropped);
        }
        trace!("Frame drawn={} erased={}", stats.drawn, stats.erased);

        ticker.next().await;
    }
}
