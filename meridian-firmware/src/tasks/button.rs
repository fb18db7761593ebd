//! Button task
//!
//! Samples the button every poll period and turns gestures into actions:
//! click requests a time sync, double-click cycles the face, long press arms
//! the configuration reset and a double-click while armed performs it.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Instant, Ticker};

use meridian_core::config::{ButtonTiming, ClockConfig};
use meridian_core::input::{ButtonActions, InputCoordinator};
use meridian_core::state::AppState;

use crate::channels::FACE_CHANGED;
use crate::config::ConfigPersistence;

/// Actions requested during one poll, carried out after it
struct Requests {
    state: &'static AppState,
    reset: bool,
    next_face: bool,
}

impl Requests {
    fn new(state: &'static AppState) -> Self {
        Self {
            state,
            reset: false,
            next_face: false,
        }
    }
}

impl ButtonActions for Requests {
    fn confirm_reset(&mut self) {
        self.reset = true;
    }

    fn secondary(&mut self) {
        self.next_face = true;
    }

    fn click(&mut self) {
        self.state.request_sync();
    }
}

#[embassy_executor::task]
pub async fn button_task(
    state: &'static AppState,
    button: Input<'static>,
    mut persistence: ConfigPersistence<'static>,
    mut config: ClockConfig,
) {
    info!("Button task started");

    let timing = ButtonTiming::DEFAULT;
    let mut coordinator = InputCoordinator::new(timing);
    let mut ticker = Ticker::every(Duration::from_millis(timing.poll_ms));

    loop {
        ticker.next().await;

        let mut requests = Requests::new(state);
        // Active low with pull-up
        let pressed = button.is_low();
        if let Some(event) =
            coordinator.poll(pressed, Instant::now().as_millis(), state, &mut requests)
        {
            debug!("Button: {}", event);
        }

        if requests.reset {
            factory_reset(&mut persistence).await;
        }

        if requests.next_face {
            config.face = config.face.next();
            FACE_CHANGED.signal(config.face);
            match persistence.save(&config).await {
                Ok(()) => info!("Face {} saved", config.face.as_str()),
                Err(e) => warn!("Failed to save face: {:?}", e),
            }
        }
    }
}

/// Erase the stored configuration and restart
async fn factory_reset(persistence: &mut ConfigPersistence<'static>) {
    warn!("Configuration reset confirmed");
    if let Err(e) = persistence.erase().await {
        error!("Failed to erase configuration: {:?}", e);
    }
    cortex_m::peripheral::SCB::sys_reset();
}
