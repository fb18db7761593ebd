//! Inter-task signals
//!
//! The shared `AppState` is handed to each task at spawn. These signals carry
//! the few events that have exactly one consumer.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use meridian_core::config::FaceKind;

/// The startup screen has finished and released the display
pub static STARTUP_DONE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// The button selected a new face (consumed by the render task)
pub static FACE_CHANGED: Signal<CriticalSectionRawMutex, FaceKind> = Signal::new();
