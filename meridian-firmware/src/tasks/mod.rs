//! Embassy async tasks
//!
//! Each task runs independently and polls the shared application state on
//! its own period.

pub mod button;
pub mod link;
pub mod net;
pub mod render;
pub mod startup;
pub mod sync;

pub use button::button_task;
pub use link::link_task;
pub use net::{cyw43_task, net_task};
pub use render::render_task;
pub use startup::startup_task;
pub use sync::sync_task;
