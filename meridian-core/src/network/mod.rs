//! Connectivity and time-sync policies
//!
//! Both policies are plain async functions over the collaborator traits, run
//! by the firmware's link-monitor and sync tasks on their own periods.

pub mod link;
pub mod sync;

#[cfg(test)]
pub mod testing;

pub use link::{bring_up, check_link, LinkOutcome};
pub use sync::{check_sync, server_list, should_sync, SyncOutcome, FALLBACK_SERVERS, MAX_SERVERS};
