//! Network collaborator traits
//!
//! The core never speaks WiFi or NTP itself. It only needs to know whether the
//! link is up, to ask for a reconnect, and to drive a time source that sets
//! the wall clock as a side effect.

/// Read-only link state
pub trait LinkStatus {
    /// Whether the network link is currently usable
    fn is_link_up(&self) -> bool;
}

/// Link that can be asked to rejoin its network
pub trait LinkControl: LinkStatus {
    /// Try to rejoin the configured network
    ///
    /// Returns whether the link came up. Implementations must bound the time
    /// spent here.
    fn reconnect(&mut self) -> impl core::future::Future<Output = bool>;
}

/// Time synchronisation collaborator
///
/// `begin` points the source at a server; each `poll` checks (and if needed
/// performs) one exchange, returning `true` once the wall clock has been set
/// from that server.
pub trait TimeSource {
    /// Start synchronising against `server`
    fn begin(&mut self, server: &str) -> impl core::future::Future<Output = ()>;

    /// Whether the clock has been set from the current server
    fn poll(&mut self) -> impl core::future::Future<Output = bool>;
}
