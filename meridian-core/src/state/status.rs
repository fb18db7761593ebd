//! Transient status message with lazy expiry

use heapless::String;

/// Maximum visible status message length in bytes
pub const STATUS_CAPACITY: usize = 31;

/// Status message text
pub type StatusText = String<STATUS_CAPACITY>;

/// Short text that is shown until an absolute deadline
///
/// There is no timer behind the deadline: the message is cleared the first
/// time it is read at or past `expires_at_ms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    text: StatusText,
    expires_at_ms: u64,
}

impl StatusMessage {
    /// Create an empty (inactive) message
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            expires_at_ms: 0,
        }
    }

    /// Replace the message, truncating to capacity on a char boundary
    pub fn set(&mut self, text: &str, timeout_ms: u64, now_ms: u64) {
        self.text.clear();
        for c in text.chars() {
            if self.text.push(c).is_err() {
                break;
            }
        }
        self.expires_at_ms = now_ms.saturating_add(timeout_ms);
    }

    /// Current text if still active, clearing it once expired
    pub fn active(&mut self, now_ms: u64) -> Option<&str> {
        if self.text.is_empty() {
            return None;
        }
        if now_ms >= self.expires_at_ms {
            self.text.clear();
            return None;
        }
        Some(&self.text)
    }

    /// Absolute expiry deadline of the current text
    pub fn expires_at_ms(&self) -> u64 {
        self.expires_at_ms
    }
}

impl Default for StatusMessage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_until_expiry() {
        let mut msg = StatusMessage::new();
        msg.set("Time synced", 3000, 1000);

        assert_eq!(msg.active(1000), Some("Time synced"));
        assert_eq!(msg.active(3999), Some("Time synced"));
        assert_eq!(msg.active(4000), None);
    }

    #[test]
    fn test_expired_read_clears() {
        let mut msg = StatusMessage::new();
        msg.set("Sync failed", 10, 0);
        assert_eq!(msg.active(50), None);
        // Time going "backwards" cannot revive a cleared message
        assert_eq!(msg.active(5), None);
    }

    #[test]
    fn test_truncates_to_capacity() {
        let mut msg = StatusMessage::new();
        msg.set("0123456789abcdefghijklmnopqrstuvwxyz", 1000, 0);
        assert_eq!(msg.active(0).map(str::len), Some(STATUS_CAPACITY));

        // Multi-byte chars are never split
        msg.set("ééééééééééééééééé", 1000, 0);
        let text = msg.active(0).unwrap();
        assert_eq!(text.chars().count(), 15);
    }

    #[test]
    fn test_empty_is_inactive() {
        let mut msg = StatusMessage::new();
        msg.set("", 1000, 0);
        assert_eq!(msg.active(0), None);
    }
}
