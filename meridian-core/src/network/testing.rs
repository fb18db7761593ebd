//! Fakes for the network policy tests

use core::cell::Cell;
use std::string::String;
use std::vec::Vec;

use embedded_hal_async::delay::DelayNs;

use crate::traits::{LinkControl, LinkStatus, Monotonic, TimeSource};

/// Manually advanced millisecond clock
pub struct FakeClock {
    now: Cell<u64>,
}

impl FakeClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Monotonic for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Delay that advances a [`FakeClock`] instead of waiting
pub struct FakeDelay<'a> {
    clock: &'a FakeClock,
}

impl<'a> FakeDelay<'a> {
    pub fn new(clock: &'a FakeClock) -> Self {
        Self { clock }
    }
}

impl DelayNs for FakeDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.clock.advance(u64::from(ns) / 1_000_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.clock.advance(u64::from(ms));
    }
}

/// Link whose state the test sets
pub struct FakeLink {
    up: Cell<bool>,
    reconnect_result: bool,
    reconnects: usize,
}

impl FakeLink {
    pub fn up() -> Self {
        Self {
            up: Cell::new(true),
            reconnect_result: false,
            reconnects: 0,
        }
    }

    pub fn down() -> Self {
        Self {
            up: Cell::new(false),
            reconnect_result: false,
            reconnects: 0,
        }
    }

    /// Make `reconnect` bring the link back up
    pub fn reconnecting(mut self) -> Self {
        self.reconnect_result = true;
        self
    }

    pub fn set_up(&self, up: bool) {
        self.up.set(up);
    }

    pub fn reconnects(&self) -> usize {
        self.reconnects
    }
}

impl LinkStatus for FakeLink {
    fn is_link_up(&self) -> bool {
        self.up.get()
    }
}

impl LinkControl for FakeLink {
    async fn reconnect(&mut self) -> bool {
        self.reconnects += 1;
        self.up.set(self.reconnect_result);
        self.reconnect_result
    }
}

/// Time source that succeeds on one server after a number of polls
pub struct ScriptedSource {
    good: Option<(&'static str, usize)>,
    current: String,
    current_polls: usize,
    begun: Vec<String>,
    polls: usize,
}

impl ScriptedSource {
    /// Every poll fails
    pub fn never() -> Self {
        Self {
            good: None,
            current: String::new(),
            current_polls: 0,
            begun: Vec::new(),
            polls: 0,
        }
    }

    /// `server` succeeds on its `nth_poll` (1-based); others never do
    pub fn succeeding_on(server: &'static str, nth_poll: usize) -> Self {
        Self {
            good: Some((server, nth_poll)),
            ..Self::never()
        }
    }

    pub fn begun(&self) -> &[String] {
        &self.begun
    }

    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl TimeSource for ScriptedSource {
    async fn begin(&mut self, server: &str) {
        self.current = server.into();
        self.current_polls = 0;
        self.begun.push(server.into());
    }

    async fn poll(&mut self) -> bool {
        self.polls += 1;
        self.current_polls += 1;
        matches!(self.good, Some((server, nth)) if server == self.current && self.current_polls >= nth)
    }
}
