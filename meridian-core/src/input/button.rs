//! Polled single-button gesture classifier
//!
//! Fed one raw level sample per poll, [`Button`] debounces the level and
//! classifies presses into clicks, double-clicks and long presses.
//!
//! ```text
//!  Idle --press--> Pressed --release--> Released --click window--> Idle (Click)
//!                   |   ^                   |
//!                   |   +-----press---------+
//!                   |                       second release --> Idle (DoubleClick)
//!                   +--held--> LongPress --release--> Idle (LongPressStop)
//! ```

use crate::config::ButtonTiming;

/// A classified gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// One short press, no second press within the click window
    Click,
    /// Two short presses within the click window
    DoubleClick,
    /// The first press has been held past the long-press threshold
    LongPressStart,
    /// A long press was released
    LongPressStop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Pressed { since: u64, clicks: u8 },
    Released { since: u64, clicks: u8 },
    LongPress,
}

/// Gesture state machine for one active button
#[derive(Debug)]
pub struct Button {
    timing: ButtonTiming,
    raw: bool,
    raw_since: u64,
    level: bool,
    state: State,
}

impl Button {
    pub const fn new(timing: ButtonTiming) -> Self {
        Self {
            timing,
            raw: false,
            raw_since: 0,
            level: false,
            state: State::Idle,
        }
    }

    /// Debounced level
    pub fn is_pressed(&self) -> bool {
        self.level
    }

    /// Whether a gesture is in progress
    pub fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    /// Feed one sample taken at `now_ms`
    pub fn update(&mut self, pressed: bool, now_ms: u64) -> Option<ButtonEvent> {
        if pressed != self.raw {
            self.raw = pressed;
            self.raw_since = now_ms;
        }
        if self.raw != self.level && now_ms.saturating_sub(self.raw_since) >= self.timing.debounce_ms
        {
            self.level = self.raw;
        }

        let level = self.level;
        let (next, event) = match self.state {
            State::Idle if level => (
                State::Pressed {
                    since: now_ms,
                    clicks: 0,
                },
                None,
            ),
            State::Idle => (State::Idle, None),

            State::Pressed { clicks, .. } if !level => {
                let clicks = clicks + 1;
                if clicks >= 2 {
                    (State::Idle, Some(ButtonEvent::DoubleClick))
                } else {
                    (
                        State::Released {
                            since: now_ms,
                            clicks,
                        },
                        None,
                    )
                }
            }
            State::Pressed { since, clicks: 0 }
                if now_ms.saturating_sub(since) >= self.timing.long_press_ms =>
            {
                (State::LongPress, Some(ButtonEvent::LongPressStart))
            }
            pressed @ State::Pressed { .. } => (pressed, None),

            State::Released { clicks, .. } if level => (
                State::Pressed {
                    since: now_ms,
                    clicks,
                },
                None,
            ),
            State::Released { since, .. }
                if now_ms.saturating_sub(since) >= self.timing.click_ms =>
            {
                (State::Idle, Some(ButtonEvent::Click))
            }
            released @ State::Released { .. } => (released, None),

            State::LongPress if !level => (State::Idle, Some(ButtonEvent::LongPressStop)),
            State::LongPress => (State::LongPress, None),
        };

        self.state = next;
        event
    }
}
