//! Debounced button input monitor
//!
//! Converts noisy digital input signals into a clean stream of press
//! events: a transition is confirmed only when the raw level differs
//! from the last confirmed level and the debounce interval has passed
//! since the last confirmed transition. Presses fire exactly once;
//! releases are confirmed silently.

use std::time::{Duration, Instant};

/// Minimum time between confirmed transitions on one input
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(30);

/// Sleep between scan cycles
pub const POLL_INTERVAL: Duration = Duration::from_millis(3);

/// Power-on settle delay before the first scan
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// A digital input line. Buttons are wired active-low with pull-ups:
/// low means pressed.
pub trait InputPin {
    fn is_high(&self) -> bool;
}

/// Time source, injectable for tests.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Monotonic wall-clock time source
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Per-input debounce state
struct ButtonState {
    /// Last confirmed level (high = released)
    level: bool,
    /// Instant of the last confirmed transition
    last_transition: Instant,
}

/// Debounce state machine over a fixed set of inputs.
///
/// State lives for the process lifetime; it is initialized from the
/// first read at construction and mutated only by `poll`.
pub struct InputMonitor<P: InputPin, C: Clock> {
    pins: Vec<P>,
    states: Vec<ButtonState>,
    clock: C,
    debounce: Duration,
}

impl<P: InputPin, C: Clock> InputMonitor<P, C> {
    pub fn new(pins: Vec<P>, clock: C) -> Self {
        let now = clock.now();
        let states = pins
            .iter()
            .map(|pin| ButtonState {
                level: pin.is_high(),
                last_transition: now,
            })
            .collect();

        Self {
            pins,
            states,
            clock,
            debounce: DEBOUNCE_INTERVAL,
        }
    }

    /// One scan cycle over every input.
    ///
    /// Returns the indexes of inputs whose transition to the pressed
    /// level was confirmed this cycle. Confirmed releases update the
    /// state but produce nothing (edge-triggered on press only).
    pub fn poll(&mut self) -> Vec<usize> {
        let now = self.clock.now();
        let mut pressed = Vec::new();

        for (index, pin) in self.pins.iter().enumerate() {
            let state = &mut self.states[index];
            let level = pin.is_high();

            if level != state.level && now.duration_since(state.last_transition) > self.debounce {
                state.level = level;
                state.last_transition = now;
                if !level {
                    pressed.push(index);
                }
            }
        }

        pressed
    }
}
