//! Polled push-button handling.
//!
//! The button is sampled at a fixed interval by the caller.  A press is
//! reported once, on the first sample that sees the button down; holding it
//! produces nothing further until a sample sees it released again.  The
//! sampling interval does the actual debouncing: it's chosen longer than the
//! contact bounce.

/// Which input level means "pressed".
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Pressing pulls the pin low.
    ActiveLow,
    /// Pressing drives the pin high.
    ActiveHigh,
}

impl Polarity {
    #[inline]
    pub fn is_pressed(self, level_high: bool) -> bool {
        match self {
            Polarity::ActiveLow => !level_high,
            Polarity::ActiveHigh => level_high,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Released,
    Pressed,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    Pressed,
    Released,
}

/// Two-state press detector.
pub struct Debounce {
    state: State,
    polarity: Polarity,
}

impl Debounce {
    pub const fn new(polarity: Polarity) -> Debounce {
        Debounce { state: State::Released, polarity }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Feeds one sample of the input pin (`true` for logic high).  Returns an
    /// event on the samples where the state changes.
    pub fn sample(&mut self, level_high: bool) -> Option<Event> {
        let pressed = self.polarity.is_pressed(level_high);
        match (self.state, pressed) {
            (State::Released, true) => {
                self.state = State::Pressed;
                Some(Event::Pressed)
            }
            (State::Pressed, false) => {
                self.state = State::Released;
                Some(Event::Released)
            }
            _ => None,
        }
    }
}
