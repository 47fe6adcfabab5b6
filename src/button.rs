//! Debounced pushbutton edge detection for the transmit role.
//!
//! The button is sampled on a fixed ~50 ms poll interval with a two-sample
//! history: a new level counts as steady only after it has been seen on two
//! consecutive samples, and action fires only on the falling transition
//! into the steady low state. Contact bounce shorter than one poll interval
//! therefore never produces an edge.

use embedded_hal::digital::InputPin;

/// Two-sample majority filter over a pulled-up pushbutton pin.
///
/// The released level is high. Pin read errors are treated as released,
/// which can only delay an edge, never invent one.
#[derive(Debug)]
pub struct DebouncedButton<BTN: InputPin> {
    /// The button input pin.
    pub pin: BTN,
    tail: bool,
    last: bool,
}

impl<BTN: InputPin> DebouncedButton<BTN> {
    /// Wraps the input pin with the history primed to released.
    pub fn new(pin: BTN) -> Self {
        Self {
            pin,
            tail: true,
            last: true,
        }
    }

    /// Takes one sample. Call once per poll interval.
    ///
    /// Returns `true` exactly once per debounced press: when the current
    /// and previous samples are both low and the sample before them was
    /// high.
    pub fn sample(&mut self) -> bool {
        let current = self.pin.is_high().unwrap_or(true);
        let pressed = self.tail && !self.last && !current;
        self.tail = self.last;
        self.last = current;
        pressed
    }
}
