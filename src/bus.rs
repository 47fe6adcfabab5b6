//! Byte-level synchronous bus transfer primitive.
//!
//! The radio hangs off a full-duplex synchronous serial port: writing a byte
//! into the shift register clocks a byte back in at the same time. The
//! hardware exposes exactly two things this module cares about, a buffer
//! register and a completion flag, abstracted here as the [`BusPort`] trait
//! so the driver stays portable and host-testable.
//!
//! [`SpiBus::transfer`] is the one non-reentrant primitive in the system.
//! The completion flag and buffer register are shared mutable state, and an
//! interrupt handler landing between "start transfer" and "observe
//! completion" could intermix a second transfer's bytes with the first's.
//! The whole window therefore runs inside `critical_section::with`; the
//! prior interrupt-enable state is restored on return. Every layer above
//! may treat each call as atomic but may be interrupted between calls.
//!
//! There is no timeout. A wedged port blocks forever.

use core::convert::Infallible;
use nb::block;

/// Hardware window of the synchronous serial port.
///
/// Implementations map `start` onto the buffer-register write that launches
/// a clocked exchange, and `poll` onto the completion flag plus the
/// buffer-register read that yields the simultaneously shifted-in byte.
///
/// For host tests, implement this with a mock that completes after a fixed
/// number of polls to keep timing-free tests deterministic.
pub trait BusPort {
    /// Load a byte into the shift register and start the clocked exchange.
    fn start(&mut self, byte: u8);

    /// Poll the completion flag.
    ///
    /// Returns [`nb::Error::WouldBlock`] while the exchange is in flight,
    /// and the shifted-in byte once the hardware reports completion.
    fn poll(&mut self) -> nb::Result<u8, Infallible>;
}

/// Blocking byte-transfer primitive over a [`BusPort`].
#[derive(Debug)]
pub struct SpiBus<P: BusPort> {
    port: P,
}

impl<P: BusPort> SpiBus<P> {
    /// Wraps a hardware port. No bus traffic is generated.
    pub fn new(port: P) -> Self {
        Self { port }
    }

    /// Borrows the underlying hardware port, e.g. for inspection in tests.
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Exchanges one byte with the radio and returns the byte shifted in.
    ///
    /// Busy-polls the completion flag with interrupts masked for the whole
    /// window; callers may be interrupted between calls, never within one.
    /// Chip-select framing is the caller's responsibility.
    pub fn transfer(&mut self, byte: u8) -> u8 {
        critical_section::with(|_| {
            self.port.start(byte);
            match block!(self.port.poll()) {
                Ok(read) => read,
                Err(never) => match never {},
            }
        })
    }
}
