//! Wake-source demultiplexing and low-power suspend.
//!
//! The processor shares one interrupt vector between two wake sources: an
//! edge-triggered pin-change flag raised by the radio's interrupt line
//! (packet received) and a timer-overflow flag from a free-running counter
//! clocked by an independent low-power oscillator (periodic heartbeat, ~2 Hz,
//! still ticking while the core is halted).
//!
//! Rather than modeling the interrupt handler as separate control flow, the
//! dispatcher turns suspend/resume into a blocking call that returns the
//! demultiplexed cause. The "handler" logic becomes ordinary sequential code
//! after [`InterruptDispatcher::wait`] returns.
//!
//! Priority: the packet flag is tested first. A timer overflow pending at
//! the same instant is serviced on the next wait; the timer auto-reloads,
//! so it is delayed, never starved.

use crate::consts::HEARTBEAT_PRESET;

/// Demultiplexed cause of a wake-up.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum WakeReason {
    /// The radio's interrupt line fired: a packet is waiting in the FIFO.
    Packet,
    /// The heartbeat timer overflowed: refresh the receive window.
    Heartbeat,
}

/// Hardware window of the shared interrupt machinery.
///
/// Implementations map these onto the pin-change and timer-overflow pending
/// bits, the timer's counter register, and the halt instruction. `suspend`
/// must be a true halt that returns only once an enabled interrupt is
/// pending; on hardware the handler has already run to completion by then,
/// so the flags read below reflect its side effects atomically.
pub trait IrqFlags {
    /// Whether the pin-change (packet received) flag is pending.
    fn packet_pending(&mut self) -> bool;

    /// Clears the pin-change flag.
    fn clear_packet(&mut self);

    /// Whether the timer-overflow flag is pending.
    fn timer_pending(&mut self) -> bool;

    /// Clears the timer-overflow flag.
    fn clear_timer(&mut self);

    /// Reloads the free-running counter to `preset`.
    ///
    /// The preset is a calibrated offset, not zero; reloading to zero
    /// stretches the heartbeat period.
    fn reload_timer(&mut self, preset: u16);

    /// Halts instruction execution until an enabled interrupt is pending.
    fn suspend(&mut self);
}

/// Demultiplexes the shared interrupt line into [`WakeReason`]s.
#[derive(Debug)]
pub struct InterruptDispatcher<F: IrqFlags> {
    flags: F,
    preset: u16,
}

impl<F: IrqFlags> InterruptDispatcher<F> {
    /// Wraps the interrupt hardware with the deployment heartbeat preset.
    pub fn new(flags: F) -> Self {
        Self::with_preset(flags, HEARTBEAT_PRESET)
    }

    /// Wraps the interrupt hardware with a caller-calibrated timer preset.
    pub fn with_preset(flags: F, preset: u16) -> Self {
        Self { flags, preset }
    }

    /// Blocks in the low-power halt until a wake source fires, then returns
    /// the demultiplexed cause.
    ///
    /// The packet flag wins when both are pending; the timer flag is left
    /// set and serviced on the next call. On a heartbeat wake the counter
    /// is reloaded to the preset before the flag is cleared.
    pub fn wait(&mut self) -> WakeReason {
        loop {
            if self.flags.packet_pending() {
                self.flags.clear_packet();
                return WakeReason::Packet;
            }
            if self.flags.timer_pending() {
                self.flags.reload_timer(self.preset);
                self.flags.clear_timer();
                return WakeReason::Heartbeat;
            }
            self.flags.suspend();
        }
    }
}
