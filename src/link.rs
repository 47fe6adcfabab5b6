//! The link state machine: receive cycles and transmit bursts.
//!
//! This module owns the repeating unit of work. In the receive role one
//! cycle is arm -> suspend -> drain-on-interrupt -> decode -> maybe actuate,
//! looping forever and terminal only on power loss. No cycle state survives
//! past decode; each cycle is independent of its predecessors except for the
//! output latch.
//!
//! ```text
//! Idle -> Armed -> Suspended -> Draining -> Decoding -> Idle
//!           ^          |
//!           +----------+  (heartbeat wake, or ambiguous frame discarded)
//! ```
//!
//! In the transmit role there is no interrupt-driven receive at all: a
//! debounced button press toggles the latch and fires a fixed-count burst
//! of sentinel payloads, with no acknowledgement and no backoff.
//! Reliability is repetition redundancy at the physical layer,
//! compensating for the disabled auto-retransmit and auto-ack features.
//!
//! Both role entry points hang off the one [`LinkDriver`]; the configured
//! [`Role`] decides which of them is meaningful on a given device.

use crate::bus::BusPort;
use crate::button::DebouncedButton;
use crate::config::{LinkConfig, Role};
use crate::consts::{BURST_REPEAT, BUTTON_POLL_MS, CHAR_OFF, CHAR_ON, FIFO_RX_EMPTY};
use crate::decode::{Command, decode};
use crate::radio::Nrf24;
use crate::relay::{Leg, RelayDriver};
use crate::wake::{InterruptDispatcher, IrqFlags, WakeReason};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

#[cfg(not(feature = "std"))]
use crate::consts::MAX_PAYLOAD_LEN_USIZE;

#[cfg(not(feature = "std"))]
use heapless::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

/// Where the state machine currently is, observable between calls.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum LinkState {
    /// Between cycles. The listen window is closed.
    #[default]
    Idle,
    /// The enable line is high; the radio's listen window is open.
    Armed,
    /// The processor is halted awaiting a wake interrupt.
    Suspended,
    /// A packet wake fired; the FIFO is being drained over the bus.
    Draining,
    /// The drained frame is being counted against the threshold.
    Decoding,
}

/// Result of one receive cycle.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum CycleOutcome {
    /// A frame reached the threshold; the output was driven.
    Actuated(Command),
    /// A frame arrived but was ambiguous or the FIFO was empty; nothing was
    /// driven and the next cycle re-arms immediately.
    Discarded,
    /// The heartbeat fired with no packet; the receive window is refreshed.
    Rearmed,
}

/// The actuation seam between decode outcomes and hardware.
///
/// The receive strategy calls exactly one of these per accepted frame.
/// [`RelayOutput`] is the production implementation; tests substitute a
/// recorder.
pub trait CommandOutput {
    /// Drive the commanded-on state (latch set).
    fn set_on(&mut self);

    /// Drive the commanded-off state (latch cleared).
    fn set_off(&mut self);
}

/// Production [`CommandOutput`]: the relay plus the indicator line.
///
/// On drives leg B and raises the indicator; off drives leg A and lowers
/// it. The indicator reflects last-known-good command state, not health.
#[derive(Debug)]
pub struct RelayOutput<CP, CN, CEN, LA, LB, D, LED>
where
    CP: OutputPin,
    CN: OutputPin,
    CEN: OutputPin,
    LA: OutputPin,
    LB: OutputPin,
    D: DelayNs,
    LED: OutputPin,
{
    /// The capacitor-boost relay driver.
    pub relay: RelayDriver<CP, CN, CEN, LA, LB, D>,
    led: LED,
}

impl<CP, CN, CEN, LA, LB, D, LED> RelayOutput<CP, CN, CEN, LA, LB, D, LED>
where
    CP: OutputPin,
    CN: OutputPin,
    CEN: OutputPin,
    LA: OutputPin,
    LB: OutputPin,
    D: DelayNs,
    LED: OutputPin,
{
    /// Pairs a relay driver with the indicator pin.
    pub fn new(relay: RelayDriver<CP, CN, CEN, LA, LB, D>, led: LED) -> Self {
        Self { relay, led }
    }
}

impl<CP, CN, CEN, LA, LB, D, LED> CommandOutput for RelayOutput<CP, CN, CEN, LA, LB, D, LED>
where
    CP: OutputPin,
    CN: OutputPin,
    CEN: OutputPin,
    LA: OutputPin,
    LB: OutputPin,
    D: DelayNs,
    LED: OutputPin,
{
    fn set_on(&mut self) {
        let _ = self.led.set_high();
        self.relay.actuate(Leg::B);
    }

    fn set_off(&mut self) {
        let _ = self.led.set_low();
        self.relay.actuate(Leg::A);
    }
}

/// The interrupt-driven receive/transmit state machine.
///
/// Owns the radio, the validated configuration, the receive buffer, and the
/// output latch. Constructed once at process start; there is exactly one
/// instance for the device's power-on life, so the shared mutable state of
/// the original firmware becomes plain fields here.
#[derive(Debug)]
pub struct LinkDriver<P, CSN, CE, D>
where
    P: BusPort,
    CSN: OutputPin,
    CE: OutputPin,
    D: DelayNs,
{
    /// Where the state machine currently is.
    pub state: LinkState,
    radio: Nrf24<P, CSN, CE, D>,
    cfg: LinkConfig,
    latch: bool,
    /// Frame buffer, overwritten by every drain and read only by the decode
    /// immediately following.
    #[cfg(not(feature = "std"))]
    buf: Vec<u8, MAX_PAYLOAD_LEN_USIZE>,
    /// Frame buffer, overwritten by every drain and read only by the decode
    /// immediately following.
    #[cfg(feature = "std")]
    buf: Vec<u8>,
}

impl<P, CSN, CE, D> LinkDriver<P, CSN, CE, D>
where
    P: BusPort,
    CSN: OutputPin,
    CE: OutputPin,
    D: DelayNs,
{
    /// Builds the state machine around a radio and a validated config.
    ///
    /// `cfg` comes from [`LinkConfig::new`], so the buffer resize below
    /// cannot fail. No bus traffic is generated until
    /// [`begin`](Self::begin).
    pub fn new(radio: Nrf24<P, CSN, CE, D>, cfg: LinkConfig) -> Self {
        let mut buf = Vec::new();
        #[cfg(not(feature = "std"))]
        let _ = buf.resize(cfg.payload_len as usize, 0);
        #[cfg(feature = "std")]
        buf.resize(cfg.payload_len as usize, 0);
        Self {
            state: LinkState::Idle,
            radio,
            cfg,
            latch: false,
            buf,
        }
    }

    /// Runs the one-time radio bring-up sequence for the configured role.
    pub fn begin(&mut self) {
        self.radio.configure(&self.cfg);
        self.state = LinkState::Idle;
    }

    /// The last commanded output state.
    pub fn latch(&self) -> bool {
        self.latch
    }

    /// The deployment configuration this driver was built with.
    pub fn config(&self) -> &LinkConfig {
        &self.cfg
    }

    /// Borrows the radio, e.g. to run the advisory liveness guard before
    /// [`begin`](Self::begin).
    pub fn radio(&mut self) -> &mut Nrf24<P, CSN, CE, D> {
        &mut self.radio
    }

    /// Runs one receive cycle: arm, suspend, and service whichever wake
    /// source fires (receive role).
    ///
    /// On a packet wake the listen window closes, the FIFO status is
    /// checked, and if a frame is present exactly `payload_len` bytes are
    /// drained before the interrupt line is re-armed. An accepted decode
    /// drives `output` and the latch; an ambiguous frame is discarded with
    /// no actuation, and the caller's loop re-arms immediately. A heartbeat
    /// wake refreshes the listen window, recovering from any missed packet
    /// interrupt.
    pub fn run_cycle<F, O>(
        &mut self,
        dispatcher: &mut InterruptDispatcher<F>,
        output: &mut O,
    ) -> CycleOutcome
    where
        F: IrqFlags,
        O: CommandOutput,
    {
        debug_assert_eq!(self.cfg.role, Role::Receiver);

        self.state = LinkState::Armed;
        self.radio.listen();

        self.state = LinkState::Suspended;
        match dispatcher.wait() {
            WakeReason::Heartbeat => {
                self.state = LinkState::Idle;
                CycleOutcome::Rearmed
            }
            WakeReason::Packet => {
                self.state = LinkState::Draining;
                self.radio.standby();
                let have_frame = self.radio.read_fifo_status() & FIFO_RX_EMPTY == 0;
                if have_frame {
                    self.radio.read_payload(&mut self.buf);
                }
                self.radio.clear_irq();
                if !have_frame {
                    self.state = LinkState::Idle;
                    return CycleOutcome::Discarded;
                }

                self.state = LinkState::Decoding;
                let outcome = match decode(&self.buf, self.cfg.threshold) {
                    Some(Command::On) => {
                        #[cfg(feature = "log")]
                        log::debug!("accepted frame: on");
                        self.latch = true;
                        output.set_on();
                        CycleOutcome::Actuated(Command::On)
                    }
                    Some(Command::Off) => {
                        #[cfg(feature = "log")]
                        log::debug!("accepted frame: off");
                        self.latch = false;
                        output.set_off();
                        CycleOutcome::Actuated(Command::Off)
                    }
                    None => {
                        #[cfg(feature = "log")]
                        log::trace!("ambiguous frame discarded");
                        CycleOutcome::Discarded
                    }
                };
                self.state = LinkState::Idle;
                outcome
            }
        }
    }

    /// Takes one button poll step (transmit role). Call in a tight loop;
    /// each call waits out the 50 ms poll interval internally.
    ///
    /// On a debounced falling edge the latch toggles, the indicator
    /// follows it, and the matching sentinel is sent [`BURST_REPEAT`]
    /// times, each repetition one payload load plus one enable pulse.
    /// Returns whether a burst was sent.
    pub fn poll_transmit<BTN, LED>(
        &mut self,
        button: &mut DebouncedButton<BTN>,
        led: &mut LED,
    ) -> bool
    where
        BTN: InputPin,
        LED: OutputPin,
    {
        debug_assert_eq!(self.cfg.role, Role::Transmitter);

        self.radio.idle_ms(BUTTON_POLL_MS);
        if !button.sample() {
            return false;
        }

        self.latch = !self.latch;
        let sentinel = if self.latch {
            let _ = led.set_high();
            CHAR_ON
        } else {
            let _ = led.set_low();
            CHAR_OFF
        };
        for _ in 0..BURST_REPEAT {
            self.radio.load_payload(sentinel, self.cfg.payload_len);
            self.radio.pulse_enable();
        }
        true
    }
}
