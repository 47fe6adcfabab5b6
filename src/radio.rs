//! Addressed register protocol and bring-up sequence for the transceiver.
//!
//! Every operation on the radio is a framed sequence: chip-select low, one
//! command byte (opcode ORed with a register address), one or more data
//! bytes, chip-select high. The active-low select bracket is itself the
//! mutual-exclusion mechanism; nothing here may be called concurrently with
//! itself, which the single-threaded cooperative model guarantees by
//! construction.
//!
//! Multi-byte fields follow the wire convention of least-significant-byte
//! last, so the 5-byte address and payload loops iterate in reverse.
//!
//! [`Nrf24::configure`] programs the fixed bring-up sequence. The order is
//! load-bearing: enabling auto-acknowledgement forces the CRC feature on,
//! so `CONFIG` must be rewritten after `EN_AA` is zeroed for the CRC
//! disable to stick. No step returns a status to check; a misprogrammed
//! radio manifests only as silent non-reception downstream.

use crate::bus::{BusPort, SpiBus};
use crate::config::{LinkConfig, Role};
use crate::consts::{
    AW_5_BYTES, CE_PULSE_US, CONFIG_PRIM_RX, CONFIG_PWR_UP, CSN_SETTLE_MS, GUARD_PROBE,
    GUARD_RETRY_MS, GUARD_SETTLE_MS, NOP, POWER_SETTLE_MS, REG_CONFIG, REG_EN_AA, REG_FEATURE,
    REG_FIFO_STATUS, REG_RF_CH, REG_RF_SETUP, REG_RX_ADDR_P0, REG_RX_PW_P0, REG_SETUP_AW,
    REG_SETUP_RETR, REG_STATUS, REG_TX_ADDR, RF_SETUP_1MBPS_0DBM, R_REGISTER, R_RX_PAYLOAD,
    STATUS_CLEAR_IRQ, W_REGISTER, W_TX_PAYLOAD,
};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Register-level interface to an nRF24L01+-class transceiver.
///
/// Owns the byte-transfer bus, the chip-select and enable output pins, and
/// a delay provider for the bring-up and pulse timings.
///
/// ## Type Parameters
///
/// - `P`: the [`BusPort`] hardware window behind the byte primitive
/// - `CSN`: active-low chip-select output pin
/// - `CE`: enable output pin (opens the listen window in receive mode,
///   launches a burst element in transmit mode)
/// - `D`: delay provider implementing [`embedded_hal::delay::DelayNs`]
#[derive(Debug)]
pub struct Nrf24<P, CSN, CE, D>
where
    P: BusPort,
    CSN: OutputPin,
    CE: OutputPin,
    D: DelayNs,
{
    /// The byte-transfer bus over the hardware port.
    pub bus: SpiBus<P>,
    /// Active-low chip-select pin.
    pub csn: CSN,
    /// Enable pin.
    pub ce: CE,
    delay: D,
}

impl<P, CSN, CE, D> Nrf24<P, CSN, CE, D>
where
    P: BusPort,
    CSN: OutputPin,
    CE: OutputPin,
    D: DelayNs,
{
    /// Wraps the bus port and control pins. No bus traffic is generated;
    /// the pins keep their prior levels until [`configure`](Self::configure)
    /// parks them.
    pub fn new(port: P, csn: CSN, ce: CE, delay: D) -> Self {
        Self {
            bus: SpiBus::new(port),
            csn,
            ce,
            delay,
        }
    }

    fn select(&mut self) {
        let _ = self.csn.set_low();
    }

    fn deselect(&mut self) {
        let _ = self.csn.set_high();
    }

    /// Writes one single-byte register.
    pub fn write_register(&mut self, reg: u8, value: u8) {
        self.select();
        let _ = self.bus.transfer(W_REGISTER | reg);
        let _ = self.bus.transfer(value);
        self.deselect();
    }

    /// Writes a 5-byte address register, least significant byte last.
    pub fn write_address(&mut self, reg: u8, address: &[u8; 5]) {
        self.select();
        let _ = self.bus.transfer(W_REGISTER | reg);
        for &byte in address.iter().rev() {
            let _ = self.bus.transfer(byte);
        }
        self.deselect();
    }

    /// Reads one single-byte register.
    pub fn read_register(&mut self, reg: u8) -> u8 {
        self.select();
        let _ = self.bus.transfer(R_REGISTER | reg);
        let value = self.bus.transfer(NOP);
        self.deselect();
        value
    }

    /// Reads the FIFO status register. Bit 0 set means the RX FIFO is empty.
    pub fn read_fifo_status(&mut self) -> u8 {
        self.read_register(REG_FIFO_STATUS)
    }

    /// Clears every pending interrupt flag, re-arming the interrupt line.
    pub fn clear_irq(&mut self) {
        self.write_register(REG_STATUS, STATUS_CLEAR_IRQ);
    }

    /// Drains the top RX FIFO entry into `frame`, reverse byte order per the
    /// wire convention. `frame` must be exactly the configured payload width.
    pub fn read_payload(&mut self, frame: &mut [u8]) {
        self.select();
        let _ = self.bus.transfer(R_RX_PAYLOAD);
        for index in (0..frame.len()).rev() {
            frame[index] = self.bus.transfer(NOP);
        }
        self.deselect();
    }

    /// Loads one payload of `len` repetitions of `byte` into the TX FIFO.
    ///
    /// The frame is a single sentinel repeated to the configured width, so
    /// the reverse iteration of the wire convention degenerates to a count.
    pub fn load_payload(&mut self, byte: u8, len: u8) {
        self.select();
        let _ = self.bus.transfer(W_TX_PAYLOAD);
        for _ in 0..len {
            let _ = self.bus.transfer(byte);
        }
        self.deselect();
    }

    /// Raises the enable line. In receive mode this opens the listen window.
    pub fn listen(&mut self) {
        let _ = self.ce.set_high();
    }

    /// Drops the enable line, closing the listen window.
    pub fn standby(&mut self) {
        let _ = self.ce.set_low();
    }

    /// Pulses the enable line to launch one queued payload (transmit mode).
    pub fn pulse_enable(&mut self) {
        let _ = self.ce.set_high();
        self.delay.delay_us(CE_PULSE_US);
        let _ = self.ce.set_low();
    }

    /// One liveness probe: writes a disposable value into the unused feature
    /// register and reads it back.
    pub fn ping(&mut self) -> bool {
        self.write_register(REG_FEATURE, GUARD_PROBE);
        self.read_register(REG_FEATURE) == GUARD_PROBE
    }

    /// Advisory liveness guard for a radio coming out of a brown-out.
    ///
    /// Settles, then retries [`ping`](Self::ping) with a fixed backoff until
    /// the probe value reads back. Unbounded: a dead radio blocks here
    /// forever, which is the accepted failure mode. Hardened deployments may
    /// skip this entirely.
    pub fn guard(&mut self) {
        self.delay.delay_ms(GUARD_SETTLE_MS);
        while !self.ping() {
            self.delay.delay_ms(GUARD_RETRY_MS);
        }
    }

    /// Programs the radio into its fixed link mode.
    ///
    /// Runs once before the state machine starts. The sequence and its
    /// ordering come from the transceiver's documented side effects:
    ///
    /// 1. Enable line low, ≥1 ms, chip-select parked high, ≥2 ms breathing
    ///    time.
    /// 2. `CONFIG`: power-up plus the role's mode bit.
    /// 3. `EN_AA` zeroed. Must precede the `CONFIG` rewrite, because
    ///    auto-ack forces CRC on.
    /// 4. `CONFIG` rewritten; CRC is now genuinely disabled.
    /// 5. `RF_CH`: fixed channel.
    /// 6. `SETUP_RETR` zeroed: no auto-retransmit.
    /// 7. `SETUP_AW`: 5-byte addresses.
    /// 8. `RF_SETUP`: 1 Mbps, 0 dBm.
    /// 9. `RX_PW_P0`: the configured payload width.
    /// 10. The rendezvous address, into `TX_ADDR` or `RX_ADDR_P0` depending
    ///     on role. Same bytes either way; role decides the register.
    pub fn configure(&mut self, cfg: &LinkConfig) {
        self.standby();
        self.delay.delay_ms(POWER_SETTLE_MS);
        self.deselect();
        self.delay.delay_ms(CSN_SETTLE_MS);

        let mode = match cfg.role {
            Role::Transmitter => CONFIG_PWR_UP,
            Role::Receiver => CONFIG_PWR_UP | CONFIG_PRIM_RX,
        };
        self.write_register(REG_CONFIG, mode);
        self.write_register(REG_EN_AA, 0x00);
        // Auto-ack forced CRC on; now that EN_AA is clear this write sticks.
        self.write_register(REG_CONFIG, mode);
        self.write_register(REG_RF_CH, cfg.channel);
        self.write_register(REG_SETUP_RETR, 0x00);
        self.write_register(REG_SETUP_AW, AW_5_BYTES);
        self.write_register(REG_RF_SETUP, RF_SETUP_1MBPS_0DBM);
        self.write_register(REG_RX_PW_P0, cfg.payload_len);
        match cfg.role {
            Role::Transmitter => self.write_address(REG_TX_ADDR, &cfg.address),
            Role::Receiver => self.write_address(REG_RX_ADDR_P0, &cfg.address),
        }
    }

    /// Waits between polls of the transmit-role pushbutton.
    pub(crate) fn idle_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use std::collections::VecDeque;

    /// Records every command/data byte and replays scripted reply bytes.
    struct ScriptPort {
        sent: Vec<u8>,
        replies: VecDeque<u8>,
    }

    impl ScriptPort {
        fn new(replies: &[u8]) -> Self {
            Self {
                sent: Vec::new(),
                replies: replies.iter().copied().collect(),
            }
        }
    }

    impl BusPort for ScriptPort {
        fn start(&mut self, byte: u8) {
            self.sent.push(byte);
        }

        fn poll(&mut self) -> nb::Result<u8, core::convert::Infallible> {
            Ok(self.replies.pop_front().unwrap_or(0x00))
        }
    }

    fn framed(frames: usize) -> Vec<PinTransaction> {
        let mut expected = Vec::new();
        for _ in 0..frames {
            expected.push(PinTransaction::set(PinState::Low));
            expected.push(PinTransaction::set(PinState::High));
        }
        expected
    }

    #[test]
    fn test_write_register_frames_command_and_value() {
        let csn = PinMock::new(&framed(1));
        let ce = PinMock::new(&[]);
        let mut radio = Nrf24::new(ScriptPort::new(&[]), csn, ce, NoopDelay);

        radio.write_register(REG_RF_CH, 0x02);
        assert_eq!(radio.bus.port().sent, vec![0x25, 0x02]);
        radio.csn.done();
        radio.ce.done();
    }

    #[test]
    fn test_address_bytes_go_out_in_reverse() {
        let csn = PinMock::new(&framed(1));
        let ce = PinMock::new(&[]);
        let mut radio = Nrf24::new(ScriptPort::new(&[]), csn, ce, NoopDelay);

        radio.write_address(REG_RX_ADDR_P0, b"test1");
        assert_eq!(radio.bus.port().sent, vec![0x2A, b'1', b't', b's', b'e', b't']);
        radio.csn.done();
        radio.ce.done();
    }

    #[test]
    fn test_payload_drain_fills_buffer_in_reverse() {
        let csn = PinMock::new(&framed(1));
        let ce = PinMock::new(&[]);
        let replies = [0x00, b'A', b'B', b'C'];
        let mut radio = Nrf24::new(ScriptPort::new(&replies), csn, ce, NoopDelay);

        let mut frame = [0u8; 3];
        radio.read_payload(&mut frame);
        assert_eq!(radio.bus.port().sent, vec![0x61, 0xFF, 0xFF, 0xFF]);
        assert_eq!(frame, [b'C', b'B', b'A']);
        radio.csn.done();
        radio.ce.done();
    }

    #[test]
    fn test_receiver_bringup_matches_wire_table() {
        let cfg = LinkConfig::new(Role::Receiver, 1, 1).unwrap();
        // 8 register frames + 1 address frame, plus the parked-high CSN
        // during the breathing period.
        let mut pins = vec![PinTransaction::set(PinState::High)];
        pins.extend(framed(9));
        let csn = PinMock::new(&pins);
        let ce = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let mut radio = Nrf24::new(ScriptPort::new(&[]), csn, ce, NoopDelay);

        radio.configure(&cfg);
        assert_eq!(
            radio.bus.port().sent,
            vec![
                0x20, 0x03, // CONFIG: PWR_UP | PRIM_RX
                0x21, 0x00, // EN_AA: auto-ack off
                0x20, 0x03, // CONFIG again, CRC disable now effective
                0x25, 0x02, // RF_CH
                0x24, 0x00, // SETUP_RETR: no auto-retransmit
                0x23, 0x03, // SETUP_AW: 5 bytes
                0x26, 0x06, // RF_SETUP: 1 Mbps, 0 dBm
                0x31, 0x01, // RX_PW_P0
                0x2A, b'1', b't', b's', b'e', b't', // pipe-0 address
            ]
        );
        radio.csn.done();
        radio.ce.done();
    }

    #[test]
    fn test_transmitter_bringup_differs_only_in_mode_and_address_register() {
        let cfg = LinkConfig::new(Role::Transmitter, 1, 1).unwrap();
        let mut pins = vec![PinTransaction::set(PinState::High)];
        pins.extend(framed(9));
        let csn = PinMock::new(&pins);
        let ce = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let mut radio = Nrf24::new(ScriptPort::new(&[]), csn, ce, NoopDelay);

        radio.configure(&cfg);
        let sent = &radio.bus.port().sent;
        assert_eq!(sent[0..2], [0x20, 0x02]); // PWR_UP, PTX
        assert_eq!(sent[4..6], [0x20, 0x02]);
        assert_eq!(sent[16], 0x30); // TX_ADDR, not RX_ADDR_P0
        radio.csn.done();
        radio.ce.done();
    }

    #[test]
    fn test_ping_round_trips_probe_value() {
        let csn = PinMock::new(&framed(2));
        let ce = PinMock::new(&[]);
        let replies = [0x00, 0x00, 0x00, GUARD_PROBE];
        let mut radio = Nrf24::new(ScriptPort::new(&replies), csn, ce, NoopDelay);

        assert!(radio.ping());
        assert_eq!(radio.bus.port().sent, vec![0x3D, GUARD_PROBE, 0x1D, 0xFF]);
        radio.csn.done();
        radio.ce.done();
    }

    #[test]
    fn test_guard_retries_until_probe_matches() {
        let csn = PinMock::new(&framed(6));
        let ce = PinMock::new(&[]);
        // First two probes read back garbage, third matches.
        let replies = [
            0x00, 0x00, 0x00, 0x00, //
            0x00, 0x00, 0x00, 0xFF, //
            0x00, 0x00, 0x00, GUARD_PROBE,
        ];
        let mut radio = Nrf24::new(ScriptPort::new(&replies), csn, ce, NoopDelay);

        radio.guard();
        assert_eq!(radio.bus.port().sent.len(), 12);
        radio.csn.done();
        radio.ce.done();
    }

    #[test]
    fn test_clear_irq_writes_status_clear() {
        let csn = PinMock::new(&framed(1));
        let ce = PinMock::new(&[]);
        let mut radio = Nrf24::new(ScriptPort::new(&[]), csn, ce, NoopDelay);

        radio.clear_irq();
        assert_eq!(radio.bus.port().sent, vec![0x27, 0xFF]);
        radio.csn.done();
        radio.ce.done();
    }
}
