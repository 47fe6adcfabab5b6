//! Constants shared across the relay link implementation.
//!
//! This module defines the nRF24L01+ register map and SPI opcodes, the
//! two-byte sentinel alphabet, payload limits, and the fixed deployment
//! defaults (channel, rendezvous address, actuation timings).
//!
//! ## Key Concepts
//!
//! - **Opcodes**: a register access is a command byte (opcode ORed with the
//!   register address) followed by data bytes, all inside one chip-select
//!   frame.
//! - **Sentinels**: the whole wire alphabet is two printable bytes whose
//!   bit patterns sum to `0x7F`, so noise rarely converts one into the other.
//! - **Payload Limits**: one bus transaction burst, 31 bytes theoretical,
//!   1-7 bytes in practice.
//! - **Timings**: relay pulse and recharge durations, button poll interval,
//!   and the heartbeat timer preset, all carried over from the deployed
//!   hardware.
//!
//! These values must be used wherever wire traffic is generated: the
//! transmitter and receiver rendezvous purely on matching constants, and a
//! misconfigured radio fails silently.

/// SPI opcode: write a register. OR with the register address.
pub const W_REGISTER: u8 = 0x20;

/// SPI opcode: read a register. OR with the register address.
pub const R_REGISTER: u8 = 0x00;

/// SPI opcode: read the top payload out of the RX FIFO.
pub const R_RX_PAYLOAD: u8 = 0x61;

/// SPI opcode: load a payload into the TX FIFO.
pub const W_TX_PAYLOAD: u8 = 0xA0;

/// SPI no-op, used to clock reply bytes out of the radio.
pub const NOP: u8 = 0xFF;

/// Power state, CRC, and TX/RX mode configuration register.
pub const REG_CONFIG: u8 = 0x00;

/// Auto-acknowledgement enable mask, one bit per pipe.
pub const REG_EN_AA: u8 = 0x01;

/// Receive pipe enable mask.
pub const REG_EN_RXADDR: u8 = 0x02;

/// Address width register.
pub const REG_SETUP_AW: u8 = 0x03;

/// Auto-retransmit delay and count register.
pub const REG_SETUP_RETR: u8 = 0x04;

/// RF frequency channel register.
pub const REG_RF_CH: u8 = 0x05;

/// Data rate and transmit power register.
pub const REG_RF_SETUP: u8 = 0x06;

/// Status register. Writing [`STATUS_CLEAR_IRQ`] re-arms the interrupt line.
pub const REG_STATUS: u8 = 0x07;

/// Pipe-0 receive address register, 5 bytes.
pub const REG_RX_ADDR_P0: u8 = 0x0A;

/// Transmit address register, 5 bytes.
pub const REG_TX_ADDR: u8 = 0x10;

/// Pipe-0 expected payload width register.
pub const REG_RX_PW_P0: u8 = 0x11;

/// FIFO status register.
pub const REG_FIFO_STATUS: u8 = 0x17;

/// Feature register. Unused by the link; the liveness guard borrows it as a
/// scratch location.
pub const REG_FEATURE: u8 = 0x1D;

/// `CONFIG` bit: power up the transceiver.
pub const CONFIG_PWR_UP: u8 = 0x02;

/// `CONFIG` bit: primary receiver mode. Clear for primary transmitter.
pub const CONFIG_PRIM_RX: u8 = 0x01;

/// `SETUP_AW` encoding for a 5-byte address.
pub const AW_5_BYTES: u8 = 0x03;

/// `RF_SETUP` encoding for 1 Mbps at 0 dBm.
pub const RF_SETUP_1MBPS_0DBM: u8 = 0x06;

/// `FIFO_STATUS` bit: the RX FIFO is empty.
pub const FIFO_RX_EMPTY: u8 = 0x01;

/// Value written to [`REG_STATUS`] to clear every pending interrupt flag.
pub const STATUS_CLEAR_IRQ: u8 = 0xFF;

/// Sentinel byte commanding the relay on: `'1'`, `0b0011_0001`.
pub const CHAR_ON: u8 = b'1';

/// Sentinel byte commanding the relay off: `'N'`, `0b0100_1110`.
///
/// The two sentinels are printable for debugging and sum to `0b0111_1111`.
pub const CHAR_OFF: u8 = b'N';

/// Hardware limit on one payload burst, in bytes.
pub const MAX_PAYLOAD_LEN: u8 = 31;

/// See [`MAX_PAYLOAD_LEN`](crate::consts::MAX_PAYLOAD_LEN)
pub const MAX_PAYLOAD_LEN_USIZE: usize = MAX_PAYLOAD_LEN as usize;

/// Default RF channel both roles rendezvous on.
pub const DEFAULT_CHANNEL: u8 = 2;

/// Default 5-byte rendezvous address shared by both roles.
pub const DEFAULT_ADDRESS: [u8; 5] = *b"test1";

/// Default H-bridge pulse duration in milliseconds.
pub const DEFAULT_PULSE_MS: u32 = 50;

/// Default boost capacitor recharge duration in milliseconds.
pub const DEFAULT_RECHARGE_MS: u32 = 50;

/// One-time capacitor charge duration at power-on, in milliseconds.
pub const INITIAL_CHARGE_MS: u32 = 500;

/// Settle time after dropping the enable line during bring-up, in milliseconds.
pub const POWER_SETTLE_MS: u32 = 1;

/// Breathing time after parking chip-select high during bring-up, in
/// milliseconds.
pub const CSN_SETTLE_MS: u32 = 2;

/// Width of the enable-line pulse that launches one transmit burst element,
/// in microseconds. The hardware minimum is 10 µs.
pub const CE_PULSE_US: u32 = 20;

/// Number of payload repetitions per transmitted command.
///
/// Auto-ack and auto-retransmit are disabled; repetition is the only
/// reliability mechanism on this link.
pub const BURST_REPEAT: u16 = 5050;

/// Pushbutton poll interval in milliseconds (transmit role).
pub const BUTTON_POLL_MS: u32 = 50;

/// Heartbeat counter preset, reloaded on every timer wake.
///
/// The counter free-runs from the low-power oscillator and overflows at
/// 2 Hz from this offset. Reloading to zero would stretch the period.
pub const HEARTBEAT_PRESET: u16 = 61661;

/// Disposable value the liveness guard writes into [`REG_FEATURE`].
pub const GUARD_PROBE: u8 = 0x04;

/// Settle delay before the first liveness probe, in milliseconds. A radio
/// about to brown out should do so inside this window.
pub const GUARD_SETTLE_MS: u32 = 10;

/// Backoff between liveness probe retries, in milliseconds.
pub const GUARD_RETRY_MS: u32 = 5;
