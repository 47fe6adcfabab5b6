//! Compile-once deployment configuration for one end of the link.
//!
//! A device is either the transmitter or the receiver for its whole power-on
//! life. Both roles share every wire constant (channel, address, payload
//! width); the role only decides which address register is programmed and
//! which half of the state machine runs.
//!
//! Configuration is validated at construction, before any bus traffic: an
//! oversized payload or an unsatisfiable threshold is a caller programming
//! error, not a runtime condition.

use crate::consts::{
    DEFAULT_ADDRESS, DEFAULT_CHANNEL, DEFAULT_PULSE_MS, DEFAULT_RECHARGE_MS, MAX_PAYLOAD_LEN,
};
use thiserror::Error;

/// Which half of the link this device implements.
///
/// Selected at construction. The two roles never run on the same device;
/// they rendezvous on identical wire constants from opposite ends.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Role {
    /// Watches the pushbutton and bursts sentinel frames on each press.
    Transmitter,
    /// Sleeps, drains received frames, and actuates the relay.
    Receiver,
}

/// Rejected [`LinkConfig`] parameters.
///
/// These are the only recoverable errors in the crate. Everything past
/// configuration is fire-and-forget: the radio's write-only protocol has no
/// status to check, and misconfiguration shows up as silent non-reception.
#[derive(Error, PartialEq, Eq, Clone, Copy, Debug)]
pub enum ConfigError {
    /// The payload length exceeds what one bus transaction burst can carry.
    #[error("payload length {0} exceeds the {MAX_PAYLOAD_LEN} byte burst limit")]
    PayloadTooLong(u8),

    /// A zero-length payload can never reach any threshold.
    #[error("payload length must be at least one byte")]
    PayloadEmpty,

    /// The correctness threshold must be satisfiable by the payload.
    #[error("threshold {threshold} not in 1..={payload_len}")]
    ThresholdOutOfRange {
        /// The rejected threshold.
        threshold: u8,
        /// The configured payload length it must not exceed.
        payload_len: u8,
    },
}

/// Fixed per-deployment link parameters.
///
/// Constructed once at process start and never mutated. The defaults beyond
/// role, payload length, and threshold match the deployed hardware; override
/// the public fields before bring-up if a deployment differs.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct LinkConfig {
    /// Transmitter or receiver.
    pub role: Role,
    /// Frame length in bytes, 1..=31. Both roles must agree.
    pub payload_len: u8,
    /// Minimum sentinel count within a frame required to accept a decode.
    pub threshold: u8,
    /// RF frequency channel.
    pub channel: u8,
    /// 5-byte rendezvous address, identical in both roles.
    pub address: [u8; 5],
    /// H-bridge pulse duration in milliseconds (receive role).
    pub pulse_ms: u32,
    /// Boost capacitor recharge duration in milliseconds (receive role).
    pub recharge_ms: u32,
}

impl LinkConfig {
    /// Builds a validated configuration with deployment defaults for the
    /// channel, address, and actuation timings.
    ///
    /// # Errors
    /// Rejects payload lengths outside 1..=31 and thresholds outside
    /// `1..=payload_len`. Validation happens here so no bus activity can
    /// occur under an impossible configuration.
    pub fn new(role: Role, payload_len: u8, threshold: u8) -> Result<Self, ConfigError> {
        if payload_len == 0 {
            return Err(ConfigError::PayloadEmpty);
        }
        if payload_len > MAX_PAYLOAD_LEN {
            return Err(ConfigError::PayloadTooLong(payload_len));
        }
        if threshold == 0 || threshold > payload_len {
            return Err(ConfigError::ThresholdOutOfRange {
                threshold,
                payload_len,
            });
        }
        Ok(Self {
            role,
            payload_len,
            threshold,
            channel: DEFAULT_CHANNEL,
            address: DEFAULT_ADDRESS,
            pulse_ms: DEFAULT_PULSE_MS,
            recharge_ms: DEFAULT_RECHARGE_MS,
        })
    }

    /// Whether a frame can satisfy both sentinels' thresholds at once.
    ///
    /// When `2 * threshold > payload_len` at most one side of the decode can
    /// win, so the first-match-wins ordering never masks a tie.
    pub fn exclusive(&self) -> bool {
        2 * (self.threshold as u16) > self.payload_len as u16
    }
}
