//! # relay24
//!
//! A portable, no_std Rust driver for a battery-powered, radio-linked bistable
//! relay controller built around an nRF24L01+-class transceiver.
//!
//! One device (the transmitter) watches a pushbutton and blasts a fixed burst
//! of single-byte sentinel frames on every press. The other device (the
//! receiver) spends its life asleep, waking on the radio's interrupt line or a
//! slow heartbeat timer, draining the receive FIFO, counting sentinels, and
//! pulsing a capacitor-boosted H-bridge to flip a bistable relay.
//!
//! This driver implements the whole link in portable form using:
//! - `embedded-hal` traits for digital I/O and timing
//! - a framed register protocol over a byte-level synchronous bus primitive
//! - interrupt-safe bus transfers with `critical-section`
//! - count-threshold frame decoding for noise rejection by abstention
//!
//! ## Crate features
//! | Feature     | Description |
//! |-------------|-------------|
//! | `std`       | Disables `#![no_std]` support and replaces `heapless::Vec`s with `std::vec::Vec`s |
//! | `defmt-0-3` | Uses `defmt` formatting on public types |
//! | `log`       | Logs decode outcomes with the `log` crate |
//!
//! ## Software Features
//!
//! - **Transmitter and receiver** roles selected at construction, not at
//!   compile time, behind one [`link::LinkDriver`] interface
//! - Fixed-sequence radio bring-up ([`radio::Nrf24::configure`]) with
//!   auto-ack, auto-retransmit, and CRC all disabled: link reliability is
//!   repetition redundancy, nothing else
//! - Interrupt demultiplexing and true-halt suspend behind the
//!   [`wake::IrqFlags`] seam, so the receive loop reads as ordinary
//!   sequential code
//! - Capacitor-boost relay sequencing that can never energize both
//!   H-bridge legs, even transiently
//!
//! ## Usage
//!
//! ```ignore
//! use relay24::config::{LinkConfig, Role};
//! use relay24::link::LinkDriver;
//! use relay24::radio::Nrf24;
//!
//! let cfg = LinkConfig::new(Role::Receiver, 1, 1)?;
//! let radio = Nrf24::new(port, csn, ce, delay);
//! let mut link = LinkDriver::new(radio, cfg);
//! link.begin();
//! loop {
//!     let _ = link.run_cycle(&mut dispatcher, &mut output);
//! }
//! ```
//!
//! ## Integration Notes
//!
//! - The byte transfer primitive masks interrupts for the duration of one
//!   byte; everything above it may be interrupted between bytes.
//! - Only one driver instance should exist: the bus, the radio, and the
//!   relay are all exclusive hardware.
//! - No operation times out. A wedged bus or a dead radio hangs forever;
//!   the optional liveness guard ([`radio::Nrf24::guard`]) is the only
//!   recovery aid, and it retries without bound.
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

pub use critical_section;

#[cfg(not(feature = "std"))]
pub use heapless;

pub mod bus;
pub mod button;
pub mod config;
pub mod consts;
pub mod decode;
pub mod link;
pub mod radio;
pub mod relay;
pub mod wake;
