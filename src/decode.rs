//! Count-threshold frame decoding.
//!
//! A frame is accepted only if one sentinel occurs at least `threshold`
//! times across the buffer; anything else is ambiguous and decodes to
//! nothing. This is the link's entire noise-rejection policy: rejection by
//! abstention, never by best guess. A discarded frame costs one re-arm,
//! and the transmitter's burst redundancy makes another copy cheap.
//!
//! Both sentinels are counted and the on-sentinel is checked first. With
//! `2 * threshold > frame.len()` at most one side can reach the threshold,
//! so the ordering never masks a tie; see
//! [`LinkConfig::exclusive`](crate::config::LinkConfig::exclusive).

use crate::consts::{CHAR_OFF, CHAR_ON};

/// Binary command carried by an accepted frame.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Command {
    /// Flip the relay on (leg B).
    On,
    /// Flip the relay off (leg A).
    Off,
}

/// Decodes one received frame, or abstains.
///
/// Counts occurrences of both sentinel bytes across `frame`. Returns
/// `Some(Command::On)` if the on-count reaches `threshold`, else
/// `Some(Command::Off)` if the off-count does, else `None` for an
/// ambiguous or noise-corrupted frame.
///
/// Deterministic in the frame contents alone; no state is carried between
/// calls.
pub fn decode(frame: &[u8], threshold: u8) -> Option<Command> {
    let mut on_count: u8 = 0;
    let mut off_count: u8 = 0;
    for &byte in frame {
        if byte == CHAR_ON {
            on_count += 1;
        } else if byte == CHAR_OFF {
            off_count += 1;
        }
    }
    if on_count >= threshold {
        Some(Command::On)
    } else if off_count >= threshold {
        Some(Command::Off)
    } else {
        None
    }
}
