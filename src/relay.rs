//! Capacitor-boost actuation of the bistable relay.
//!
//! The relay coil sits across an H-bridge fed from a boost capacitor, so an
//! actuation pulse never draws its peak current from the supply rail. Each
//! commanded flip runs one fixed cycle:
//!
//! ```text
//! Reset -> Charge -> Pulse(one leg, 50 ms) -> Recharge(50 ms) -> Reset
//! ```
//!
//! Reset de-energizes everything. Charge connects the stored capacitor
//! energy to the bridge. Pulse energizes exactly one leg while the other
//! stays low; energizing both legs shorts the bridge and is forbidden, which
//! this module prevents structurally rather than with a runtime check: one
//! parameterized routine drives whichever leg was commanded and never
//! touches the other except to hold it low. Recharge restores standby
//! charge so the next actuation has stored energy ready.
//!
//! All pins are logical-level: `set_high` energizes. Active-low drive
//! transistors belong in the HAL pin configuration, not here.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Stage of the actuation cycle, observable between calls.
///
/// Outside of [`RelayDriver::actuate`] the state is always `Reset`; the
/// relay is stateless between actuations from the driver's viewpoint.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum RelayState {
    /// Both legs de-energized, capacitor disconnected from the bridge.
    #[default]
    Reset,
    /// Stored capacitor energy connected to the bridge.
    Charge,
    /// Exactly one leg energized for the pulse duration.
    Pulse,
    /// Capacitor restored to standby charge.
    Recharge,
}

/// Which H-bridge leg to pulse.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Leg {
    /// The leg that flips the relay off.
    A,
    /// The leg that flips the relay on.
    B,
}

/// Driver for the boost capacitor and H-bridge pins.
///
/// ## Type Parameters
///
/// - `CP` / `CN`: capacitor positive/negative plate charge-pump pins
/// - `CEN`: capacitor-to-bridge connect pin
/// - `LA` / `LB`: the two H-bridge legs
/// - `D`: delay provider for the pulse and recharge durations
#[derive(Debug)]
pub struct RelayDriver<CP, CN, CEN, LA, LB, D>
where
    CP: OutputPin,
    CN: OutputPin,
    CEN: OutputPin,
    LA: OutputPin,
    LB: OutputPin,
    D: DelayNs,
{
    cap_pos: CP,
    cap_neg: CN,
    cap_en: CEN,
    leg_a: LA,
    leg_b: LB,
    delay: D,
    pulse_ms: u32,
    recharge_ms: u32,
    /// Current stage of the actuation cycle.
    pub state: RelayState,
}

impl<CP, CN, CEN, LA, LB, D> RelayDriver<CP, CN, CEN, LA, LB, D>
where
    CP: OutputPin,
    CN: OutputPin,
    CEN: OutputPin,
    LA: OutputPin,
    LB: OutputPin,
    D: DelayNs,
{
    /// Wraps the drive pins. No pin is touched until
    /// [`charge_initial`](Self::charge_initial) or
    /// [`actuate`](Self::actuate) runs.
    pub fn new(
        cap_pos: CP,
        cap_neg: CN,
        cap_en: CEN,
        leg_a: LA,
        leg_b: LB,
        delay: D,
        pulse_ms: u32,
        recharge_ms: u32,
    ) -> Self {
        Self {
            cap_pos,
            cap_neg,
            cap_en,
            leg_a,
            leg_b,
            delay,
            pulse_ms,
            recharge_ms,
            state: RelayState::Reset,
        }
    }

    fn reset(&mut self) {
        let _ = self.leg_a.set_low();
        let _ = self.leg_b.set_low();
        let _ = self.cap_en.set_low();
        let _ = self.cap_pos.set_low();
        let _ = self.cap_neg.set_low();
        self.state = RelayState::Reset;
    }

    fn recharge(&mut self, duration_ms: u32) {
        self.state = RelayState::Recharge;
        let _ = self.cap_pos.set_high();
        let _ = self.cap_neg.set_high();
        self.delay.delay_ms(duration_ms);
        let _ = self.cap_pos.set_low();
        let _ = self.cap_neg.set_low();
    }

    /// One-time power-on charge of the boost capacitor.
    ///
    /// Runs a long charge (500 ms by default wiring) with the bridge held
    /// de-energized, so the first commanded actuation has stored energy.
    pub fn charge_initial(&mut self, duration_ms: u32) {
        self.reset();
        self.recharge(duration_ms);
        self.state = RelayState::Reset;
    }

    /// Runs one full actuation cycle on the commanded leg.
    ///
    /// The other leg is held de-energized for the whole cycle; both-legs-on
    /// cannot occur even transiently. Returns with the driver back in
    /// [`RelayState::Reset`], capacitor recharged.
    pub fn actuate(&mut self, leg: Leg) {
        self.reset();

        self.state = RelayState::Charge;
        let _ = self.cap_en.set_high();

        self.state = RelayState::Pulse;
        match leg {
            Leg::A => {
                let _ = self.leg_a.set_high();
            }
            Leg::B => {
                let _ = self.leg_b.set_high();
            }
        }
        self.delay.delay_ms(self.pulse_ms);
        match leg {
            Leg::A => {
                let _ = self.leg_a.set_low();
            }
            Leg::B => {
                let _ = self.leg_b.set_low();
            }
        }
        let _ = self.cap_en.set_low();

        self.recharge(self.recharge_ms);
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    fn low() -> PinTransaction {
        PinTransaction::set(PinState::Low)
    }

    fn high() -> PinTransaction {
        PinTransaction::set(PinState::High)
    }

    #[test]
    fn test_actuate_leg_b_never_touches_leg_a_high() {
        let cap_pos = PinMock::new(&[low(), high(), low(), low()]);
        let cap_neg = PinMock::new(&[low(), high(), low(), low()]);
        let cap_en = PinMock::new(&[low(), high(), low(), low()]);
        // Leg A only ever driven low: the forbidden both-legs state is
        // structurally unreachable.
        let leg_a = PinMock::new(&[low(), low()]);
        let leg_b = PinMock::new(&[low(), high(), low(), low()]);

        let mut relay = RelayDriver::new(cap_pos, cap_neg, cap_en, leg_a, leg_b, NoopDelay, 50, 50);
        relay.actuate(Leg::B);
        assert_eq!(relay.state, RelayState::Reset);

        relay.cap_pos.done();
        relay.cap_neg.done();
        relay.cap_en.done();
        relay.leg_a.done();
        relay.leg_b.done();
    }

    #[test]
    fn test_actuate_leg_a_mirrors_leg_b() {
        let cap_pos = PinMock::new(&[low(), high(), low(), low()]);
        let cap_neg = PinMock::new(&[low(), high(), low(), low()]);
        let cap_en = PinMock::new(&[low(), high(), low(), low()]);
        let leg_a = PinMock::new(&[low(), high(), low(), low()]);
        let leg_b = PinMock::new(&[low(), low()]);

        let mut relay = RelayDriver::new(cap_pos, cap_neg, cap_en, leg_a, leg_b, NoopDelay, 50, 50);
        relay.actuate(Leg::A);
        assert_eq!(relay.state, RelayState::Reset);

        relay.cap_pos.done();
        relay.cap_neg.done();
        relay.cap_en.done();
        relay.leg_a.done();
        relay.leg_b.done();
    }

    #[test]
    fn test_actuation_is_idempotent() {
        // Two identical cycles produce two identical pin sequences and both
        // return to Reset.
        let cycle_pump = [low(), high(), low(), low()];
        let mut two = Vec::new();
        two.extend_from_slice(&cycle_pump);
        two.extend_from_slice(&cycle_pump);

        let cap_pos = PinMock::new(&two);
        let cap_neg = PinMock::new(&two);
        let cap_en = PinMock::new(&two);
        let leg_a = PinMock::new(&[low(), low(), low(), low()]);
        let leg_b = PinMock::new(&two);

        let mut relay = RelayDriver::new(cap_pos, cap_neg, cap_en, leg_a, leg_b, NoopDelay, 50, 50);
        relay.actuate(Leg::B);
        assert_eq!(relay.state, RelayState::Reset);
        relay.actuate(Leg::B);
        assert_eq!(relay.state, RelayState::Reset);

        relay.cap_pos.done();
        relay.cap_neg.done();
        relay.cap_en.done();
        relay.leg_a.done();
        relay.leg_b.done();
    }

    #[test]
    fn test_initial_charge_leaves_everything_deenergized() {
        let cap_pos = PinMock::new(&[low(), high(), low()]);
        let cap_neg = PinMock::new(&[low(), high(), low()]);
        let cap_en = PinMock::new(&[low()]);
        let leg_a = PinMock::new(&[low()]);
        let leg_b = PinMock::new(&[low()]);

        let mut relay = RelayDriver::new(cap_pos, cap_neg, cap_en, leg_a, leg_b, NoopDelay, 50, 50);
        relay.charge_initial(500);
        assert_eq!(relay.state, RelayState::Reset);

        relay.cap_pos.done();
        relay.cap_neg.done();
        relay.cap_en.done();
        relay.leg_a.done();
        relay.leg_b.done();
    }
}
