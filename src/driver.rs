//! ULN2003 driver board adapter over `embedded-hal` output pins.

use crate::stepper::PhaseOutputs;
use crate::types::PhaseLines;
use embedded_hal::digital::{OutputPin, PinState};

/// Four GPIO outputs wired to IN1..IN4 of a ULN2003 board.
///
/// The Darlington array is non-inverting from the MCU's point of view: a
/// high pin sinks current through the matching coil.
pub struct UlnDriver<A, B, C, D>
where
    A: OutputPin,
    B: OutputPin,
    C: OutputPin,
    D: OutputPin,
{
    in1: A,
    in2: B,
    in3: C,
    in4: D,
}

impl<A, B, C, D> UlnDriver<A, B, C, D>
where
    A: OutputPin,
    B: OutputPin,
    C: OutputPin,
    D: OutputPin,
{
    /// Wraps four already-configured output pins.
    pub fn new(in1: A, in2: B, in3: C, in4: D) -> Self {
        Self { in1, in2, in3, in4 }
    }

    /// Returns the pins in `(IN1, IN2, IN3, IN4)` order.
    pub fn release(self) -> (A, B, C, D) {
        (self.in1, self.in2, self.in3, self.in4)
    }
}

impl<A, B, C, D> PhaseOutputs for UlnDriver<A, B, C, D>
where
    A: OutputPin,
    B: OutputPin,
    C: OutputPin,
    D: OutputPin,
{
    fn set_phase(&mut self, lines: PhaseLines) {
        let _ = self.in1.set_state(PinState::from(lines[0]));
        let _ = self.in2.set_state(PinState::from(lines[1]));
        let _ = self.in3.set_state(PinState::from(lines[2]));
        let _ = self.in4.set_state(PinState::from(lines[3]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::{PHASE_OFF, PHASE_TABLE};
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    struct MockPin<'a> {
        level: &'a Cell<bool>,
    }

    impl ErrorType for MockPin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for MockPin<'_> {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.level.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.level.set(true);
            Ok(())
        }
    }

    #[test]
    fn set_phase_drives_each_pin() {
        let levels = [Cell::new(false), Cell::new(false), Cell::new(false), Cell::new(false)];
        let mut driver = UlnDriver::new(
            MockPin { level: &levels[0] },
            MockPin { level: &levels[1] },
            MockPin { level: &levels[2] },
            MockPin { level: &levels[3] },
        );

        for row in PHASE_TABLE {
            driver.set_phase(row);
            let driven = [levels[0].get(), levels[1].get(), levels[2].get(), levels[3].get()];
            assert_eq!(driven, row);
        }

        driver.set_phase(PHASE_OFF);
        assert!(levels.iter().all(|level| !level.get()));
    }

    #[test]
    fn release_returns_pins_in_order() {
        let levels = [Cell::new(false), Cell::new(false), Cell::new(false), Cell::new(false)];
        let driver = UlnDriver::new(
            MockPin { level: &levels[0] },
            MockPin { level: &levels[1] },
            MockPin { level: &levels[2] },
            MockPin { level: &levels[3] },
        );

        let (_, mut in2, _, _) = driver.release();
        in2.set_high().unwrap();
        assert!(levels[1].get());
        assert!(!levels[0].get());
    }
}
