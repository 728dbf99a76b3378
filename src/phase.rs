//! Full-step phase table and rotor position arithmetic.
//!
//! Two adjacent coils are energized at every step. Walking the table forward
//! produces the rotating pattern `1001 -> 0011 -> 0110 -> 1100`; walking it
//! backward produces the same pattern in the opposite order. Which of the two
//! corresponds to clockwise shaft rotation depends on how the motor leads are
//! wired to the driver, so this orientation is a calibration choice: swapping
//! IN2 and IN4 on the hardware side flips it.

use crate::types::{Direction, PhaseLines};

/// Output lines with every coil de-energized.
pub const PHASE_OFF: PhaseLines = [false, false, false, false];

/// Driver inputs `[IN1, IN2, IN3, IN4]` indexed by `position % 4`.
pub const PHASE_TABLE: [PhaseLines; 4] = [
    [true, false, false, true],
    [false, false, true, true],
    [false, true, true, false],
    [true, true, false, false],
];

/// Output lines for an absolute step index.
#[inline]
pub fn phase_for(position: u32) -> PhaseLines {
    PHASE_TABLE[(position % 4) as usize]
}

/// Moves `position` one step in `direction`, wrapping within
/// `[0, steps_per_revolution)`.
#[inline]
pub fn next_position(position: u32, steps_per_revolution: u32, direction: Direction) -> u32 {
    match direction {
        Direction::Forward => {
            if position + 1 >= steps_per_revolution {
                0
            } else {
                position + 1
            }
        }
        Direction::Reverse => {
            if position == 0 {
                steps_per_revolution - 1
            } else {
                position - 1
            }
        }
    }
}
