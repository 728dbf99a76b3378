//! Stepper motor controller with position tracking and timing control.
//!
//! Provides [`StepperMotor`] which drives a single 4-phase unipolar motor
//! through its phase table, gating every phase change on the configured step
//! delay. Also defines the [`PhaseOutputs`] trait for hardware abstraction.
//!
//! Movement is non-blocking: [`StepperMotor::move_by`] only records the
//! request, and each call to [`StepperMotor::tick`] performs at most one
//! phase change. Several motors can therefore be driven from one loop.

use crate::command::StepperAction;
use crate::phase::{PHASE_OFF, next_position, phase_for};
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::types::{Direction, MICROS_PER_MINUTE, PhaseLines, SpeedSetting, StepperConfig};

/// Trait for abstracting the four driver inputs.
///
/// Implement this for your hardware (GPIO, shift register, port expander)
/// to allow the controller to energize the coils.
pub trait PhaseOutputs {
    /// Drives the lines `[IN1, IN2, IN3, IN4]` to the given levels.
    ///
    /// Handle any hardware errors internally - this method cannot fail.
    fn set_phase(&mut self, lines: PhaseLines);
}

/// The current state of a motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorState {
    /// No speed configured yet. Moves are rejected.
    Unconfigured,
    /// Coils de-energized, no steps pending.
    Released,
    /// Coils energized at the current position, no steps pending.
    Holding,
    /// Steps pending. Needs ticking.
    Moving,
}

/// Timing information returned by [`StepperMotor::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepTiming<D> {
    /// Steps remain. The next phase change is due after this delay.
    Delay(D),

    /// No steps remain. No further ticking is needed until the next move.
    Complete,
}

/// Errors that can occur during motor operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepperError {
    /// Requested speed was zero, negative, or not a number.
    InvalidSpeed,
    /// A move was requested before any speed was configured.
    SpeedNotConfigured,
}

impl core::fmt::Display for StepperError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StepperError::InvalidSpeed => {
                write!(f, "invalid speed: rpm must be greater than zero")
            }
            StepperError::SpeedNotConfigured => {
                write!(f, "speed must be configured before moving")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StepperError {}

/// Time one phase-table cell takes at `rpm`, in whole microseconds.
///
/// Never returns zero, so gating on the result always makes progress.
pub fn step_delay_micros(steps_per_revolution: u32, rpm: f32) -> u64 {
    let delay = MICROS_PER_MINUTE as f32 / steps_per_revolution as f32 / rpm;
    (delay as u64).max(1)
}

/// Controls a single 4-phase stepper motor.
///
/// Each controller owns its output lines and tracks the absolute rotor
/// position in `[0, steps_per_revolution)`. Position persists across moves
/// and across [`stop`](Self::stop), so successive requests compose.
///
/// # Type Parameters
/// * `I` - Time instant type
/// * `P` - Output line implementation type
pub struct StepperMotor<I: TimeInstant, P: PhaseOutputs> {
    outputs: P,
    config: StepperConfig,
    position: u32,
    direction: Direction,
    remaining: u32,
    rpm: Option<f32>,
    step_delay: Option<I::Duration>,
    last_phase_time: Option<I>,
    energized: bool,
}

impl<I: TimeInstant, P: PhaseOutputs> StepperMotor<I, P> {
    /// Creates an unconfigured motor at position 0 with all coils off.
    pub fn new(mut outputs: P, config: StepperConfig) -> Self {
        outputs.set_phase(PHASE_OFF);

        Self {
            outputs,
            config,
            position: 0,
            direction: Direction::Forward,
            remaining: 0,
            rpm: None,
            step_delay: None,
            last_phase_time: None,
            energized: false,
        }
    }

    /// Handles a motor action by dispatching to the appropriate method.
    pub fn handle_action(&mut self, action: StepperAction) -> Result<(), StepperError> {
        match action {
            StepperAction::ConfigureSpeed(rpm) => {
                self.configure_speed(rpm)?;
                Ok(())
            }
            StepperAction::Move(steps) => self.move_by(steps),
            StepperAction::Cancel => {
                self.cancel();
                Ok(())
            }
            StepperAction::Stop => {
                self.stop();
                Ok(())
            }
        }
    }

    /// Sets the rotational speed and derives the step delay from it.
    ///
    /// Speeds above the configured maximum are clamped with a warning.
    ///
    /// # Errors
    /// * `InvalidSpeed` - `rpm` is zero, negative, or NaN. The previous
    ///   speed, if any, stays in effect.
    pub fn configure_speed(&mut self, rpm: f32) -> Result<SpeedSetting, StepperError> {
        if rpm.is_nan() || rpm <= 0.0 {
            return Err(StepperError::InvalidSpeed);
        }

        let max_rpm = self.config.max_rpm();
        let setting = if rpm > max_rpm {
            log::warn!("requested {} rpm exceeds motor limit, clamping to {}", rpm, max_rpm);
            SpeedSetting::Clamped {
                requested: rpm,
                applied: max_rpm,
            }
        } else {
            SpeedSetting::Exact(rpm)
        };

        let applied = setting.applied();
        let delay = step_delay_micros(self.config.steps_per_revolution(), applied);
        self.rpm = Some(applied);
        self.step_delay = Some(I::Duration::from_micros(delay));

        Ok(setting)
    }

    /// Requests a relative move. The sign selects the direction.
    ///
    /// Replaces any steps still pending from a previous request. A zero
    /// count changes nothing. Call [`tick`](Self::tick) to make progress.
    ///
    /// # Errors
    /// * `SpeedNotConfigured` - no speed has been set yet
    pub fn move_by(&mut self, steps: i32) -> Result<(), StepperError> {
        if self.step_delay.is_none() {
            return Err(StepperError::SpeedNotConfigured);
        }

        let Some(direction) = Direction::from_steps(steps) else {
            return Ok(());
        };

        self.direction = direction;
        self.remaining = steps.unsigned_abs();
        log::debug!(
            "move {} steps {:?} from position {}",
            self.remaining,
            direction,
            self.position
        );

        Ok(())
    }

    /// Advances the motor by at most one phase if the step delay has elapsed.
    ///
    /// The first phase change of a motor that has never stepped happens
    /// immediately. Never blocks.
    ///
    /// # Returns
    /// - `StepTiming::Delay(duration)` - steps remain, tick again after `duration`
    /// - `StepTiming::Complete` - no steps remain
    pub fn tick(&mut self, now: I) -> StepTiming<I::Duration> {
        if self.remaining == 0 {
            return StepTiming::Complete;
        }

        let Some(delay) = self.step_delay else {
            return StepTiming::Complete;
        };

        if let Some(last) = self.last_phase_time {
            let elapsed = now.duration_since(last);
            if elapsed.as_micros() < delay.as_micros() {
                return StepTiming::Delay(delay.saturating_sub(elapsed));
            }
        }

        self.advance(now);

        if self.remaining == 0 {
            StepTiming::Complete
        } else {
            StepTiming::Delay(delay)
        }
    }

    /// Runs a move to completion, busy-waiting on `time_source` between
    /// phase changes.
    ///
    /// Blocks the caller for the whole move. Prefer [`move_by`](Self::move_by)
    /// and [`tick`](Self::tick) when anything else needs to run meanwhile.
    pub fn move_blocking<T: TimeSource<I>>(
        &mut self,
        steps: i32,
        time_source: &T,
    ) -> Result<(), StepperError> {
        self.move_by(steps)?;

        while let StepTiming::Delay(_) = self.tick(time_source.now()) {
            core::hint::spin_loop();
        }

        Ok(())
    }

    /// Drops any pending steps, leaving the coils as they are.
    pub fn cancel(&mut self) {
        if self.remaining > 0 {
            log::debug!("cancel with {} steps pending at position {}", self.remaining, self.position);
        }
        self.remaining = 0;
    }

    /// De-energizes all coils and drops any pending steps.
    ///
    /// Position and direction are kept, so the next move continues from
    /// the same logical rotor position.
    pub fn stop(&mut self) {
        self.cancel();
        self.outputs.set_phase(PHASE_OFF);
        self.energized = false;
        log::debug!("stop at position {}", self.position);
    }

    fn advance(&mut self, now: I) {
        self.last_phase_time = Some(now);
        self.position = next_position(
            self.position,
            self.config.steps_per_revolution(),
            self.direction,
        );
        self.remaining -= 1;

        self.outputs.set_phase(phase_for(self.position));
        self.energized = true;
        log::trace!("phase advance to position {}", self.position);
    }

    /// Returns the current state of the motor.
    pub fn state(&self) -> MotorState {
        if self.step_delay.is_none() {
            MotorState::Unconfigured
        } else if self.remaining > 0 {
            MotorState::Moving
        } else if self.energized {
            MotorState::Holding
        } else {
            MotorState::Released
        }
    }

    /// Returns true if steps are pending.
    pub fn is_moving(&self) -> bool {
        self.remaining > 0
    }

    /// Absolute step index in `[0, steps_per_revolution)`.
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Direction of the most recent non-zero move request.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Steps still to be taken by the current move.
    pub fn remaining_steps(&self) -> u32 {
        self.remaining
    }

    /// Applied speed, if configured.
    pub fn rpm(&self) -> Option<f32> {
        self.rpm
    }

    /// Minimum time between phase changes, if configured.
    pub fn step_delay(&self) -> Option<I::Duration> {
        self.step_delay
    }

    /// Mechanical configuration of this motor.
    pub fn config(&self) -> &StepperConfig {
        &self.config
    }

    /// Phase-table row for the current position.
    pub fn phase_lines(&self) -> PhaseLines {
        phase_for(self.position)
    }

    /// Levels currently driven on the outputs.
    pub fn current_lines(&self) -> PhaseLines {
        if self.energized {
            phase_for(self.position)
        } else {
            PHASE_OFF
        }
    }

    /// Returns a reference to the output lines.
    pub fn outputs(&self) -> &P {
        &self.outputs
    }

    /// Returns a mutable reference to the output lines.
    pub fn outputs_mut(&mut self) -> &mut P {
        &mut self.outputs
    }

    /// Consumes the controller and returns the output lines.
    pub fn release(self) -> P {
        self.outputs
    }
}
