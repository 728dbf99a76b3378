//! Core types for motor configuration.

/// Logic levels for the four driver inputs `[IN1, IN2, IN3, IN4]`.
pub type PhaseLines = [bool; 4];

/// Microseconds in one minute, the numerator of the step delay formula.
pub const MICROS_PER_MINUTE: u64 = 60 * 1_000_000;

/// Full-step count for one output shaft revolution of a 28BYJ-48.
///
/// 32 steps per rotor revolution through a nominal 64:1 gearbox. The real
/// gear ratio is closer to 63.68:1 (about 2038 steps), so pass an explicit
/// count to [`StepperConfig::builder`] when absolute angle matters.
pub const STEPS_PER_REVOLUTION_28BYJ48: u32 = 2048;

/// Rotation direction selected by the sign of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Positive step counts. Increments the position.
    #[default]
    Forward,

    /// Negative step counts. Decrements the position.
    Reverse,
}

impl Direction {
    /// Direction for a signed step count, `None` for zero.
    pub fn from_steps(steps: i32) -> Option<Self> {
        match steps {
            0 => None,
            s if s > 0 => Some(Direction::Forward),
            _ => Some(Direction::Reverse),
        }
    }

    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// Outcome of a successful speed change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpeedSetting {
    /// The requested speed was applied as-is.
    Exact(f32),

    /// The requested speed exceeded the motor's limit and was reduced.
    Clamped {
        /// Speed passed by the caller.
        requested: f32,
        /// Speed actually used to derive the step delay.
        applied: f32,
    },
}

impl SpeedSetting {
    /// The RPM the motor will actually run at.
    pub fn applied(&self) -> f32 {
        match *self {
            SpeedSetting::Exact(rpm) => rpm,
            SpeedSetting::Clamped { applied, .. } => applied,
        }
    }

    /// Returns true if the request was clamped.
    pub fn is_clamped(&self) -> bool {
        matches!(self, SpeedSetting::Clamped { .. })
    }
}

/// Validated mechanical parameters of one motor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepperConfig {
    steps_per_revolution: u32,
    max_rpm: f32,
}

impl StepperConfig {
    /// Speed above which a 28BYJ-48 stalls.
    pub const DEFAULT_MAX_RPM: f32 = 15.0;

    /// Starts a builder for a motor with the given full-step count.
    pub fn builder(steps_per_revolution: u32) -> StepperConfigBuilder {
        StepperConfigBuilder {
            steps_per_revolution,
            max_rpm: Self::DEFAULT_MAX_RPM,
        }
    }

    /// Configuration for a 28BYJ-48 at its nominal gear ratio.
    pub fn byj48() -> Self {
        Self {
            steps_per_revolution: STEPS_PER_REVOLUTION_28BYJ48,
            max_rpm: Self::DEFAULT_MAX_RPM,
        }
    }

    /// Phase-table cells visited in one revolution.
    #[inline]
    pub fn steps_per_revolution(&self) -> u32 {
        self.steps_per_revolution
    }

    /// Highest speed accepted before clamping.
    #[inline]
    pub fn max_rpm(&self) -> f32 {
        self.max_rpm
    }
}

/// Builder for [`StepperConfig`].
#[derive(Debug, Clone, Copy)]
pub struct StepperConfigBuilder {
    steps_per_revolution: u32,
    max_rpm: f32,
}

impl StepperConfigBuilder {
    /// Overrides the stall limit (defaults to 15 RPM).
    pub fn max_rpm(mut self, max_rpm: f32) -> Self {
        self.max_rpm = max_rpm;
        self
    }

    /// Validates and builds the configuration.
    ///
    /// # Errors
    /// * `ZeroStepsPerRevolution` - step count is zero
    /// * `InvalidMaxRpm` - limit is zero, negative, or not finite
    pub fn build(self) -> Result<StepperConfig, ConfigError> {
        if self.steps_per_revolution == 0 {
            return Err(ConfigError::ZeroStepsPerRevolution);
        }

        if !self.max_rpm.is_finite() || self.max_rpm <= 0.0 {
            return Err(ConfigError::InvalidMaxRpm);
        }

        if self.steps_per_revolution % 4 != 0 {
            log::warn!(
                "{} steps per revolution is not a multiple of 4; the phase sequence skips a cell at the wrap point",
                self.steps_per_revolution
            );
        }

        Ok(StepperConfig {
            steps_per_revolution: self.steps_per_revolution,
            max_rpm: self.max_rpm,
        })
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Steps per revolution must be positive.
    ZeroStepsPerRevolution,

    /// Maximum RPM must be a positive finite number.
    InvalidMaxRpm,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroStepsPerRevolution => {
                write!(f, "steps per revolution must be greater than zero")
            }
            ConfigError::InvalidMaxRpm => {
                write!(f, "maximum rpm must be a positive finite number")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
