#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`StepperMotor`**: Drives one 4-phase unipolar motor, tracking its absolute position
//! - **`StepperConfig`**: Validated mechanical parameters (steps per revolution, stall limit)
//! - **`PhaseOutputs`**: Trait to implement for your driver's four input lines
//! - **`UlnDriver`**: Ready-made `PhaseOutputs` for four `embedded-hal` output pins
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`StepTiming`**: What a tick reports: wait this long, or done
//! - **`StepperCollection`**: Interleaves several motors from one control loop
//! - **`StepperAction`**: Commands that can be sent to control motors
//!
//! A move is a request, not a call that blocks: `move_by` records the target and
//! `tick(now)` performs at most one phase change whenever the step delay has elapsed.

pub mod time;
pub mod types;
pub mod phase;
pub mod stepper;
pub mod driver;
pub mod command;
pub mod collection;

pub use collection::{CollectionError, MotorId, StepperCollection, TickReport};
pub use command::{StepperAction, StepperCommand};
pub use driver::UlnDriver;
pub use phase::{PHASE_OFF, PHASE_TABLE, phase_for};
pub use stepper::{MotorState, PhaseOutputs, StepTiming, StepperError, StepperMotor, step_delay_micros};
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use types::{
    ConfigError, Direction, PhaseLines, STEPS_PER_REVOLUTION_28BYJ48, SpeedSetting, StepperConfig,
    StepperConfigBuilder,
};
