//! Command-based control for stepper motors.

/// Actions for controlling a motor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepperAction {
    /// Set speed in RPM.
    ConfigureSpeed(f32),
    /// Request a signed relative move.
    Move(i32),
    /// Drop the remaining steps, keep coils energized.
    Cancel,
    /// Drop the remaining steps and de-energize.
    Stop,
}

/// Command targeting a specific motor.
#[derive(Debug, Clone, Copy)]
pub struct StepperCommand<Id> {
    pub motor_id: Id,
    pub action: StepperAction,
}

impl<Id> StepperCommand<Id> {
    /// Creates command.
    pub fn new(motor_id: Id, action: StepperAction) -> Self {
        Self { motor_id, action }
    }
}
