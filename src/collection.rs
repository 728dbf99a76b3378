use crate::command::{StepperAction, StepperCommand};
use crate::stepper::{MotorState, PhaseOutputs, StepTiming, StepperError, StepperMotor};
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use heapless::Vec;

/// An identifier for a motor within a collection.
///
/// This is a simple wrapper around `usize` that provides type safety for motor
/// identifiers. Users specify motor IDs when adding motors to a collection,
/// and use these IDs to target specific motors with commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorId(pub usize);

impl From<usize> for MotorId {
    fn from(id: usize) -> Self {
        MotorId(id)
    }
}

impl From<MotorId> for usize {
    fn from(id: MotorId) -> Self {
        id.0
    }
}

/// Errors that can occur during collection operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CollectionError {
    /// The specified motor ID does not exist in the collection.
    InvalidMotorId(MotorId),

    /// Attempted to add a motor with an ID that already exists.
    DuplicateMotorId(MotorId),

    /// The motor ID exceeds the collection's capacity.
    MotorIdOutOfBounds { id: MotorId, capacity: usize },

    /// A motor operation failed.
    Stepper(StepperError),
}

impl core::fmt::Display for CollectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CollectionError::InvalidMotorId(id) => {
                write!(f, "motor ID {} does not exist in collection", id.0)
            }
            CollectionError::DuplicateMotorId(id) => {
                write!(f, "motor ID {} already exists in collection", id.0)
            }
            CollectionError::MotorIdOutOfBounds { id, capacity } => {
                write!(
                    f,
                    "motor ID {} exceeds collection capacity of {}",
                    id.0, capacity
                )
            }
            CollectionError::Stepper(err) => {
                write!(f, "motor error: {}", err)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CollectionError {}

impl From<StepperError> for CollectionError {
    fn from(err: StepperError) -> Self {
        CollectionError::Stepper(err)
    }
}

/// Result of one scheduler pass over a collection.
#[derive(Debug, Clone)]
pub struct TickReport<D, const MAX_MOTORS: usize> {
    /// Shortest delay until any still-moving motor is due, `None` when
    /// nothing is moving.
    pub next_service: Option<D>,

    /// Motors whose move finished during this pass.
    pub completed: Vec<MotorId, MAX_MOTORS>,
}

impl<D, const MAX_MOTORS: usize> TickReport<D, MAX_MOTORS> {
    /// Returns true if no motor needs further ticking.
    pub fn is_idle(&self) -> bool {
        self.next_service.is_none()
    }
}

/// Drives several motors cooperatively from one control loop.
///
/// Every motor keeps its own timing state, so interleaving them needs no
/// locking: each [`tick_all`](Self::tick_all) samples the shared clock once
/// and gives every moving motor the chance to take one phase step.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `P` - Output line implementation type (must be same for all motors)
/// * `T` - Time source implementation type
/// * `MAX_MOTORS` - Maximum number of motors this collection can hold
pub struct StepperCollection<'t, I: TimeInstant, P: PhaseOutputs, T: TimeSource<I>, const MAX_MOTORS: usize> {
    motors: [Option<StepperMotor<I, P>>; MAX_MOTORS],
    time_source: &'t T,
}

impl<'t, I, P, T, const MAX_MOTORS: usize> StepperCollection<'t, I, P, T, MAX_MOTORS>
where
    I: TimeInstant,
    P: PhaseOutputs,
    T: TimeSource<I>,
{
    /// Creates a new empty collection.
    ///
    /// # Arguments
    /// * `time_source` - Reference to the clock shared by all motors
    pub fn new(time_source: &'t T) -> Self {
        Self {
            motors: core::array::from_fn(|_| None),
            time_source,
        }
    }

    /// Adds a motor to the collection under the specified ID.
    ///
    /// # Errors
    /// * `DuplicateMotorId` - A motor with this ID already exists
    /// * `MotorIdOutOfBounds` - The ID exceeds the collection's capacity
    pub fn add_motor(&mut self, id: MotorId, motor: StepperMotor<I, P>) -> Result<(), CollectionError> {
        let idx = id.0;

        if idx >= MAX_MOTORS {
            return Err(CollectionError::MotorIdOutOfBounds {
                id,
                capacity: MAX_MOTORS,
            });
        }

        if self.motors[idx].is_some() {
            return Err(CollectionError::DuplicateMotorId(id));
        }

        self.motors[idx] = Some(motor);
        Ok(())
    }

    /// Removes a motor and hands it back, coils left as they are.
    pub fn remove_motor(&mut self, id: MotorId) -> Option<StepperMotor<I, P>> {
        self.motors.get_mut(id.0).and_then(Option::take)
    }

    /// Returns the motor with the given ID.
    ///
    /// # Errors
    /// Returns `InvalidMotorId` if the motor does not exist in the collection.
    pub fn motor(&self, id: MotorId) -> Result<&StepperMotor<I, P>, CollectionError> {
        self.motors
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(CollectionError::InvalidMotorId(id))
    }

    /// Returns the motor with the given ID for direct control.
    ///
    /// # Errors
    /// Returns `InvalidMotorId` if the motor does not exist in the collection.
    pub fn motor_mut(&mut self, id: MotorId) -> Result<&mut StepperMotor<I, P>, CollectionError> {
        self.motors
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(CollectionError::InvalidMotorId(id))
    }

    /// Routes an action to the specified motor.
    ///
    /// # Errors
    /// * `InvalidMotorId` - The motor does not exist
    /// * `Stepper` - The motor rejected the action
    pub fn handle_command(&mut self, id: MotorId, action: StepperAction) -> Result<(), CollectionError> {
        Ok(self.motor_mut(id)?.handle_action(action)?)
    }

    /// Routes a command to the motor it targets.
    pub fn dispatch(&mut self, command: StepperCommand<MotorId>) -> Result<(), CollectionError> {
        self.handle_command(command.motor_id, command.action)
    }

    /// Ticks every moving motor against a single clock sample.
    ///
    /// Each motor takes at most one phase step. Call this from the control
    /// loop or a timer callback, sleeping for `next_service` in between when
    /// the platform allows it.
    pub fn tick_all(&mut self) -> TickReport<I::Duration, MAX_MOTORS> {
        let now = self.time_source.now();
        let mut next_service: Option<I::Duration> = None;
        let mut completed = Vec::new();

        for (idx, slot) in self.motors.iter_mut().enumerate() {
            let Some(motor) = slot else {
                continue;
            };

            if !motor.is_moving() {
                continue;
            }

            match motor.tick(now) {
                StepTiming::Delay(delay) => {
                    next_service = match next_service {
                        Some(current) if current.as_micros() <= delay.as_micros() => Some(current),
                        _ => Some(delay),
                    };
                }
                StepTiming::Complete => {
                    // One entry per slot, so capacity cannot be exceeded
                    let _ = completed.push(MotorId(idx));
                }
            }
        }

        TickReport {
            next_service,
            completed,
        }
    }

    /// De-energizes every motor and drops all pending steps.
    pub fn stop_all(&mut self) {
        for motor in self.motors.iter_mut().flatten() {
            motor.stop();
        }
    }

    /// Returns the current state of the specified motor.
    ///
    /// # Errors
    /// Returns `InvalidMotorId` if the motor does not exist in the collection.
    pub fn state(&self, id: MotorId) -> Result<MotorState, CollectionError> {
        Ok(self.motor(id)?.state())
    }

    /// Returns true if any motor has steps pending.
    pub fn any_moving(&self) -> bool {
        self.motors.iter().flatten().any(StepperMotor::is_moving)
    }

    /// Returns the number of motors currently in the collection.
    pub fn len(&self) -> usize {
        self.motors.iter().filter(|m| m.is_some()).count()
    }

    /// Returns true if the collection contains no motors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the collection contains a motor with the given ID.
    pub fn contains(&self, id: MotorId) -> bool {
        let idx = id.0;
        idx < MAX_MOTORS && self.motors[idx].is_some()
    }
}
