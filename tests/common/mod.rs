//! Shared test infrastructure for uln-stepper integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use uln_stepper::{
    PhaseLines, PhaseOutputs, StepperConfig, StepperMotor, TimeDuration, TimeInstant, TimeSource,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps microseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_micros(&self) -> u64 {
        self.0
    }

    fn from_micros(micros: u64) -> Self {
        TestDuration(micros)
    }

    fn saturating_sub(self, other: Self) -> Self {
        TestDuration(self.0.saturating_sub(other.0))
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }
}

/// Mock instant backed by a 32-bit counter that wraps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrappingInstant(pub u32);

impl TimeInstant for WrappingInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0.wrapping_sub(earlier.0) as u64)
    }
}

// ============================================================================
// Mock Outputs
// ============================================================================

/// Mock driver that records every phase written
pub struct MockOutputs {
    current: PhaseLines,
    history: heapless::Vec<PhaseLines, 64>,
}

impl MockOutputs {
    pub fn new() -> Self {
        Self {
            current: [false; 4],
            history: heapless::Vec::new(),
        }
    }

    pub fn current(&self) -> PhaseLines {
        self.current
    }

    pub fn history(&self) -> &[PhaseLines] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl PhaseOutputs for MockOutputs {
    fn set_phase(&mut self, lines: PhaseLines) {
        self.current = lines;
        let _ = self.history.push(lines);
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given duration
    pub fn advance(&self, duration: TestDuration) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + duration.0));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

pub type TestMotor = StepperMotor<TestInstant, MockOutputs>;

/// 2048-step motor configured at `rpm`
pub fn motor_at(rpm: f32) -> TestMotor {
    let mut motor = StepperMotor::new(MockOutputs::new(), StepperConfig::byj48());
    motor.configure_speed(rpm).unwrap();
    motor
}

/// Ticks `motor` every `period` microseconds until the move completes,
/// returning the instants at which a phase change happened.
pub fn run_with_period(motor: &mut TestMotor, start: u64, period: u64) -> std::vec::Vec<u64> {
    let mut changes = std::vec::Vec::new();
    let mut now = start;

    while motor.is_moving() {
        let before = motor.remaining_steps();
        motor.tick(TestInstant(now));
        if motor.remaining_steps() != before {
            changes.push(now);
        }
        now += period;
    }

    changes
}
