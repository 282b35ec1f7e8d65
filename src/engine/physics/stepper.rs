//! Fixed sub-step accumulator
//!
//! Splits a variable frame delta into fixed-size solver steps. Leftover time
//! is carried to the next call and exposed for motion-state interpolation.
//! When more steps are due than the budget allows, the excess time is
//! dropped rather than carried.

/// Deltas with a magnitude below this count as zero in variable-step mode
const FUZZY_ZERO: f32 = f32::EPSILON;

/// Outcome of one `advance` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    /// Steps owed by the accumulated time, before clamping
    pub due: u32,

    /// Steps to actually run (`due` clamped to the budget)
    pub run: u32,

    /// Duration of each step in seconds
    pub step_size: f32,
}

/// Accumulates frame time into fixed steps
#[derive(Debug, Clone, Default)]
pub struct FixedStepper {
    /// Time accumulated but not yet consumed by a step
    local_time: f32,
}

impl FixedStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed `dt` seconds and get the steps to run.
    ///
    /// With `max_substeps == 0` the stepper switches to variable mode: one
    /// step of exactly `dt`, or none when `dt` is zero.
    pub fn advance(&mut self, dt: f32, max_substeps: u32, fixed_timestep: f32) -> StepPlan {
        if max_substeps == 0 || fixed_timestep <= 0.0 {
            self.local_time = 0.0;
            let due = if dt.abs() < FUZZY_ZERO { 0 } else { 1 };
            return StepPlan {
                due,
                run: due,
                step_size: dt,
            };
        }

        self.local_time += dt;

        let mut due = 0;
        if self.local_time >= fixed_timestep {
            due = (self.local_time / fixed_timestep) as u32;
            self.local_time -= due as f32 * fixed_timestep;
        }

        StepPlan {
            due,
            run: due.min(max_substeps),
            step_size: fixed_timestep,
        }
    }

    /// Time carried over to the next call, in seconds
    pub fn local_time(&self) -> f32 {
        self.local_time
    }
}
