//! # Progress Tracker
//!
//! Volatile checklist state for the Solutions view.
//!
//! - Created empty each time the view is mounted
//! - Mutated only by [`StepProgress::toggle`]
//! - Never serialized to the durable store
//!
//! Progress math is integer-only; [`completion_ratio`] derives the float at
//! the edge and guards the empty-plan case.

use crate::catalog::SolutionPlan;
use crate::{CareError, StepId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of completed step identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepProgress {
    /// Uses BTreeSet for deterministic ordering.
    completed: BTreeSet<StepId>,
}

impl StepProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a step between completed and not completed.
    ///
    /// Returns `true` if the step is now completed.
    pub fn toggle(&mut self, step: StepId) -> bool {
        if self.completed.remove(&step) {
            false
        } else {
            self.completed.insert(step);
            true
        }
    }

    /// Owned variant of [`toggle`](Self::toggle).
    #[must_use]
    pub fn toggled(mut self, step: StepId) -> Self {
        self.toggle(step);
        self
    }

    #[must_use]
    pub fn is_completed(&self, step: &StepId) -> bool {
        self.completed.contains(step)
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepId> {
        self.completed.iter()
    }

    /// Forget every completed step (view unmount).
    pub fn clear(&mut self) {
        self.completed.clear();
    }
}

impl FromIterator<StepId> for StepProgress {
    fn from_iter<I: IntoIterator<Item = StepId>>(iter: I) -> Self {
        Self {
            completed: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// PLAN CHECKLIST
// =============================================================================

/// Every step identifier of a plan, immediate steps first.
#[must_use]
pub fn plan_steps(plan: &SolutionPlan) -> Vec<StepId> {
    let immediate = (0..plan.immediate_steps.len()).map(StepId::Immediate);
    let tasks = plan
        .healing_plan
        .iter()
        .enumerate()
        .flat_map(|(week, block)| (0..block.tasks.len()).map(move |task| StepId::Task { week, task }));
    immediate.chain(tasks).collect()
}

/// Check that a step identifier points at an item of the plan.
pub fn validate_step(plan: &SolutionPlan, step: StepId) -> Result<StepId, CareError> {
    let exists = match step {
        StepId::Immediate(index) => index < plan.immediate_steps.len(),
        StepId::Task { week, task } => plan
            .healing_plan
            .get(week)
            .is_some_and(|block| task < block.tasks.len()),
    };
    if exists {
        Ok(step)
    } else {
        Err(CareError::UnknownStep(step))
    }
}

// =============================================================================
// COMPLETION
// =============================================================================

/// Completed-versus-total summary for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub completed: usize,
    pub total: usize,
    /// Integer percentage, 0..=100.
    pub percent: u8,
}

impl Completion {
    #[must_use]
    pub fn new(progress: &StepProgress, total: usize) -> Self {
        let completed = progress.completed_count().min(total);
        let percent = if total > 0 {
            ((completed as u64).saturating_mul(100) / (total as u64)) as u8
        } else {
            0
        };
        Self {
            completed,
            total,
            percent: percent.min(100),
        }
    }

    /// Summary against a plan's total step count.
    #[must_use]
    pub fn for_plan(progress: &StepProgress, plan: &SolutionPlan) -> Self {
        Self::new(progress, plan.total_steps())
    }
}

/// Fraction of steps completed, in `[0, 1]`.
///
/// Returns `0.0` when `total_steps` is zero instead of dividing by zero.
#[must_use]
#[allow(clippy::float_arithmetic)]
pub fn completion_ratio(progress: &StepProgress, total_steps: usize) -> f64 {
    if total_steps == 0 {
        return 0.0;
    }
    let completed = progress.completed_count().min(total_steps);
    completed as f64 / total_steps as f64
}

// =============================================================================
// TESTS
// =============================================================================
