use sodyn_core::{Constants, Parameters, State, Strategy, StrategyKind};

use super::{begin, derive_constants, integrate};

/// Semi-implicit Euler that sub-steps until every sub-step is stable.
///
/// A step of `dt` runs `ceil(dt / maximum_time_step)` equal sub-steps toward
/// the same target, so cost grows linearly with `dt`. There is no cap: a
/// runaway `dt` costs a runaway number of sub-steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SemiImplicitEulerForcedIterations;

impl SemiImplicitEulerForcedIterations {
    /// Returns the number of sub-steps used for `delta_time`.
    #[must_use]
    pub fn iterations(constants: &Constants, delta_time: f32) -> usize {
        let max = constants.maximum_time_step;
        if !(max > 0.0) || !max.is_finite() || !delta_time.is_finite() {
            return 1;
        }
        // Saturating cast; at least one sub-step.
        ((delta_time / max).ceil() as usize).max(1)
    }
}

impl Strategy for SemiImplicitEulerForcedIterations {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SemiImplicitEulerForcedIterations
    }

    fn constants(&self, params: &Parameters) -> Constants {
        derive_constants(params)
    }

    fn step(&self, state: &mut State, delta_time: f32, target: f32, target_velocity: Option<f32>) {
        let Some(target_velocity) = begin(state, delta_time, target, target_velocity) else {
            return;
        };

        let Constants { k1, k2, .. } = state.constants;
        let iterations = Self::iterations(&state.constants, delta_time);
        #[allow(clippy::cast_precision_loss)]
        let sub_step = delta_time / iterations as f32;
        tracing::trace!(iterations, sub_step, "forced euler sub-steps");

        for _ in 0..iterations {
            integrate(state, sub_step, target, target_velocity, k1, k2);
        }
    }
}
