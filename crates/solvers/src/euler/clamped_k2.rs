use sodyn_core::{Constants, Parameters, State, Strategy, StrategyKind};

use super::{begin, derive_constants, integrate};

/// Semi-implicit Euler with `k2` raised just enough to stay stable.
///
/// ```text
/// k2 = max(k2, 1.1 · (dt²/4 + dt·k1/2))
/// ```
///
/// As cheap as the plain step. The system slows down when `dt` is large, and
/// extreme target speed changes can still jitter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SemiImplicitEulerClampedK2;

impl SemiImplicitEulerClampedK2 {
    /// Returns the clamped `k2` for `delta_time`.
    #[must_use]
    pub fn stable_k2(constants: &Constants, delta_time: f32) -> f32 {
        let dt = delta_time;
        constants
            .k2
            .max(1.1 * (dt * dt / 4.0 + dt * constants.k1 / 2.0))
    }
}

impl Strategy for SemiImplicitEulerClampedK2 {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SemiImplicitEulerClampedK2
    }

    fn constants(&self, params: &Parameters) -> Constants {
        derive_constants(params)
    }

    fn step(&self, state: &mut State, delta_time: f32, target: f32, target_velocity: Option<f32>) {
        let Some(target_velocity) = begin(state, delta_time, target, target_velocity) else {
            return;
        };
        let k1 = state.constants.k1;
        let k2 = Self::stable_k2(&state.constants, delta_time);
        integrate(state, delta_time, target, target_velocity, k1, k2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::test_utils::{run, state_for};

    #[test]
    fn small_steps_keep_k2() {
        let constants = derive_constants(&Parameters::new(1.0, 1.0, 0.0));
        assert_relative_eq!(
            SemiImplicitEulerClampedK2::stable_k2(&constants, 1e-3),
            constants.k2
        );
    }

    #[test]
    fn large_steps_raise_k2() {
        let constants = derive_constants(&Parameters::new(3.0, 1.0, 0.0));
        let dt = 1.0;
        let expected = 1.1 * (dt * dt / 4.0 + dt * constants.k1 / 2.0);
        assert_relative_eq!(SemiImplicitEulerClampedK2::stable_k2(&constants, dt), expected);
    }

    #[test]
    fn stays_finite_with_large_steps() {
        let params = Parameters::new(3.0, 1.0, 0.0);
        let mut state = state_for(&SemiImplicitEulerClampedK2, params, 0.0);

        run(&SemiImplicitEulerClampedK2, &mut state, 1.0, 1.0, 200);

        assert!(state.current_value.is_finite());
        assert_relative_eq!(state.current_value, 1.0, epsilon = 1e-2);
    }
}
