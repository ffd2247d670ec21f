use sodyn_core::{Constants, Parameters, State, Strategy, StrategyKind};

use super::{begin, derive_constants, integrate};

/// Semi-implicit Euler with a jitter-free `k2` clamp.
///
/// ```text
/// k2 = max(k2, dt²/2 + dt·k1/2, dt·k1)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SemiImplicitEulerClampedK2NoJitter;

impl SemiImplicitEulerClampedK2NoJitter {
    /// Returns the clamped `k2` for `delta_time`.
    #[must_use]
    pub fn stable_k2(k1: f32, k2: f32, delta_time: f32) -> f32 {
        let dt = delta_time;
        k2.max(dt * dt / 2.0 + dt * k1 / 2.0).max(dt * k1)
    }
}

impl Strategy for SemiImplicitEulerClampedK2NoJitter {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SemiImplicitEulerClampedK2NoJitter
    }

    fn constants(&self, params: &Parameters) -> Constants {
        derive_constants(params)
    }

    fn step(&self, state: &mut State, delta_time: f32, target: f32, target_velocity: Option<f32>) {
        let Some(target_velocity) = begin(state, delta_time, target, target_velocity) else {
            return;
        };
        let Constants { k1, k2, .. } = state.constants;
        let k2 = Self::stable_k2(k1, k2, delta_time);
        integrate(state, delta_time, target, target_velocity, k1, k2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::test_utils::{run, state_for};

    #[test]
    fn clamp_dominates_the_plain_clamp() {
        let constants = derive_constants(&Parameters::new(3.0, 1.0, 0.0));
        for dt in [0.05, 0.2, 1.0] {
            let plain = crate::SemiImplicitEulerClampedK2::stable_k2(&constants, dt);
            let smooth =
                SemiImplicitEulerClampedK2NoJitter::stable_k2(constants.k1, constants.k2, dt);
            assert!(smooth >= constants.k2);
            assert!(smooth >= plain * 0.9, "dt = {dt}");
        }
    }

    #[test]
    fn stays_bounded_at_large_dt() {
        let params = Parameters::new(5.0, 1.0, 0.0);
        let mut state = state_for(&SemiImplicitEulerClampedK2NoJitter, params, 0.0);

        for _ in 0..200 {
            SemiImplicitEulerClampedK2NoJitter.step(&mut state, 0.5, 1.0, None);
            assert!(state.current_value.abs() < 2.0, "{}", state.current_value);
        }
        assert_relative_eq!(state.current_value, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn converges_at_frame_rate() {
        let params = Parameters::new(2.0, 0.5, 1.0);
        let mut state = state_for(&SemiImplicitEulerClampedK2NoJitter, params, 0.0);

        run(&SemiImplicitEulerClampedK2NoJitter, &mut state, 1.0 / 60.0, -2.0, 600);

        assert_relative_eq!(state.current_value, -2.0, epsilon = 1e-3);
    }
}
