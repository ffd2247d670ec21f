use std::f32::consts::{PI, TAU};

use sodyn_core::{Constants, Parameters, State, Strategy, StrategyKind};

use crate::SemiImplicitEulerClampedK2NoJitter;
use crate::euler::{begin, integrate, maximum_time_step};

/// Discrete pole-zero matching of the continuous second-order system.
///
/// Constants:
///
/// ```text
/// w  = 2π·f
/// d  = w·sqrt(|ζ² − 1|)
/// k1 = ζ / (π·f)
/// k2 = 1 / w²
/// k3 = r·ζ / w
/// ```
///
/// Each step picks one of two regimes:
///
/// - **slow** (`w·dt < ζ`): `k2` is clamped to
///   `max(k2, dt²/2 + dt·k1/2, dt·k1)`, which is stable and jitter-free.
/// - **fast**: the effective `k1`/`k2` are matched to the exact decay of the
///   continuous system over `dt`:
///
///   ```text
///   t1    = exp(−ζ·w·dt)
///   alpha = 2·t1·cos(dt·d)   (ζ <= 1)
///         = 2·t1·cosh(dt·d)  (ζ > 1)
///   beta  = t1²
///   t2    = dt / (1 + beta − alpha)
///   k1    = (1 − beta)·t2
///   k2    = dt·t2
///   ```
///
/// Stable for any positive `dt`, at the cost of an `exp` and a `cos` per
/// fast step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoleZeroMatching;

impl PoleZeroMatching {
    /// Returns the effective `(k1, k2)` for a step of `delta_time`.
    #[must_use]
    pub fn stable_constants(constants: &Constants, damping: f32, delta_time: f32) -> (f32, f32) {
        let Constants { k1, k2, w, d, .. } = *constants;
        let dt = delta_time;

        let clamped = (k1, SemiImplicitEulerClampedK2NoJitter::stable_k2(k1, k2, dt));
        if w * dt < damping {
            return clamped;
        }

        let t1 = (-damping * w * dt).exp();
        let alpha = if damping <= 1.0 {
            2.0 * t1 * (dt * d).cos()
        } else {
            // 2·t1·cosh(dt·d) without overflowing cosh.
            (dt * (d - damping * w)).exp() + (-dt * (d + damping * w)).exp()
        };
        let beta = t1 * t1;
        let t2 = dt / (1.0 + beta - alpha);
        let matched = ((1.0 - beta) * t2, dt * t2);

        // An undamped system stepped by a whole period leaves nothing to match.
        if matched.0.is_finite() && matched.1.is_finite() && matched.1 > 0.0 {
            matched
        } else {
            clamped
        }
    }
}

impl Strategy for PoleZeroMatching {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PoleZeroMatching
    }

    fn constants(&self, params: &Parameters) -> Constants {
        if params.is_frozen() {
            return Constants::FROZEN;
        }

        let Parameters {
            frequency: f,
            damping: z,
            response: r,
        } = *params;

        let w = TAU * f;
        let d = w * (z * z - 1.0).abs().sqrt();
        let k1 = z / (PI * f);
        let k2 = 1.0 / (w * w);
        let k3 = r * z / w;

        Constants {
            k1,
            k2,
            k3,
            w,
            d,
            maximum_time_step: maximum_time_step(k1, k2),
        }
    }

    fn step(&self, state: &mut State, delta_time: f32, target: f32, target_velocity: Option<f32>) {
        let Some(target_velocity) = begin(state, delta_time, target, target_velocity) else {
            return;
        };
        let (k1, k2) =
            Self::stable_constants(&state.constants, state.parameters.damping, delta_time);
        integrate(state, delta_time, target, target_velocity, k1, k2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::test_utils::{run, state_for};

    #[test]
    fn derives_constants() {
        let constants = PoleZeroMatching.constants(&Parameters::new(2.0, 0.5, 1.5));
        let w = TAU * 2.0;

        assert_relative_eq!(constants.w, w);
        assert_relative_eq!(constants.d, w * 0.75_f32.sqrt());
        assert_relative_eq!(constants.k1, 0.5 / (PI * 2.0));
        assert_relative_eq!(constants.k2, 1.0 / (w * w));
        assert_relative_eq!(constants.k3, 1.5 * 0.5 / w);
    }

    #[test]
    fn slow_regime_matches_jitter_free_clamp() {
        let constants = PoleZeroMatching.constants(&Parameters::new(1.0, 1.0, 0.0));
        let dt = 0.01;
        assert!(constants.w * dt < 1.0);

        let (k1, k2) = PoleZeroMatching::stable_constants(&constants, 1.0, dt);

        assert_relative_eq!(k1, constants.k1);
        assert_relative_eq!(
            k2,
            SemiImplicitEulerClampedK2NoJitter::stable_k2(constants.k1, constants.k2, dt)
        );
    }

    #[test]
    fn fast_regime_matches_exact_decay() {
        let constants = PoleZeroMatching.constants(&Parameters::new(10.0, 0.5, 0.0));
        let dt = 0.1;

        let (k1, k2) = PoleZeroMatching::stable_constants(&constants, 0.5, dt);

        let t1 = (-0.5 * constants.w * dt).exp();
        let alpha = 2.0 * t1 * (dt * constants.d).cos();
        let beta = t1 * t1;
        let t2 = dt / (1.0 + beta - alpha);
        assert_relative_eq!(k1, (1.0 - beta) * t2);
        assert_relative_eq!(k2, dt * t2);
    }

    #[test]
    fn critically_damped_step_response() {
        let params = Parameters::new(3.0, 1.0, 0.0);
        let mut state = state_for(&PoleZeroMatching, params, 0.0);

        run(&PoleZeroMatching, &mut state, 1.0 / 60.0, 1.0, 180);

        assert_relative_eq!(state.current_value, 1.0, epsilon = 0.01);
    }

    #[test]
    fn finite_for_any_step_size() {
        for f in [0.1, 0.5, 1.0, 3.0, 7.5, 20.0] {
            for z in [0.0, 0.25, 0.5, 1.0, 1.5, 2.0] {
                for dt in [1e-4, 1.0 / 60.0, 0.1, 0.5, 1.0, 4.0, 100.0] {
                    let params = Parameters::new(f, z, 1.0);
                    let mut state = state_for(&PoleZeroMatching, params, 0.0);

                    for i in 0..200 {
                        let target = if i % 50 < 25 { 1.0 } else { -1.0 };
                        PoleZeroMatching.step(&mut state, dt, target, None);
                        assert!(
                            state.current_value.is_finite() && state.current_velocity.is_finite(),
                            "f = {f}, z = {z}, dt = {dt}, step {i}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn heavily_overdamped_large_step_does_not_overflow() {
        let constants = PoleZeroMatching.constants(&Parameters::new(20.0, 2.0, 0.0));

        let (k1, k2) = PoleZeroMatching::stable_constants(&constants, 2.0, 10.0);

        assert!(k1.is_finite() && k2.is_finite() && k2 > 0.0);
    }
}
