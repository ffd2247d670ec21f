//! The semi-implicit Euler family.
//!
//! All four variants share constant derivation:
//!
//! ```text
//! k1 = ζ / (π·f)
//! k2 = 1 / (2π·f)²
//! k3 = r / (2π·f)
//! maximum_time_step = 0.8 · (sqrt(4·k2 + k1²) − k1)
//! ```
//!
//! and the same integration step, which moves the position with the old
//! velocity and then the velocity with the new position:
//!
//! ```text
//! y  += dt · y'
//! y' += dt · (x + k3·x' − y − k1·y') / k2
//! ```
//!
//! They differ only in how they keep that step stable when `dt` grows past
//! `maximum_time_step`:
//!
//! - [`SemiImplicitEuler`] does nothing and diverges
//! - [`SemiImplicitEulerForcedIterations`] sub-steps
//! - [`SemiImplicitEulerClampedK2`] raises `k2`
//! - [`SemiImplicitEulerClampedK2NoJitter`] raises `k2` further, removing
//!   the jitter the plain clamp shows at extreme speed changes

mod clamped_k2;
mod forced_iterations;
mod no_jitter;

pub use clamped_k2::SemiImplicitEulerClampedK2;
pub use forced_iterations::SemiImplicitEulerForcedIterations;
pub use no_jitter::SemiImplicitEulerClampedK2NoJitter;

use std::f32::consts::{PI, TAU};

use sodyn_core::{Constants, Parameters, State, Strategy, StrategyKind};

/// Derives the constants shared by every Euler variant.
///
/// Frozen parameters yield [`Constants::FROZEN`].
#[must_use]
pub fn derive_constants(params: &Parameters) -> Constants {
    if params.is_frozen() {
        return Constants::FROZEN;
    }

    let Parameters {
        frequency: f,
        damping: z,
        response: r,
    } = *params;

    let w = TAU * f;
    let k1 = z / (PI * f);
    let k2 = 1.0 / (w * w);
    let k3 = r / w;

    Constants {
        k1,
        k2,
        k3,
        w,
        d: 0.0,
        maximum_time_step: maximum_time_step(k1, k2),
    }
}

/// The largest `dt` a plain step with these constants survives, with a 20%
/// margin.
#[must_use]
pub fn maximum_time_step(k1: f32, k2: f32) -> f32 {
    0.8 * ((4.0 * k2 + k1 * k1).sqrt() - k1)
}

/// Records the target and decides whether to integrate.
///
/// Returns the target velocity, or `None` if the state must hold: for frozen
/// parameters and for a `delta_time` that is not a positive finite number.
pub(crate) fn begin(
    state: &mut State,
    delta_time: f32,
    target: f32,
    target_velocity: Option<f32>,
) -> Option<f32> {
    let velocity = state.track_target(delta_time, target, target_velocity);
    if !(delta_time > 0.0 && delta_time.is_finite()) || state.parameters.is_frozen() {
        return None;
    }
    Some(velocity)
}

/// Advances position, then velocity, by one step with the given `k1`/`k2`.
pub(crate) fn integrate(
    state: &mut State,
    delta_time: f32,
    target: f32,
    target_velocity: f32,
    k1: f32,
    k2: f32,
) {
    let k3 = state.constants.k3;
    state.current_value += delta_time * state.current_velocity;
    state.current_velocity += delta_time
        * (target + k3 * target_velocity - state.current_value - k1 * state.current_velocity)
        / k2;
}

/// Plain semi-implicit Euler.
///
/// Cheapest of the family and exact enough at small `dt`, but unstable once
/// `dt` exceeds [`Constants::maximum_time_step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SemiImplicitEuler;

impl Strategy for SemiImplicitEuler {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SemiImplicitEuler
    }

    fn constants(&self, params: &Parameters) -> Constants {
        derive_constants(params)
    }

    fn step(&self, state: &mut State, delta_time: f32, target: f32, target_velocity: Option<f32>) {
        let Some(target_velocity) = begin(state, delta_time, target, target_velocity) else {
            return;
        };
        let Constants { k1, k2, .. } = state.constants;
        integrate(state, delta_time, target, target_velocity, k1, k2);
    }
}
