#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::Parameters;

/// Integration constants derived from [`Parameters`].
///
/// These are a cache: they are never persisted and must be re-derived
/// whenever the parameters or the strategy change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constants {
    pub k1: f32,
    pub k2: f32,
    pub k3: f32,

    /// Angular frequency `2πf` (pole-zero matching only).
    pub w: f32,

    /// Damped frequency `w·sqrt(|ζ² − 1|)` (pole-zero matching only).
    pub d: f32,

    /// Largest `dt` a plain semi-implicit Euler step survives.
    pub maximum_time_step: f32,
}

impl Constants {
    /// Constants of a system with no stiffness.
    ///
    /// `k2` is infinite, so any acceleration term vanishes.
    pub const FROZEN: Self = Self {
        k1: 0.0,
        k2: f32::INFINITY,
        k3: 0.0,
        w: 0.0,
        d: 0.0,
        maximum_time_step: f32::INFINITY,
    };
}

impl Default for Constants {
    fn default() -> Self {
        Self::FROZEN
    }
}

/// The mutable numeric state of one scalar dynamics instance.
///
/// `State` is plain data; strategies and the dynamics facade operate on it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct State {
    /// The resolved parameters the constants were derived from.
    pub parameters: Parameters,

    pub initial_value: f32,
    pub target_value: f32,
    pub previous_target_value: f32,

    /// The scaled time step of the last update.
    pub delta_time: f32,

    /// Scaled time accumulated since the last reset.
    pub elapsed_time: f32,

    pub current_value: f32,
    pub current_velocity: f32,

    /// The most recent value classified as stable.
    pub last_stable_value: f32,

    #[cfg_attr(feature = "serde-derive", serde(skip))]
    pub constants: Constants,
}

impl State {
    /// Creates a state resting at `initial_value`.
    ///
    /// The constants start frozen; derive them before stepping.
    #[must_use]
    pub fn new(parameters: Parameters, initial_value: f32) -> Self {
        Self {
            parameters,
            initial_value,
            target_value: initial_value,
            previous_target_value: initial_value,
            delta_time: 0.0,
            elapsed_time: 0.0,
            current_value: initial_value,
            current_velocity: 0.0,
            last_stable_value: initial_value,
            constants: Constants::FROZEN,
        }
    }

    /// Moves the state to `value` with `velocity` and clears the timers.
    ///
    /// The target history restarts at `value`. Parameters and constants are
    /// kept.
    pub fn reset(&mut self, value: f32, velocity: f32) {
        self.initial_value = value;
        self.target_value = value;
        self.previous_target_value = value;
        self.delta_time = 0.0;
        self.elapsed_time = 0.0;
        self.current_value = value;
        self.current_velocity = velocity;
        self.last_stable_value = value;
    }

    /// Records a new target and returns its velocity.
    ///
    /// When `target_velocity` is `None` the velocity is estimated as
    /// `(target − previous_target) / delta_time`, or zero if `delta_time` is
    /// not positive. The previous target is always updated.
    pub fn track_target(
        &mut self,
        delta_time: f32,
        target: f32,
        target_velocity: Option<f32>,
    ) -> f32 {
        let velocity = target_velocity.unwrap_or_else(|| {
            if delta_time > 0.0 {
                (target - self.previous_target_value) / delta_time
            } else {
                0.0
            }
        });
        self.target_value = target;
        self.previous_target_value = target;
        velocity
    }
}
