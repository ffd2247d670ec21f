use std::fmt;

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::State;

/// Values with a magnitude above this are classified as diverged.
pub const MAXIMUM_VALUE: f32 = 1_000_000.0;

/// Classification of whether a simulated value is usable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub enum StabilityState {
    #[default]
    Stable,

    /// The value is NaN, infinite or subnormal.
    DenormalizedValue,

    /// The value's magnitude exceeds [`MAXIMUM_VALUE`].
    BeyondMaximumLimit,

    /// The system has zero frequency and will never leave its initial value.
    NeverApproachingTarget,
}

impl StabilityState {
    /// Classifies a state.
    ///
    /// Checks run in a fixed order and the first match wins:
    ///
    /// 1. value approximately equal to the target: stable
    /// 2. value neither normal nor exactly zero: denormalized
    /// 3. `|value| > 1e6`: beyond maximum limit
    /// 4. target moved, but the value is still at the initial value with zero
    ///    velocity, zero frequency and nonzero elapsed time: never
    ///    approaching target
    /// 5. otherwise: stable
    ///
    /// This is a heuristic, not a stability proof.
    #[must_use]
    pub fn classify(state: &State) -> Self {
        let value = state.current_value;

        if approximately(value, state.target_value) {
            return Self::Stable;
        }
        if !value.is_normal() && value != 0.0 {
            return Self::DenormalizedValue;
        }
        if value.abs() > MAXIMUM_VALUE {
            return Self::BeyondMaximumLimit;
        }
        #[allow(clippy::float_cmp)]
        let pinned = state.target_value != state.initial_value
            && value == state.initial_value
            && state.current_velocity == 0.0
            && state.parameters.frequency == 0.0
            && state.elapsed_time != 0.0;
        if pinned {
            return Self::NeverApproachingTarget;
        }
        Self::Stable
    }

    #[must_use]
    pub fn is_stable(self) -> bool {
        self == Self::Stable
    }
}

impl fmt::Display for StabilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stable => "stable",
            Self::DenormalizedValue => "denormalized value",
            Self::BeyondMaximumLimit => "beyond maximum limit",
            Self::NeverApproachingTarget => "never approaching target",
        })
    }
}

/// The smallest positive `f32`, a subnormal of about `1.4e-45`.
const SMALLEST_SUBNORMAL: f32 = f32::from_bits(1);

/// Compares two floats with a tolerance relative to their magnitude.
///
/// Equal within `1e-6` of the larger magnitude. Near zero the floor is eight
/// times the smallest subnormal, not eight machine epsilons, so tiny values
/// are only "at" a zero target once they are practically zero.
#[must_use]
pub fn approximately(a: f32, b: f32) -> bool {
    (b - a).abs() < f32::max(1e-6 * f32::max(a.abs(), b.abs()), SMALLEST_SUBNORMAL * 8.0)
}

/// What an unstable update returns to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub enum InstabilityFallback {
    /// The target passed to the update.
    ReturnTarget,

    /// Zero.
    ReturnZero,

    /// The last value classified as stable.
    #[default]
    ReturnLastStable,

    /// The unstable value as computed. May be non-finite.
    ReturnCurrent,
}

/// How a dynamics instance responds to an unstable step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct InstabilityPolicy {
    pub fallback: InstabilityFallback,

    /// Reset to the initial value before the next step if still unstable.
    pub auto_reset: bool,
}

impl InstabilityPolicy {
    #[must_use]
    pub fn new(fallback: InstabilityFallback, auto_reset: bool) -> Self {
        Self {
            fallback,
            auto_reset,
        }
    }

    /// Picks the value to hand back after an unstable step.
    #[must_use]
    pub fn fallback_value(&self, state: &State, target: f32) -> f32 {
        match self.fallback {
            InstabilityFallback::ReturnTarget => target,
            InstabilityFallback::ReturnZero => 0.0,
            InstabilityFallback::ReturnLastStable => state.last_stable_value,
            InstabilityFallback::ReturnCurrent => state.current_value,
        }
    }
}
