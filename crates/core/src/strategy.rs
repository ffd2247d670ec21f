use std::fmt;

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::{Constants, Parameters, State};

/// Selects the numerical scheme used to advance a dynamics state.
///
/// | strategy | cost | stable for any `dt` |
/// |---|---|---|
/// | [`None`](Self::None) | free | n/a (frozen) |
/// | [`Linear`](Self::Linear) | free | n/a (pass-through) |
/// | [`SemiImplicitEuler`](Self::SemiImplicitEuler) | 1 step | no |
/// | [`SemiImplicitEulerForcedIterations`](Self::SemiImplicitEulerForcedIterations) | `ceil(dt / max_dt)` steps | yes |
/// | [`SemiImplicitEulerClampedK2`](Self::SemiImplicitEulerClampedK2) | 1 step | yes, may jitter |
/// | [`SemiImplicitEulerClampedK2NoJitter`](Self::SemiImplicitEulerClampedK2NoJitter) | 1 step | yes |
/// | [`PoleZeroMatching`](Self::PoleZeroMatching) | 1 step + `exp`/`cos` | yes, exact |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub enum StrategyKind {
    /// Never moves.
    None,

    /// Snaps straight to the target.
    Linear,

    /// Plain semi-implicit Euler. Diverges once `dt` exceeds the maximum
    /// stable time step.
    SemiImplicitEuler,

    /// Semi-implicit Euler sub-stepped so every sub-step is stable.
    SemiImplicitEulerForcedIterations,

    /// Semi-implicit Euler with `k2` clamped for stability.
    SemiImplicitEulerClampedK2,

    /// Semi-implicit Euler with a jitter-free `k2` clamp.
    SemiImplicitEulerClampedK2NoJitter,

    /// Discrete pole-zero matching of the continuous system.
    #[default]
    PoleZeroMatching,
}

impl StrategyKind {
    /// Every strategy, in declaration order.
    pub const ALL: [StrategyKind; 7] = [
        Self::None,
        Self::Linear,
        Self::SemiImplicitEuler,
        Self::SemiImplicitEulerForcedIterations,
        Self::SemiImplicitEulerClampedK2,
        Self::SemiImplicitEulerClampedK2NoJitter,
        Self::PoleZeroMatching,
    ];

    /// The number of strategies.
    pub const COUNT: usize = Self::ALL.len();

    /// Returns a dense index in `0..COUNT`.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns a stable, human-readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Linear => "linear",
            Self::SemiImplicitEuler => "semi-implicit euler",
            Self::SemiImplicitEulerForcedIterations => "semi-implicit euler (forced iterations)",
            Self::SemiImplicitEulerClampedK2 => "semi-implicit euler (clamped k2)",
            Self::SemiImplicitEulerClampedK2NoJitter => {
                "semi-implicit euler (clamped k2, no jitter)"
            }
            Self::PoleZeroMatching => "pole-zero matching",
        }
    }

    /// Returns `true` for strategies that actually integrate the system.
    #[must_use]
    pub fn is_dynamic(self) -> bool {
        !matches!(self, Self::None | Self::Linear)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A numerical scheme that advances a [`State`] by one time step.
///
/// Strategies carry no data of their own. Everything mutable lives in the
/// `State` passed in, which lets a single instance serve every dynamics
/// object in a program.
///
/// # Contract
///
/// - [`constants`](Self::constants) is pure. Callers invoke it whenever the
///   resolved [`Parameters`] or the strategy change and store the result in
///   [`State::constants`].
/// - [`step`](Self::step) assumes `state.constants` is current. It must
///   record the target through [`State::track_target`]. Dynamic strategies
///   leave the value untouched when the parameters are frozen or
///   `delta_time <= 0`.
pub trait Strategy: Send + Sync {
    /// The selector this strategy answers to.
    fn kind(&self) -> StrategyKind;

    /// Derives integration constants from parameters.
    fn constants(&self, params: &Parameters) -> Constants;

    /// Advances `state` by `delta_time` toward `target`.
    ///
    /// When `target_velocity` is `None` it is estimated from the previous
    /// target.
    fn step(&self, state: &mut State, delta_time: f32, target: f32, target_velocity: Option<f32>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense() {
        for (i, kind) in StrategyKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn default_is_pole_zero_matching() {
        assert_eq!(StrategyKind::default(), StrategyKind::PoleZeroMatching);
    }

    #[test]
    fn only_trivial_strategies_are_static() {
        let trivial: Vec<_> = StrategyKind::ALL
            .into_iter()
            .filter(|kind| !kind.is_dynamic())
            .collect();
        assert_eq!(trivial, vec![StrategyKind::None, StrategyKind::Linear]);
    }
}
