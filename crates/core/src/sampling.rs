use rand::Rng;

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::ValueRange;

/// How a [`ValueRange`] resolves to the single value a simulation uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub enum SamplingMode {
    /// Always zero.
    None,

    /// The range is pinned to a single value.
    #[default]
    Fixed,

    /// The lower end of the window.
    Minimum,

    /// The centre of the window.
    Midpoint,

    /// The upper end of the window.
    Maximum,

    /// A uniform draw from the window.
    ///
    /// Falls back to [`SamplingMode::Midpoint`] while initializing so that
    /// construction stays deterministic.
    Random,
}

/// Whether a sample is taken while an instance is being set up or while it
/// is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplePhase {
    Initializing,
    Running,
}

impl SamplingMode {
    /// Resolves `range` to a single value.
    ///
    /// [`SamplingMode::Fixed`] pins the range as a side effect.
    pub fn sample<R: Rng + ?Sized>(
        self,
        range: &mut ValueRange,
        phase: SamplePhase,
        rng: &mut R,
    ) -> f32 {
        match self {
            Self::None => 0.0,
            Self::Fixed => range.force_fixed(),
            Self::Minimum => range.minimum(),
            Self::Midpoint => range.midpoint(),
            Self::Maximum => range.maximum(),
            Self::Random => match phase {
                SamplePhase::Initializing => range.midpoint(),
                SamplePhase::Running => range.random(rng),
            },
        }
    }

    /// Returns `true` if repeated samples may differ.
    #[must_use]
    pub fn is_random(self) -> bool {
        matches!(self, Self::Random)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    fn range() -> ValueRange {
        ValueRange::with_limits(2.0, 4.0, 0.0, 10.0)
    }

    #[test]
    fn deterministic_modes() {
        let mut rng = StdRng::seed_from_u64(0);
        let phase = SamplePhase::Running;

        assert_relative_eq!(SamplingMode::None.sample(&mut range(), phase, &mut rng), 0.0);
        assert_relative_eq!(SamplingMode::Minimum.sample(&mut range(), phase, &mut rng), 2.0);
        assert_relative_eq!(SamplingMode::Midpoint.sample(&mut range(), phase, &mut rng), 3.0);
        assert_relative_eq!(SamplingMode::Maximum.sample(&mut range(), phase, &mut rng), 4.0);
    }

    #[test]
    fn fixed_pins_the_range() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut range = range();

        let value = SamplingMode::Fixed.sample(&mut range, SamplePhase::Running, &mut rng);

        assert_relative_eq!(value, 2.0);
        assert!(range.is_force_fixed());
    }

    #[test]
    fn random_is_midpoint_while_initializing() {
        let mut rng = StdRng::seed_from_u64(0);
        let value = SamplingMode::Random.sample(&mut range(), SamplePhase::Initializing, &mut rng);
        assert_relative_eq!(value, 3.0);
    }

    #[test]
    fn random_draws_from_the_window_while_running() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut range = range();

        for _ in 0..100 {
            let value = SamplingMode::Random.sample(&mut range, SamplePhase::Running, &mut rng);
            assert!((2.0..=4.0).contains(&value));
        }
    }
}
