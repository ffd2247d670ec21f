use rand::Rng;

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::{
    InstabilityPolicy, Parameters, Preset, SamplePhase, SamplingMode, StrategyKind, ValueRange,
};

/// Default `[min, max]` limits of the frequency range (Hz).
pub const FREQUENCY_LIMITS: [f32; 2] = [0.0, 20.0];

/// Default `[min, max]` limits of the damping range.
pub const DAMPING_LIMITS: [f32; 2] = [0.0, 2.0];

/// Default `[min, max]` limits of the response range.
pub const RESPONSE_LIMITS: [f32; 2] = [-5.0, 5.0];

/// Default `[min, max]` limits of the delta-time scale range.
pub const TIME_SCALE_LIMITS: [f32; 2] = [0.0, 5.0];

/// User-facing configuration of a dynamics instance.
///
/// Parameters are configured as [`ValueRange`]s and resolved to single values
/// by the [`SamplingMode`]. The delta-time scale multiplies every time step
/// before integration, which lets a caller slow down or speed up one
/// instance without touching its parameters.
///
/// # Defaults
///
/// | range | limits | value |
/// |---|---|---|
/// | frequency | `[0, 20]` | 1 |
/// | damping | `[0, 2]` | 0.5 |
/// | response | `[-5, 5]` | 2 |
/// | time scale | `[0, 5]` | 1 |
///
/// The default strategy is [`StrategyKind::PoleZeroMatching`] and the default
/// sampling mode is [`SamplingMode::Fixed`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct Settings {
    frequency: ValueRange,
    damping: ValueRange,
    response: ValueRange,
    time_scale: ValueRange,
    strategy: StrategyKind,
    sampling: SamplingMode,
    instability: InstabilityPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(Parameters::new(1.0, 0.5, 2.0), StrategyKind::default())
    }
}

impl Settings {
    /// Creates settings pinned to `params` within the default limits.
    ///
    /// Out-of-limit parameters are clamped.
    #[must_use]
    pub fn new(params: Parameters, strategy: StrategyKind) -> Self {
        let pinned = |value, [min, max]: [f32; 2]| ValueRange::with_limits(value, value, min, max);
        Self {
            frequency: pinned(params.frequency, FREQUENCY_LIMITS),
            damping: pinned(params.damping, DAMPING_LIMITS),
            response: pinned(params.response, RESPONSE_LIMITS),
            time_scale: pinned(1.0, TIME_SCALE_LIMITS),
            strategy,
            sampling: SamplingMode::Fixed,
            instability: InstabilityPolicy::default(),
        }
    }

    /// Returns `self` with the given strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns `self` with the given sampling mode.
    #[must_use]
    pub fn with_sampling_mode(mut self, mode: SamplingMode) -> Self {
        self.set_sampling_mode(mode);
        self
    }

    /// Returns `self` with the given instability policy.
    #[must_use]
    pub fn with_instability_policy(mut self, policy: InstabilityPolicy) -> Self {
        self.instability = policy;
        self
    }

    #[must_use]
    pub fn frequency(&self) -> &ValueRange {
        &self.frequency
    }

    pub fn frequency_mut(&mut self) -> &mut ValueRange {
        &mut self.frequency
    }

    #[must_use]
    pub fn damping(&self) -> &ValueRange {
        &self.damping
    }

    pub fn damping_mut(&mut self) -> &mut ValueRange {
        &mut self.damping
    }

    #[must_use]
    pub fn response(&self) -> &ValueRange {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut ValueRange {
        &mut self.response
    }

    #[must_use]
    pub fn time_scale(&self) -> &ValueRange {
        &self.time_scale
    }

    pub fn time_scale_mut(&mut self) -> &mut ValueRange {
        &mut self.time_scale
    }

    #[must_use]
    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: StrategyKind) {
        self.strategy = strategy;
    }

    #[must_use]
    pub fn sampling_mode(&self) -> SamplingMode {
        self.sampling
    }

    /// Changes the sampling mode.
    ///
    /// Leaving [`SamplingMode::Fixed`] releases every pinned range.
    pub fn set_sampling_mode(&mut self, mode: SamplingMode) {
        if self.sampling == SamplingMode::Fixed && mode != SamplingMode::Fixed {
            for range in self.ranges_mut() {
                range.clear_force_fixed();
            }
        }
        self.sampling = mode;
    }

    #[must_use]
    pub fn instability_policy(&self) -> InstabilityPolicy {
        self.instability
    }

    pub fn set_instability_policy(&mut self, policy: InstabilityPolicy) {
        self.instability = policy;
    }

    /// Repairs any range with missing or inverted limits.
    ///
    /// Broken limits are replaced with the documented defaults. Returns
    /// `true` if anything changed.
    pub fn repair(&mut self) -> bool {
        let mut repaired = self.frequency.repair(FREQUENCY_LIMITS);
        repaired |= self.damping.repair(DAMPING_LIMITS);
        repaired |= self.response.repair(RESPONSE_LIMITS);
        repaired |= self.time_scale.repair(TIME_SCALE_LIMITS);
        repaired
    }

    /// Returns `true` if every range has valid limits.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.ranges().iter().all(|range| range.has_valid_limits())
    }

    pub fn sample_frequency<R: Rng + ?Sized>(&mut self, phase: SamplePhase, rng: &mut R) -> f32 {
        self.sampling.sample(&mut self.frequency, phase, rng)
    }

    pub fn sample_damping<R: Rng + ?Sized>(&mut self, phase: SamplePhase, rng: &mut R) -> f32 {
        self.sampling.sample(&mut self.damping, phase, rng)
    }

    pub fn sample_response<R: Rng + ?Sized>(&mut self, phase: SamplePhase, rng: &mut R) -> f32 {
        self.sampling.sample(&mut self.response, phase, rng)
    }

    pub fn sample_time_scale<R: Rng + ?Sized>(&mut self, phase: SamplePhase, rng: &mut R) -> f32 {
        self.sampling.sample(&mut self.time_scale, phase, rng)
    }

    /// Samples frequency, damping and response in one go.
    pub fn sample_parameters<R: Rng + ?Sized>(
        &mut self,
        phase: SamplePhase,
        rng: &mut R,
    ) -> Parameters {
        Parameters::new(
            self.sample_frequency(phase, rng),
            self.sample_damping(phase, rng),
            self.sample_response(phase, rng),
        )
    }

    /// Copies a preset's windows into the ranges, clamped into their limits.
    pub fn apply_preset(&mut self, preset: &Preset) {
        self.frequency.set_window(&preset.frequency);
        self.damping.set_window(&preset.damping);
        self.response.set_window(&preset.response);
        self.time_scale.set_window(&preset.time_scale);
    }

    fn ranges(&self) -> [&ValueRange; 4] {
        [
            &self.frequency,
            &self.damping,
            &self.response,
            &self.time_scale,
        ]
    }

    fn ranges_mut(&mut self) -> [&mut ValueRange; 4] {
        [
            &mut self.frequency,
            &mut self.damping,
            &mut self.response,
            &mut self.time_scale,
        ]
    }
}
