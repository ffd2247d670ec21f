use std::fmt;

use rand::{SeedableRng, rngs::StdRng};
use sodyn_core::{
    Error, Parameters, Preset, SamplePhase, Settings, StabilityState, State, Strategy,
    StrategyKind,
};
use sodyn_solvers::Registry;
use tracing::{debug, warn};
use uom::si::{f32::Time, time::second};

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

/// A saved copy of everything a [`SecondOrderDynamics`] mutates while
/// stepping.
///
/// Snapshots capture state, not settings; restoring one after a settings
/// change re-derives the integration constants from the new settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct Snapshot {
    state: State,
    stability: StabilityState,
    time_scale: f32,
}

impl Snapshot {
    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    #[must_use]
    pub fn stability(&self) -> StabilityState {
        self.stability
    }
}

/// A scalar second-order system that smooths a value toward a target.
///
/// The instance owns its [`Settings`] and [`State`] and delegates the
/// numerical work to the [`Strategy`] the settings select. Each call to
/// [`update`](Self::update):
///
/// 1. resets to the initial value if the last step was unstable and the
///    instability policy asks for it
/// 2. resolves frequency, damping, response and the time scale from the
///    settings' ranges
/// 3. scales `delta_time` and advances the timers
/// 4. re-derives the integration constants if the parameters changed
/// 5. steps the strategy
/// 6. classifies the result and applies the instability fallback
///
/// Stepping never fails. Configuration errors, such as selecting a strategy
/// the registry lacks, surface when the configuration changes.
///
/// # Random sampling
///
/// With [`SamplingMode::Random`](sodyn_core::SamplingMode::Random) the
/// parameters are drawn afresh on every update and every reset. Construction,
/// including [`with_initial_value`](Self::with_initial_value), uses the
/// midpoint of each range instead, so a fresh instance is deterministic until
/// its first update.
#[derive(Clone)]
pub struct SecondOrderDynamics {
    settings: Settings,
    state: State,
    registry: Registry,
    strategy: &'static dyn Strategy,
    stability: StabilityState,
    time_scale: f32,
    dirty: bool,
    rng: StdRng,
    temporary: Option<Settings>,
    stack: Vec<(Snapshot, StdRng)>,
}

impl SecondOrderDynamics {
    /// Creates a pole-zero matching system resting at zero.
    ///
    /// Parameters outside the default limits are clamped.
    #[must_use]
    pub fn new(frequency: f32, damping: f32, response: f32) -> Self {
        Self::from_parameters(
            Parameters::new(frequency, damping, response),
            0.0,
            StrategyKind::default(),
        )
    }

    #[must_use]
    pub fn from_parameters(params: Parameters, initial_value: f32, strategy: StrategyKind) -> Self {
        Self::from_settings(Settings::new(params, strategy), initial_value)
    }

    /// Creates a system from existing settings, repairing broken limits.
    #[must_use]
    pub fn from_settings(mut settings: Settings, initial_value: f32) -> Self {
        if settings.repair() {
            debug!("repaired settings limits");
        }
        let params = Parameters::new(0.0, 0.0, 0.0);

        let mut dynamics = Self {
            strategy: sodyn_solvers::strategy(settings.strategy()),
            settings,
            state: State::new(params, initial_value),
            registry: Registry::builtin(),
            stability: StabilityState::Stable,
            time_scale: 1.0,
            dirty: true,
            rng: StdRng::from_os_rng(),
            temporary: None,
            stack: Vec::new(),
        };
        dynamics.resolve(SamplePhase::Initializing);
        dynamics.refresh_constants();
        dynamics
    }

    /// Returns `self` resting at `initial_value`.
    #[must_use]
    pub fn with_initial_value(mut self, initial_value: f32) -> Self {
        self.reset_with(initial_value, 0.0, SamplePhase::Initializing);
        self
    }

    /// Returns `self` with a seeded random number generator.
    ///
    /// Only [`SamplingMode::Random`](sodyn_core::SamplingMode::Random) draws
    /// from it.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Returns `self` resolving strategies from `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsatisfiedStrategy`] if `registry` lacks the
    /// selected strategy.
    pub fn with_registry(mut self, registry: Registry) -> Result<Self, Error> {
        self.strategy = registry.resolve(self.settings.strategy())?;
        self.registry = registry;
        self.dirty = true;
        self.refresh_constants();
        Ok(self)
    }

    /// Advances the system by `delta_time` toward `target` and returns the
    /// value to use.
    ///
    /// When `target_velocity` is `None` it is estimated from the previous
    /// target. If the step leaves the system unstable the returned value comes
    /// from the settings' [`InstabilityPolicy`](sodyn_core::InstabilityPolicy)
    /// and [`value`](Self::value) keeps the raw result.
    pub fn update(&mut self, delta_time: f32, target: f32, target_velocity: Option<f32>) -> f32 {
        let policy = self.settings.instability_policy();
        if policy.auto_reset && !self.stability.is_stable() {
            warn!(stability = %self.stability, "auto-resetting unstable dynamics");
            self.reset();
        }

        self.resolve(SamplePhase::Running);

        let delta_time = delta_time * self.time_scale;
        self.state.delta_time = delta_time;
        self.state.elapsed_time += delta_time;

        self.refresh_constants();
        self.strategy
            .step(&mut self.state, delta_time, target, target_velocity);

        self.stability = StabilityState::classify(&self.state);
        if self.stability.is_stable() {
            self.state.last_stable_value = self.state.current_value;
            return self.state.current_value;
        }

        let fallback = policy.fallback_value(&self.state, target);
        warn!(
            stability = %self.stability,
            value = self.state.current_value,
            target,
            policy = ?policy.fallback,
            fallback,
            "unstable step"
        );
        fallback
    }

    /// Advances the system by a dimensioned time step.
    pub fn update_by(
        &mut self,
        delta_time: Time,
        target: f32,
        target_velocity: Option<f32>,
    ) -> f32 {
        self.update(delta_time.get::<second>(), target, target_velocity)
    }

    /// Returns to the initial value at rest.
    pub fn reset(&mut self) {
        self.reset_to(self.state.initial_value, 0.0);
    }

    /// Moves to `value` with `velocity`, making `value` the new initial value.
    ///
    /// Timers and target history are cleared and, in random sampling mode,
    /// new parameters are drawn.
    pub fn reset_to(&mut self, value: f32, velocity: f32) {
        self.reset_with(value, velocity, SamplePhase::Running);
    }

    /// Selects a different strategy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsatisfiedStrategy`] if the registry lacks `kind`;
    /// the current strategy stays in place.
    pub fn set_strategy(&mut self, kind: StrategyKind) -> Result<(), Error> {
        self.update_settings(|settings| settings.set_strategy(kind))
    }

    /// Edits the settings in place.
    ///
    /// The edit is applied to a copy which is repaired and validated before
    /// it replaces the current settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsatisfiedStrategy`] if the edited settings select a
    /// strategy the registry lacks; nothing changes in that case.
    pub fn update_settings<F>(&mut self, edit: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.clone();
        edit(&mut settings);
        settings.repair();

        self.strategy = self.registry.resolve(settings.strategy())?;
        self.replace_settings(settings);
        Ok(())
    }

    /// Applies a preset's ranges permanently.
    pub fn apply_preset(&mut self, preset: &Preset) {
        let mut settings = self.settings.clone();
        settings.apply_preset(preset);
        self.replace_settings(settings);
    }

    /// Applies a preset until [`clear_temporary_settings`] is called.
    ///
    /// Only the settings in effect before the first call are kept, so
    /// repeated calls followed by one clear restore them exactly.
    ///
    /// [`clear_temporary_settings`]: Self::clear_temporary_settings
    pub fn set_temporary_settings(&mut self, preset: &Preset) {
        if self.temporary.is_none() {
            self.temporary = Some(self.settings.clone());
        }
        self.apply_preset(preset);
    }

    /// Restores the settings saved by [`set_temporary_settings`].
    ///
    /// Does nothing if no temporary settings are active.
    ///
    /// [`set_temporary_settings`]: Self::set_temporary_settings
    pub fn clear_temporary_settings(&mut self) {
        if let Some(settings) = self.temporary.take() {
            self.replace_settings(settings);
        }
    }

    #[must_use]
    pub fn has_temporary_settings(&self) -> bool {
        self.temporary.is_some()
    }

    /// Captures the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            stability: self.stability,
            time_scale: self.time_scale,
        }
    }

    /// Returns to a captured state.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.state = snapshot.state;
        self.stability = snapshot.stability;
        self.time_scale = snapshot.time_scale;
        self.dirty = true;
        self.refresh_constants();
    }

    /// Saves the current state on an internal stack.
    ///
    /// The random number generator is saved too, so random draws made between
    /// a push and its pop are replayed afterwards. Pair every push with a
    /// [`pop_state`](Self::pop_state).
    pub fn push_state(&mut self) {
        let snapshot = self.snapshot();
        self.stack.push((snapshot, self.rng.clone()));
    }

    /// Restores the most recently pushed state.
    ///
    /// Popping an empty stack does nothing.
    pub fn pop_state(&mut self) {
        if let Some((snapshot, rng)) = self.stack.pop() {
            self.rng = rng;
            self.restore(snapshot);
        }
    }

    /// Returns the number of pushed states.
    #[must_use]
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// The raw simulated value, even if unstable.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.state.current_value
    }

    #[must_use]
    pub fn velocity(&self) -> f32 {
        self.state.current_velocity
    }

    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.stability.is_stable()
    }

    #[must_use]
    pub fn stability(&self) -> StabilityState {
        self.stability
    }

    /// The resolved frequency in use.
    #[must_use]
    pub fn frequency(&self) -> f32 {
        self.state.parameters.frequency
    }

    /// The resolved damping in use.
    #[must_use]
    pub fn damping(&self) -> f32 {
        self.state.parameters.damping
    }

    /// The resolved response in use.
    #[must_use]
    pub fn response(&self) -> f32 {
        self.state.parameters.response
    }

    /// The resolved delta-time scale in use.
    #[must_use]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    #[must_use]
    pub fn parameters(&self) -> Parameters {
        self.state.parameters
    }

    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn strategy(&self) -> StrategyKind {
        self.strategy.kind()
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Swaps in settings whose strategy is already resolved.
    pub(crate) fn replace_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.dirty = true;
        self.resolve(SamplePhase::Initializing);
        self.refresh_constants();
    }

    fn reset_with(&mut self, value: f32, velocity: f32, phase: SamplePhase) {
        self.state.reset(value, velocity);
        self.stability = StabilityState::Stable;
        self.resolve(phase);
        self.dirty = true;
        self.refresh_constants();
    }

    /// Samples the parameters and time scale from the settings.
    fn resolve(&mut self, phase: SamplePhase) {
        let params = self.settings.sample_parameters(phase, &mut self.rng);
        self.time_scale = self.settings.sample_time_scale(phase, &mut self.rng);
        if params != self.state.parameters {
            self.state.parameters = params;
            self.dirty = true;
        }
    }

    fn refresh_constants(&mut self) {
        if !self.dirty {
            return;
        }
        self.state.constants = self.strategy.constants(&self.state.parameters);
        self.dirty = false;
        debug!(
            strategy = %self.strategy.kind(),
            f = self.state.parameters.frequency,
            z = self.state.parameters.damping,
            r = self.state.parameters.response,
            maximum_time_step = self.state.constants.maximum_time_step,
            "recomputed constants"
        );
    }
}

impl Default for SecondOrderDynamics {
    fn default() -> Self {
        Self::from_settings(Settings::default(), 0.0)
    }
}

impl fmt::Debug for SecondOrderDynamics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecondOrderDynamics")
            .field("strategy", &self.strategy.kind())
            .field("parameters", &self.state.parameters)
            .field("value", &self.state.current_value)
            .field("velocity", &self.state.current_velocity)
            .field("stability", &self.stability)
            .field("stack_depth", &self.stack.len())
            .finish_non_exhaustive()
    }
}
