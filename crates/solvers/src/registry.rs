use std::fmt;

use sodyn_core::{Error, Strategy, StrategyKind};
use tracing::debug;

use crate::{
    Linear, NoneStrategy, PoleZeroMatching, SemiImplicitEuler, SemiImplicitEulerClampedK2,
    SemiImplicitEulerClampedK2NoJitter, SemiImplicitEulerForcedIterations,
};

static BUILTIN: Registry = Registry {
    entries: [
        Some(&NoneStrategy),
        Some(&Linear),
        Some(&SemiImplicitEuler),
        Some(&SemiImplicitEulerForcedIterations),
        Some(&SemiImplicitEulerClampedK2),
        Some(&SemiImplicitEulerClampedK2NoJitter),
        Some(&PoleZeroMatching),
    ],
};

/// Returns the built-in implementation of `kind`.
#[must_use]
pub fn strategy(kind: StrategyKind) -> &'static dyn Strategy {
    match kind {
        StrategyKind::None => &NoneStrategy,
        StrategyKind::Linear => &Linear,
        StrategyKind::SemiImplicitEuler => &SemiImplicitEuler,
        StrategyKind::SemiImplicitEulerForcedIterations => &SemiImplicitEulerForcedIterations,
        StrategyKind::SemiImplicitEulerClampedK2 => &SemiImplicitEulerClampedK2,
        StrategyKind::SemiImplicitEulerClampedK2NoJitter => &SemiImplicitEulerClampedK2NoJitter,
        StrategyKind::PoleZeroMatching => &PoleZeroMatching,
    }
}

/// Maps each [`StrategyKind`] to at most one strategy implementation.
///
/// The table is indexed by [`StrategyKind::index`], so lookups are a single
/// array access and a registry is cheap to copy.
///
/// [`Registry::builtin`] holds every strategy this crate ships. A custom
/// registry can leave selectors out or swap implementations in; selecting a
/// missing strategy is reported as [`Error::UnsatisfiedStrategy`] rather than
/// silently falling back to another scheme.
#[derive(Clone, Copy)]
pub struct Registry {
    entries: [Option<&'static dyn Strategy>; StrategyKind::COUNT],
}

impl Registry {
    /// Creates a registry with no strategies.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: [None; StrategyKind::COUNT],
        }
    }

    /// Returns the registry of built-in strategies.
    #[must_use]
    pub fn builtin() -> Self {
        BUILTIN
    }

    /// Adds a strategy under the kind it reports.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateStrategy`] if that kind is already taken.
    pub fn register(&mut self, strategy: &'static dyn Strategy) -> Result<(), Error> {
        let kind = strategy.kind();
        let slot = &mut self.entries[kind.index()];
        if slot.is_some() {
            return Err(Error::DuplicateStrategy(kind));
        }
        *slot = Some(strategy);
        debug!(strategy = %kind, count = self.len(), "registered strategy");
        Ok(())
    }

    /// Adds or replaces a strategy, returning the one it displaced.
    pub fn replace(&mut self, strategy: &'static dyn Strategy) -> Option<&'static dyn Strategy> {
        let kind = strategy.kind();
        let previous = self.entries[kind.index()].replace(strategy);
        debug!(strategy = %kind, replaced = previous.is_some(), "replaced strategy");
        previous
    }

    /// Removes the strategy for `kind`, if any.
    pub fn remove(&mut self, kind: StrategyKind) -> Option<&'static dyn Strategy> {
        self.entries[kind.index()].take()
    }

    /// Looks up the strategy for `kind`.
    #[must_use]
    pub fn get(&self, kind: StrategyKind) -> Option<&'static dyn Strategy> {
        self.entries[kind.index()]
    }

    /// Looks up the strategy for `kind`, failing loudly if it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsatisfiedStrategy`] if nothing is registered for
    /// `kind`.
    pub fn resolve(&self, kind: StrategyKind) -> Result<&'static dyn Strategy, Error> {
        self.get(kind).ok_or(Error::UnsatisfiedStrategy(kind))
    }

    #[must_use]
    pub fn contains(&self, kind: StrategyKind) -> bool {
        self.get(kind).is_some()
    }

    /// Iterates over the registered kinds in declaration order.
    pub fn kinds(&self) -> impl Iterator<Item = StrategyKind> + '_ {
        StrategyKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use sodyn_core::{Constants, Parameters, State};

    #[test]
    fn builtin_covers_every_kind() {
        let registry = Registry::builtin();

        assert_eq!(registry.len(), StrategyKind::COUNT);
        for kind in StrategyKind::ALL {
            let resolved = registry.resolve(kind).expect("built in");
            assert_eq!(resolved.kind(), kind);
            assert_eq!(strategy(kind).kind(), kind);
        }
    }

    #[test]
    fn missing_kind_is_an_error() {
        let mut registry = Registry::builtin();
        registry.remove(StrategyKind::PoleZeroMatching);

        assert!(registry.get(StrategyKind::PoleZeroMatching).is_none());
        assert_eq!(
            registry.resolve(StrategyKind::PoleZeroMatching).err(),
            Some(Error::UnsatisfiedStrategy(StrategyKind::PoleZeroMatching))
        );
        assert_eq!(registry.len(), StrategyKind::COUNT - 1);
    }

    #[test]
    fn empty_registry_has_nothing() {
        let registry = Registry::empty();

        assert!(registry.is_empty());
        assert_eq!(registry.kinds().count(), 0);
        assert_eq!(format!("{registry:?}"), "{}");
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut registry = Registry::empty();

        registry.register(&Linear).expect("first registration");
        assert_eq!(
            registry.register(&Linear),
            Err(Error::DuplicateStrategy(StrategyKind::Linear))
        );
        assert_eq!(registry.kinds().collect::<Vec<_>>(), [StrategyKind::Linear]);
    }

    /// A linear strategy that lands halfway to the target.
    struct HalfwayLinear;

    impl Strategy for HalfwayLinear {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Linear
        }

        fn constants(&self, _params: &Parameters) -> Constants {
            Constants::FROZEN
        }

        fn step(&self, state: &mut State, dt: f32, target: f32, target_velocity: Option<f32>) {
            state.track_target(dt, target, target_velocity);
            state.current_value += (target - state.current_value) / 2.0;
        }
    }

    #[test]
    fn replace_swaps_in_custom_strategy() {
        let mut registry = Registry::builtin();

        let previous = registry.replace(&HalfwayLinear).expect("linear was built in");
        assert_eq!(previous.kind(), StrategyKind::Linear);

        let mut state = State::new(Parameters::new(1.0, 1.0, 0.0), 0.0);
        registry
            .resolve(StrategyKind::Linear)
            .expect("replaced")
            .step(&mut state, 0.1, 4.0, None);
        assert!((state.current_value - 2.0).abs() < 1e-6);
    }
}
