use thiserror::Error;

use crate::StrategyKind;

/// Configuration errors.
///
/// Numerical instability is never an error; see
/// [`StabilityState`](crate::StabilityState).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("no solving strategy is registered for `{0}`")]
    UnsatisfiedStrategy(StrategyKind),

    #[error("a solving strategy is already registered for `{0}`")]
    DuplicateStrategy(StrategyKind),
}
