use super::Sample;

/// Indicates how a preview terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Completed all requested steps.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// A sampled response curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub status: Status,

    /// Samples from each step, including the initial state.
    pub history: Vec<Sample>,

    /// Number of updates completed.
    pub steps: usize,
}

impl Solution {
    /// Iterates over the `(time, value)` pairs of the curve.
    pub fn points(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.history.iter().map(|sample| (sample.time, sample.value))
    }

    /// Returns the largest value reached, if any samples exist.
    #[must_use]
    pub fn peak(&self) -> Option<f32> {
        self.history.iter().map(|sample| sample.value).reduce(f32::max)
    }

    /// Returns `true` if every sample was stable.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.history.iter().all(|sample| sample.stability.is_stable())
    }
}
