use sodyn_core::StabilityState;

/// One point of a sampled response curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Time since the start of the preview, in seconds.
    pub time: f32,
    pub target: f32,

    /// The value the dynamics returned, after any instability fallback.
    pub value: f32,
    pub stability: StabilityState,
}

/// Event emitted by [`simulate`](super::simulate) for each sample.
///
/// Step 0 is the initial state before any update.
/// Steps 1..N are emitted after each update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub step: usize,
    pub sample: Sample,
}
