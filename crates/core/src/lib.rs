//! Core types for second-order dynamics.
//!
//! This crate defines the data and abstractions that strategies and the
//! dynamics facade build on:
//!
//! - [`ValueRange`] and [`SamplingMode`]: configurable parameter windows and
//!   how they resolve to single values
//! - [`Settings`] and [`Preset`]: the user-facing configuration
//! - [`Parameters`], [`State`] and [`Constants`]: the numeric state of one
//!   scalar system
//! - [`Strategy`] and [`StrategyKind`]: the integration scheme interface
//! - [`StabilityState`] and [`InstabilityPolicy`]: divergence detection and
//!   recovery
//! - [`Observer`]: receives simulation events and may steer the simulation
//!
//! The system being simulated is
//!
//! ```text
//! y + k1·y' + k2·y'' = x + k3·x'
//! ```
//!
//! where `x` is the target, `y` the smoothed value and `k1`, `k2`, `k3` are
//! derived from frequency, damping and response.

mod error;
mod observer;
mod parameters;
mod preset;
mod range;
mod sampling;
mod settings;
mod stability;
mod state;
mod strategy;

pub use error::Error;
pub use observer::Observer;
pub use parameters::Parameters;
pub use preset::Preset;
pub use range::ValueRange;
pub use sampling::{SamplePhase, SamplingMode};
pub use settings::{
    DAMPING_LIMITS, FREQUENCY_LIMITS, RESPONSE_LIMITS, Settings, TIME_SCALE_LIMITS,
};
pub use stability::{
    InstabilityFallback, InstabilityPolicy, MAXIMUM_VALUE, StabilityState, approximately,
};
pub use state::{Constants, State};
pub use strategy::{Strategy, StrategyKind};
