//! Second-order dynamics for smooth, physically flavoured motion.
//!
//! A [`SecondOrderDynamics`] drives a value toward a moving target the way a
//! damped spring would. Its character is set by three parameters:
//!
//! - **frequency** `f` (Hz): how fast the system responds
//! - **damping** `ζ`: `0` oscillates forever, `1` settles without overshoot,
//!   above `1` settles sluggishly
//! - **response** `r`: `0` eases in, `1` reacts immediately, above `1`
//!   overshoots and below `0` anticipates
//!
//! ```
//! use sodyn::SecondOrderDynamics;
//!
//! let mut dynamics = SecondOrderDynamics::new(3.0, 1.0, 0.0);
//! for _ in 0..180 {
//!     dynamics.update(1.0 / 60.0, 1.0, None);
//! }
//! assert!((dynamics.value() - 1.0).abs() < 0.01);
//! ```
//!
//! Beyond the scalar facade this crate provides:
//!
//! - [`Vector3Dynamics`] and [`QuaternionDynamics`], which run one scalar
//!   system per component
//! - [`TransformDriver`], which smooths a whole position/rotation/scale
//!   transform
//! - [`preview`], which samples a response curve without disturbing the
//!   instance it runs on

mod driver;
mod dynamics;
pub mod preview;
mod quaternion;
mod vector;

pub use driver::{
    PositionDriver, RotationDriver, ScaleDriver, Transform, TransformDriver, Vector3Driver,
};
pub use dynamics::{SecondOrderDynamics, Snapshot};
pub use quaternion::{QuaternionDynamics, QuaternionMode, QuaternionPolicy, look_rotation};
pub use vector::{Axis, Vector3Dynamics};

pub use sodyn_core::{
    Error, InstabilityFallback, InstabilityPolicy, Observer, Parameters, Preset, SamplingMode,
    Settings, StabilityState, StrategyKind, ValueRange,
};
pub use sodyn_solvers::Registry;
