//! Solving strategies for second-order dynamics.
//!
//! Every strategy implements [`Strategy`] and is a stateless unit struct; the
//! [`Registry`] maps a [`StrategyKind`] to its implementation.
//!
//! # Strategies
//!
//! - [`NoneStrategy`]: never moves
//! - [`Linear`]: snaps to the target
//! - [`euler`]: the semi-implicit Euler family: plain, forced iterations,
//!   clamped `k2` and jitter-free clamped `k2`
//! - [`PoleZeroMatching`]: exact discrete matching, stable at any `dt`
//!
//! [`Strategy`]: sodyn_core::Strategy
//! [`StrategyKind`]: sodyn_core::StrategyKind

pub mod euler;
mod linear;
mod none;
mod pole_zero;
mod registry;

pub use euler::{
    SemiImplicitEuler, SemiImplicitEulerClampedK2, SemiImplicitEulerClampedK2NoJitter,
    SemiImplicitEulerForcedIterations,
};
pub use linear::Linear;
pub use none::NoneStrategy;
pub use pole_zero::PoleZeroMatching;
pub use registry::{Registry, strategy};

#[cfg(test)]
mod test_utils;
