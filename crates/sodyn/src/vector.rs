use std::fmt;

use glam::Vec3;
use sodyn_core::{Error, Parameters, Settings, StrategyKind};
use sodyn_solvers::Registry;

use crate::SecondOrderDynamics;

/// A component of a three-dimensional vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        })
    }
}

/// Three independent scalar systems, one per axis.
///
/// Disabled axes are not simulated; [`update`](Self::update) returns their
/// held value unmodified.
#[derive(Debug, Clone)]
pub struct Vector3Dynamics {
    axes: [SecondOrderDynamics; 3],
    enabled: [bool; 3],
}

impl Vector3Dynamics {
    /// Creates a pole-zero matching system per axis resting at `initial`.
    #[must_use]
    pub fn new(frequency: f32, damping: f32, response: f32, initial: Vec3) -> Self {
        Self::from_settings(
            &Settings::new(
                Parameters::new(frequency, damping, response),
                StrategyKind::default(),
            ),
            initial,
        )
    }

    /// Creates one system per axis, each with a copy of `settings`.
    #[must_use]
    pub fn from_settings(settings: &Settings, initial: Vec3) -> Self {
        let axis = |value| SecondOrderDynamics::from_settings(settings.clone(), value);
        Self {
            axes: [axis(initial.x), axis(initial.y), axis(initial.z)],
            enabled: [true; 3],
        }
    }

    /// Seeds each axis from `seed` so random sampling differs per axis.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        let [x, y, z] = self.axes;
        Self {
            axes: [
                x.with_seed(seed),
                y.with_seed(seed.wrapping_add(1)),
                z.with_seed(seed.wrapping_add(2)),
            ],
            enabled: self.enabled,
        }
    }

    /// Resolves every axis' strategy from `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsatisfiedStrategy`] if `registry` lacks the selected
    /// strategy.
    pub fn with_registry(self, registry: Registry) -> Result<Self, Error> {
        let [x, y, z] = self.axes;
        Ok(Self {
            axes: [
                x.with_registry(registry)?,
                y.with_registry(registry)?,
                z.with_registry(registry)?,
            ],
            enabled: self.enabled,
        })
    }

    /// Advances every enabled axis toward `target`.
    pub fn update(
        &mut self,
        delta_time: f32,
        target: Vec3,
        target_velocity: Option<Vec3>,
    ) -> Vec3 {
        let mut out = Vec3::ZERO;
        for (i, axis) in self.axes.iter_mut().enumerate() {
            out[i] = if self.enabled[i] {
                axis.update(delta_time, target[i], target_velocity.map(|v| v[i]))
            } else {
                axis.value()
            };
        }
        out
    }

    /// Moves every axis to `value` at rest.
    pub fn reset(&mut self, value: Vec3) {
        for axis in Axis::ALL {
            self.axes[axis.index()].reset_to(value[axis.index()], 0.0);
        }
    }

    /// Applies the same edit to every axis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsatisfiedStrategy`] if the edit selects a strategy
    /// the registry lacks; no axis changes in that case.
    pub fn update_settings<F>(&mut self, edit: F) -> Result<(), Error>
    where
        F: Fn(&mut Settings),
    {
        let mut axes = self.axes.clone();
        for axis in &mut axes {
            axis.update_settings(&edit)?;
        }
        self.axes = axes;
        Ok(())
    }

    pub fn set_enabled(&mut self, axis: Axis, enabled: bool) {
        self.enabled[axis.index()] = enabled;
    }

    #[must_use]
    pub fn is_enabled(&self, axis: Axis) -> bool {
        self.enabled[axis.index()]
    }

    /// Returns `true` if every enabled axis is stable.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        Axis::ALL
            .into_iter()
            .filter(|axis| self.is_enabled(*axis))
            .all(|axis| self.axis(axis).is_stable())
    }

    /// The raw simulated value of every axis.
    #[must_use]
    pub fn value(&self) -> Vec3 {
        Vec3::from_array(self.axes.each_ref().map(SecondOrderDynamics::value))
    }

    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        Vec3::from_array(self.axes.each_ref().map(SecondOrderDynamics::velocity))
    }

    #[must_use]
    pub fn axis(&self, axis: Axis) -> &SecondOrderDynamics {
        &self.axes[axis.index()]
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut SecondOrderDynamics {
        &mut self.axes[axis.index()]
    }

    pub fn push_state(&mut self) {
        for axis in &mut self.axes {
            axis.push_state();
        }
    }

    pub fn pop_state(&mut self) {
        for axis in &mut self.axes {
            axis.pop_state();
        }
    }
}
