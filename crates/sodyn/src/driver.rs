use glam::{Quat, Vec3};
use sodyn_core::{Error, Settings};

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::{Axis, QuaternionDynamics, QuaternionMode, Vector3Dynamics};

/// A position, rotation and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Drives one vector property of a transform.
///
/// Unlike [`Vector3Dynamics::update`], disabled axes keep the property's
/// current component rather than jumping to the target.
#[derive(Debug, Clone)]
pub struct Vector3Driver {
    dynamics: Vector3Dynamics,
}

/// Drives a transform's position.
pub type PositionDriver = Vector3Driver;

/// Drives a transform's scale.
pub type ScaleDriver = Vector3Driver;

/// Drives a transform's rotation.
pub type RotationDriver = QuaternionDynamics;

impl Vector3Driver {
    #[must_use]
    pub fn new(dynamics: Vector3Dynamics) -> Self {
        Self { dynamics }
    }

    #[must_use]
    pub fn from_settings(settings: &Settings, initial: Vec3) -> Self {
        Self::new(Vector3Dynamics::from_settings(settings, initial))
    }

    /// Advances toward `target` and returns the new property value.
    pub fn update(&mut self, delta_time: f32, current: Vec3, target: Vec3) -> Vec3 {
        let mut out = self.dynamics.update(delta_time, target, None);
        for axis in Axis::ALL {
            if !self.dynamics.is_enabled(axis) {
                out[axis.index()] = current[axis.index()];
            }
        }
        out
    }

    #[must_use]
    pub fn dynamics(&self) -> &Vector3Dynamics {
        &self.dynamics
    }

    pub fn dynamics_mut(&mut self) -> &mut Vector3Dynamics {
        &mut self.dynamics
    }
}

/// Smooths a whole [`Transform`] toward a target transform.
///
/// Properties without a driver are left as they are.
#[derive(Debug, Clone, Default)]
pub struct TransformDriver {
    pub position: Option<PositionDriver>,
    pub rotation: Option<RotationDriver>,
    pub scale: Option<ScaleDriver>,
}

impl TransformDriver {
    /// Drives every property of `initial` with a copy of `settings`.
    #[must_use]
    pub fn new(settings: &Settings, initial: &Transform) -> Self {
        Self {
            position: Some(PositionDriver::from_settings(settings, initial.position)),
            rotation: Some(RotationDriver::new(
                settings,
                QuaternionMode::default(),
                initial.rotation,
            )),
            scale: Some(ScaleDriver::from_settings(settings, initial.scale)),
        }
    }

    /// Advances every driven property and returns the new transform.
    pub fn update(
        &mut self,
        delta_time: f32,
        current: &Transform,
        target: &Transform,
    ) -> Transform {
        let mut next = *current;
        if let Some(driver) = &mut self.position {
            next.position = driver.update(delta_time, current.position, target.position);
        }
        if let Some(driver) = &mut self.rotation {
            next.rotation = driver.update(delta_time, target.rotation);
        }
        if let Some(driver) = &mut self.scale {
            next.scale = driver.update(delta_time, current.scale, target.scale);
        }
        next
    }

    /// Moves every driven property to `transform` at rest.
    pub fn reset(&mut self, transform: &Transform) {
        if let Some(driver) = &mut self.position {
            driver.dynamics_mut().reset(transform.position);
        }
        if let Some(driver) = &mut self.rotation {
            driver.reset(transform.rotation);
        }
        if let Some(driver) = &mut self.scale {
            driver.dynamics_mut().reset(transform.scale);
        }
    }

    /// Applies the same edit to every driven property.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsatisfiedStrategy`] if the edit selects a strategy
    /// the registry lacks; nothing changes in that case.
    pub fn update_settings<F>(&mut self, edit: F) -> Result<(), Error>
    where
        F: Fn(&mut Settings),
    {
        let mut next = self.clone();
        if let Some(driver) = &mut next.position {
            driver.dynamics_mut().update_settings(&edit)?;
        }
        if let Some(driver) = &mut next.rotation {
            driver.update_settings(&edit)?;
        }
        if let Some(driver) = &mut next.scale {
            driver.dynamics_mut().update_settings(&edit)?;
        }
        *self = next;
        Ok(())
    }

    /// Returns `true` if every driven property is stable.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.position
            .as_ref()
            .is_none_or(|driver| driver.dynamics().is_stable())
            && self.rotation.as_ref().is_none_or(RotationDriver::is_stable)
            && self
                .scale
                .as_ref()
                .is_none_or(|driver| driver.dynamics().is_stable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use sodyn_core::{Parameters, StrategyKind};

    const DT: f32 = 1.0 / 60.0;

    fn settings() -> Settings {
        Settings::new(Parameters::new(2.0, 1.0, 0.0), StrategyKind::default())
    }

    #[test]
    fn disabled_axis_keeps_current_component() {
        let mut driver = PositionDriver::from_settings(&settings(), Vec3::ZERO);
        driver.dynamics_mut().set_enabled(Axis::Z, false);

        let current = Vec3::new(0.0, 0.0, -7.0);
        let mut value = current;
        for _ in 0..3 {
            value = driver.update(DT, value, Vec3::splat(3.0));
        }

        assert_relative_eq!(value.z, -7.0);
        assert!(value.x > 0.0);
    }

    #[test]
    fn drives_whole_transform() {
        let mut driver = TransformDriver::new(&settings(), &Transform::IDENTITY);
        let target = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_y(1.0),
            scale: Vec3::splat(2.0),
        };

        let mut current = Transform::IDENTITY;
        for _ in 0..600 {
            current = driver.update(DT, &current, &target);
        }

        assert!(current.position.abs_diff_eq(target.position, 1e-3));
        assert!(current.rotation.abs_diff_eq(target.rotation, 1e-3));
        assert!(current.scale.abs_diff_eq(target.scale, 1e-3));
        assert!(driver.is_stable());
    }

    #[test]
    fn undriven_properties_are_untouched() {
        let mut driver = TransformDriver {
            rotation: None,
            scale: None,
            ..TransformDriver::new(&settings(), &Transform::IDENTITY)
        };
        let target = Transform {
            position: Vec3::ONE,
            rotation: Quat::from_rotation_x(1.0),
            scale: Vec3::splat(4.0),
        };

        let next = driver.update(DT, &Transform::IDENTITY, &target);

        assert_eq!(next.rotation, Quat::IDENTITY);
        assert_eq!(next.scale, Vec3::ONE);
    }

    #[test]
    fn settings_apply_to_every_property() {
        let mut driver = TransformDriver::new(&settings(), &Transform::IDENTITY);

        driver
            .update_settings(|settings| settings.set_strategy(StrategyKind::Linear))
            .expect("built in");
        let target = Transform {
            position: Vec3::ONE,
            rotation: Quat::from_rotation_z(0.5),
            scale: Vec3::splat(3.0),
        };
        let next = driver.update(DT, &Transform::IDENTITY, &target);

        assert_eq!(next.position, target.position);
        assert!(next.rotation.abs_diff_eq(target.rotation, 1e-6));
        assert_eq!(next.scale, target.scale);
    }
}
