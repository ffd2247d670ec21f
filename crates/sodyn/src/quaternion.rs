use glam::{Mat3, Quat, Vec3, Vec4};
use sodyn_core::{Error, Settings};
use sodyn_solvers::Registry;

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::{SecondOrderDynamics, Vector3Dynamics};

/// How a [`QuaternionDynamics`] represents the rotation it simulates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub enum QuaternionMode {
    /// One scalar system per `x`, `y`, `z`, `w` component.
    ///
    /// Cheap, but the raw result is generally not a unit quaternion; see
    /// [`QuaternionPolicy`].
    #[default]
    Components,

    /// Two vector systems driving the rotated forward (`+Z`) and up (`+Y`)
    /// directions, recombined with [`look_rotation`].
    ///
    /// Twice the cost of component mode, without its artifacts.
    Directions,
}

/// Post-processing applied in [`QuaternionMode::Components`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct QuaternionPolicy {
    /// Renormalize the output. A degenerate result repeats the previous
    /// output.
    pub normalize: bool,

    /// Negate the target when it lies in the opposite hemisphere of the
    /// current value, so the system takes the short way round.
    pub shortest_path: bool,
}

impl Default for QuaternionPolicy {
    fn default() -> Self {
        Self {
            normalize: true,
            shortest_path: true,
        }
    }
}

#[derive(Debug, Clone)]
enum Inner {
    Components([SecondOrderDynamics; 4]),
    Directions {
        forward: Vector3Dynamics,
        up: Vector3Dynamics,
    },
}

/// Smooths a rotation toward a target rotation.
#[derive(Debug, Clone)]
pub struct QuaternionDynamics {
    inner: Inner,
    policy: QuaternionPolicy,
    value: Quat,
}

impl QuaternionDynamics {
    /// Creates a system in `mode`, each scalar with a copy of `settings`.
    #[must_use]
    pub fn new(settings: &Settings, mode: QuaternionMode, initial: Quat) -> Self {
        let inner = match mode {
            QuaternionMode::Components => Inner::Components(
                initial
                    .to_array()
                    .map(|value| SecondOrderDynamics::from_settings(settings.clone(), value)),
            ),
            QuaternionMode::Directions => Inner::Directions {
                forward: Vector3Dynamics::from_settings(settings, initial * Vec3::Z),
                up: Vector3Dynamics::from_settings(settings, initial * Vec3::Y),
            },
        };
        Self {
            inner,
            policy: QuaternionPolicy::default(),
            value: initial,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: QuaternionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Resolves every scalar's strategy from `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsatisfiedStrategy`] if `registry` lacks the selected
    /// strategy.
    pub fn with_registry(self, registry: Registry) -> Result<Self, Error> {
        let inner = match self.inner {
            Inner::Components([x, y, z, w]) => Inner::Components([
                x.with_registry(registry)?,
                y.with_registry(registry)?,
                z.with_registry(registry)?,
                w.with_registry(registry)?,
            ]),
            Inner::Directions { forward, up } => Inner::Directions {
                forward: forward.with_registry(registry)?,
                up: up.with_registry(registry)?,
            },
        };
        Ok(Self { inner, ..self })
    }

    /// Advances toward `target` and returns the smoothed rotation.
    pub fn update(&mut self, delta_time: f32, target: Quat) -> Quat {
        let next = match &mut self.inner {
            Inner::Components(components) => {
                let target = if self.policy.shortest_path && self.value.dot(target) < 0.0 {
                    -target
                } else {
                    target
                };
                let mut raw = [0.0; 4];
                for ((out, component), value) in
                    raw.iter_mut().zip(components.iter_mut()).zip(target.to_array())
                {
                    *out = component.update(delta_time, value, None);
                }
                let raw = Vec4::from_array(raw);
                if self.policy.normalize {
                    normalized(raw).unwrap_or(self.value)
                } else {
                    Quat::from_vec4(raw)
                }
            }
            Inner::Directions { forward, up } => {
                let forward = forward.update(delta_time, target * Vec3::Z, None);
                let up = up.update(delta_time, target * Vec3::Y, None);
                look_rotation(forward, up).unwrap_or(self.value)
            }
        };
        self.value = next;
        next
    }

    /// Moves to `rotation` at rest.
    pub fn reset(&mut self, rotation: Quat) {
        match &mut self.inner {
            Inner::Components(components) => {
                for (component, value) in components.iter_mut().zip(rotation.to_array()) {
                    component.reset_to(value, 0.0);
                }
            }
            Inner::Directions { forward, up } => {
                forward.reset(rotation * Vec3::Z);
                up.reset(rotation * Vec3::Y);
            }
        }
        self.value = rotation;
    }

    /// Applies the same edit to every scalar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsatisfiedStrategy`] if the edit selects a strategy
    /// the registry lacks; nothing changes in that case.
    pub fn update_settings<F>(&mut self, edit: F) -> Result<(), Error>
    where
        F: Fn(&mut Settings),
    {
        let mut inner = self.inner.clone();
        match &mut inner {
            Inner::Components(components) => {
                for component in components {
                    component.update_settings(&edit)?;
                }
            }
            Inner::Directions { forward, up } => {
                forward.update_settings(&edit)?;
                up.update_settings(&edit)?;
            }
        }
        self.inner = inner;
        Ok(())
    }

    /// The last rotation returned by [`update`](Self::update).
    #[must_use]
    pub fn value(&self) -> Quat {
        self.value
    }

    #[must_use]
    pub fn mode(&self) -> QuaternionMode {
        match self.inner {
            Inner::Components(_) => QuaternionMode::Components,
            Inner::Directions { .. } => QuaternionMode::Directions,
        }
    }

    #[must_use]
    pub fn policy(&self) -> QuaternionPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: QuaternionPolicy) {
        self.policy = policy;
    }

    #[must_use]
    pub fn is_stable(&self) -> bool {
        match &self.inner {
            Inner::Components(components) => {
                components.iter().all(SecondOrderDynamics::is_stable)
            }
            Inner::Directions { forward, up } => forward.is_stable() && up.is_stable(),
        }
    }
}

/// Builds the rotation that maps `+Z` onto `forward` and `+Y` as close to
/// `up` as possible.
///
/// Returns `None` if `forward` is zero or parallel to `up`.
#[must_use]
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let forward = forward.normalize_or_zero();
    let right = up.cross(forward).normalize_or_zero();
    if forward == Vec3::ZERO || right == Vec3::ZERO {
        return None;
    }
    let up = forward.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, forward)))
}

fn normalized(raw: Vec4) -> Option<Quat> {
    let unit = raw.normalize_or_zero();
    (unit != Vec4::ZERO).then(|| Quat::from_vec4(unit))
}
