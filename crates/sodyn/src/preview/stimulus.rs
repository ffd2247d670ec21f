use std::f32::consts::TAU;

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

/// The target signal a preview feeds to the dynamics.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub enum Stimulus {
    /// Rests at `from`, then jumps to `to` at time zero.
    Step { from: f32, to: f32 },

    /// Moves linearly from `from` to `to` over `duration` seconds, then holds.
    Ramp { from: f32, to: f32, duration: f32 },

    /// Oscillates around `offset`. `frequency` is in Hz.
    Sine {
        offset: f32,
        amplitude: f32,
        frequency: f32,
    },
}

impl Default for Stimulus {
    fn default() -> Self {
        Self::Step { from: 0.0, to: 1.0 }
    }
}

impl Stimulus {
    /// The value the dynamics rests at before the preview starts.
    #[must_use]
    pub fn initial_value(&self) -> f32 {
        match *self {
            Self::Step { from, .. } | Self::Ramp { from, .. } => from,
            Self::Sine { offset, .. } => offset,
        }
    }

    /// The target at `time` seconds.
    #[must_use]
    pub fn target_at(&self, time: f32) -> f32 {
        match *self {
            Self::Step { to, .. } => to,
            Self::Ramp { from, to, duration } => {
                if duration > 0.0 {
                    from + (to - from) * (time / duration).clamp(0.0, 1.0)
                } else {
                    to
                }
            }
            Self::Sine {
                offset,
                amplitude,
                frequency,
            } => offset + amplitude * (TAU * frequency * time).sin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn step_jumps_immediately() {
        let step = Stimulus::Step { from: -1.0, to: 2.0 };

        assert_relative_eq!(step.initial_value(), -1.0);
        assert_relative_eq!(step.target_at(0.0), 2.0);
        assert_relative_eq!(step.target_at(10.0), 2.0);
    }

    #[test]
    fn ramp_holds_at_end() {
        let ramp = Stimulus::Ramp {
            from: 0.0,
            to: 4.0,
            duration: 2.0,
        };

        assert_relative_eq!(ramp.target_at(0.0), 0.0);
        assert_relative_eq!(ramp.target_at(0.5), 1.0);
        assert_relative_eq!(ramp.target_at(5.0), 4.0);
    }

    #[test]
    fn instant_ramp_is_a_step() {
        let ramp = Stimulus::Ramp {
            from: 0.0,
            to: 4.0,
            duration: 0.0,
        };
        assert_relative_eq!(ramp.target_at(0.0), 4.0);
    }

    #[test]
    fn sine_oscillates_around_offset() {
        let sine = Stimulus::Sine {
            offset: 1.0,
            amplitude: 2.0,
            frequency: 0.25,
        };

        assert_relative_eq!(sine.initial_value(), 1.0);
        assert_relative_eq!(sine.target_at(1.0), 3.0, epsilon = 1e-6);
        assert_relative_eq!(sine.target_at(3.0), -1.0, epsilon = 1e-5);
    }
}
