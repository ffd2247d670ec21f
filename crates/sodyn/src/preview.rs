//! Response curve sampling.
//!
//! [`simulate`] runs a [`SecondOrderDynamics`] against a [`Stimulus`] with a
//! fixed time step and records the result, the way an editor draws a preview
//! graph. The instance is left exactly as it was found: its state is pushed
//! before the run and popped after, and its settings are restored.
//!
//! # Example
//!
//! ```
//! use sodyn::SecondOrderDynamics;
//! use sodyn::preview::{self, Preview, Stimulus};
//!
//! let mut dynamics = SecondOrderDynamics::new(2.0, 0.5, 0.0);
//! let preview = Preview::new(Stimulus::Step { from: 0.0, to: 1.0 }, 1.0 / 60.0, 120);
//!
//! let solution = preview::simulate_unobserved(&mut dynamics, &preview);
//!
//! assert_eq!(solution.history.len(), 121);
//! assert!(solution.peak().unwrap() > 1.0);
//! assert_eq!(dynamics.value(), 0.0);
//! ```

mod action;
mod event;
mod solution;
mod stimulus;

pub use action::Action;
pub use event::{Event, Sample};
pub use solution::{Solution, Status};
pub use stimulus::Stimulus;

use sodyn_core::{Observer, Preset};

use crate::SecondOrderDynamics;

/// Samples reserved up front. Longer previews grow the history as they go.
const RESERVED_SAMPLES: usize = 1 << 16;

/// What to simulate.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub stimulus: Stimulus,
    pub delta_time: f32,
    pub steps: usize,

    /// Ranges to preview instead of the instance's own.
    pub preset: Option<Preset>,
}

impl Preview {
    #[must_use]
    pub fn new(stimulus: Stimulus, delta_time: f32, steps: usize) -> Self {
        Self {
            stimulus,
            delta_time,
            steps,
            preset: None,
        }
    }

    /// Covers `duration` seconds at `delta_time` per step.
    ///
    /// A `delta_time` tiny enough to need more than `usize::MAX` steps
    /// saturates at `usize::MAX`.
    #[must_use]
    pub fn over(stimulus: Stimulus, delta_time: f32, duration: f32) -> Self {
        let steps = if delta_time > 0.0 {
            (duration / delta_time).ceil().max(0.0) as usize
        } else {
            0
        };
        Self::new(stimulus, delta_time, steps)
    }

    #[must_use]
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = Some(preset);
        self
    }
}

/// Samples the response of `dynamics` to a stimulus.
///
/// # Algorithm
///
/// 1. Push the state and save the settings.
/// 2. Apply the preview's preset, if any.
/// 3. Reset to the stimulus' initial value.
/// 4. Emit step 0, then for each step:
///    - Update with the stimulus' target at the step's time.
///    - Emit an [`Event`] to the observer.
///    - If the observer returns [`Action::StopEarly`], stop.
/// 5. Restore the settings and pop the state.
///
/// In random sampling mode the run draws parameters as usual. The random
/// number generator is pushed with the state, so the instance's own draws
/// afterwards are the ones it would have made without the preview.
pub fn simulate<Obs>(
    dynamics: &mut SecondOrderDynamics,
    preview: &Preview,
    mut observer: Obs,
) -> Solution
where
    Obs: Observer<Event, Action>,
{
    let settings = dynamics.settings().clone();
    dynamics.push_state();
    if let Some(preset) = &preview.preset {
        dynamics.apply_preset(preset);
    }

    let solution = sample(dynamics, preview, &mut observer);

    dynamics.replace_settings(settings);
    dynamics.pop_state();
    solution
}

/// Samples a response without observation.
///
/// This is a convenience wrapper around [`simulate`] that discards events.
pub fn simulate_unobserved(dynamics: &mut SecondOrderDynamics, preview: &Preview) -> Solution {
    simulate(dynamics, preview, ())
}

fn sample<Obs>(
    dynamics: &mut SecondOrderDynamics,
    preview: &Preview,
    observer: &mut Obs,
) -> Solution
where
    Obs: Observer<Event, Action>,
{
    let Preview {
        stimulus,
        delta_time,
        steps,
        ..
    } = *preview;

    dynamics.reset_to(stimulus.initial_value(), 0.0);

    let mut history = Vec::with_capacity(steps.saturating_add(1).min(RESERVED_SAMPLES));
    let initial = Sample {
        time: 0.0,
        target: stimulus.target_at(0.0),
        value: dynamics.value(),
        stability: dynamics.stability(),
    };
    history.push(initial);

    if let Some(Action::StopEarly) = observer.observe(&Event {
        step: 0,
        sample: initial,
    }) {
        return Solution {
            status: Status::StoppedByObserver,
            history,
            steps: 0,
        };
    }

    for step in 1..=steps {
        let time = step as f32 * delta_time;
        let target = stimulus.target_at(time);
        let value = dynamics.update(delta_time, target, None);

        let sample = Sample {
            time,
            target,
            value,
            stability: dynamics.stability(),
        };
        history.push(sample);

        if let Some(Action::StopEarly) = observer.observe(&Event { step, sample }) {
            return Solution {
                status: Status::StoppedByObserver,
                history,
                steps: step,
            };
        }
    }

    Solution {
        status: Status::Complete,
        history,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use sodyn_core::{Parameters, SamplingMode, Settings, StrategyKind};

    const DT: f32 = 1.0 / 60.0;

    fn step() -> Stimulus {
        Stimulus::Step { from: 0.0, to: 1.0 }
    }

    #[test]
    fn samples_full_curve() {
        let mut dynamics = SecondOrderDynamics::new(3.0, 1.0, 0.0);

        let solution = simulate_unobserved(&mut dynamics, &Preview::new(step(), DT, 180));

        assert_eq!(solution.status, Status::Complete);
        assert_eq!(solution.steps, 180);
        assert_eq!(solution.history.len(), 181);
        assert!(solution.is_stable());

        let last = solution.history.last().unwrap();
        assert_relative_eq!(last.time, 3.0, epsilon = 1e-4);
        assert_relative_eq!(last.value, 1.0, epsilon = 0.01);
    }

    #[test]
    fn observer_can_stop_early() {
        let mut dynamics = SecondOrderDynamics::new(3.0, 1.0, 0.0);

        let observer = |event: &Event| {
            if event.step >= 5 {
                Some(Action::StopEarly)
            } else {
                None
            }
        };
        let solution = simulate(&mut dynamics, &Preview::new(step(), DT, 100), observer);

        assert_eq!(solution.status, Status::StoppedByObserver);
        assert_eq!(solution.steps, 5);
        assert_eq!(solution.history.len(), 6);
    }

    #[test]
    fn step_numbers_start_at_zero() {
        let mut dynamics = SecondOrderDynamics::new(3.0, 1.0, 0.0);

        let mut steps = Vec::new();
        simulate(
            &mut dynamics,
            &Preview::new(step(), DT, 4),
            |event: &Event| {
                steps.push(event.step);
                None
            },
        );

        assert_eq!(steps, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn leaves_instance_untouched() {
        let mut dynamics = SecondOrderDynamics::new(1.5, 0.6, 1.0).with_initial_value(2.0);
        for _ in 0..12 {
            dynamics.update(DT, -3.0, None);
        }
        let state = *dynamics.state();
        let settings = dynamics.settings().clone();

        let preview = Preview::new(step(), DT, 50)
            .with_preset(Preset::find("bouncy").expect("built in"));
        simulate_unobserved(&mut dynamics, &preview);

        assert_eq!(*dynamics.state(), state);
        assert_eq!(*dynamics.settings(), settings);
        assert_eq!(dynamics.stack_depth(), 0);
    }

    #[test]
    fn random_draws_resume_after_preview() {
        let mut settings = Settings::default().with_sampling_mode(SamplingMode::Random);
        settings.frequency_mut().set_minimum(1.0);
        settings.frequency_mut().set_maximum(9.0);
        let mut dynamics = SecondOrderDynamics::from_settings(settings, 0.0).with_seed(5);
        dynamics.update(DT, 1.0, None);
        let mut untouched = dynamics.clone();

        simulate_unobserved(&mut dynamics, &Preview::new(step(), DT, 30));

        for _ in 0..5 {
            assert_eq!(
                dynamics.update(DT, 1.0, None),
                untouched.update(DT, 1.0, None)
            );
            assert_eq!(dynamics.frequency(), untouched.frequency());
        }
    }

    #[test]
    fn preset_shapes_the_curve() {
        let settings = Settings::new(Parameters::new(1.0, 1.0, 0.0), StrategyKind::default())
            .with_sampling_mode(SamplingMode::Minimum);
        let mut dynamics = SecondOrderDynamics::from_settings(settings, 0.0);

        let plain = simulate_unobserved(&mut dynamics, &Preview::over(step(), DT, 2.0));
        let bouncy = simulate_unobserved(
            &mut dynamics,
            &Preview::over(step(), DT, 2.0).with_preset(Preset::find("bouncy").expect("built in")),
        );

        assert!(plain.peak().unwrap() <= 1.0 + 1e-4);
        assert!(bouncy.peak().unwrap() > 1.2);
    }

    #[test]
    fn huge_step_count_does_not_overflow() {
        let mut dynamics = SecondOrderDynamics::new(3.0, 1.0, 0.0);
        let preview = Preview::over(step(), f32::MIN_POSITIVE, 1.0);
        assert_eq!(preview.steps, usize::MAX);

        let solution = simulate(&mut dynamics, &preview, |event: &Event| {
            (event.step == 3).then_some(Action::StopEarly)
        });

        assert_eq!(solution.status, Status::StoppedByObserver);
        assert_eq!(solution.history.len(), 4);
    }

    #[test]
    fn over_rounds_steps_up() {
        assert_eq!(Preview::over(step(), 0.3, 1.0).steps, 4);
        assert_eq!(Preview::over(step(), 0.0, 1.0).steps, 0);
    }
}
