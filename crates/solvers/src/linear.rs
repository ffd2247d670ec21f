use sodyn_core::{Constants, Parameters, State, Strategy, StrategyKind};

/// A strategy that passes the target straight through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Linear;

impl Strategy for Linear {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Linear
    }

    fn constants(&self, _params: &Parameters) -> Constants {
        Constants::FROZEN
    }

    fn step(&self, state: &mut State, delta_time: f32, target: f32, target_velocity: Option<f32>) {
        let velocity = state.track_target(delta_time, target, target_velocity);
        state.current_value = target;
        state.current_velocity = velocity;
    }
}
