use sodyn_core::{Constants, Parameters, State, Strategy, StrategyKind};

/// A strategy that never moves the value.
///
/// The target is still recorded so that switching to another strategy later
/// does not see a stale target velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoneStrategy;

impl Strategy for NoneStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::None
    }

    fn constants(&self, _params: &Parameters) -> Constants {
        Constants::FROZEN
    }

    fn step(&self, state: &mut State, delta_time: f32, target: f32, target_velocity: Option<f32>) {
        state.track_target(delta_time, target, target_velocity);
    }
}
