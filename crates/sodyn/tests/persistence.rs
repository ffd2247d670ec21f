#![cfg(feature = "serde-derive")]

use sodyn::{
    InstabilityFallback, InstabilityPolicy, Parameters, SamplingMode, SecondOrderDynamics,
    Settings, Snapshot, StrategyKind, Transform,
};

const DT: f32 = 1.0 / 60.0;

fn settings() -> Settings {
    Settings::new(Parameters::new(2.2, 0.45, 1.3), StrategyKind::PoleZeroMatching)
        .with_sampling_mode(SamplingMode::Fixed)
        .with_instability_policy(InstabilityPolicy::new(InstabilityFallback::ReturnTarget, true))
}

#[test]
fn settings_survive_json() {
    let settings = settings();

    let json = serde_json::to_string(&settings).expect("settings serialize");
    let back: Settings = serde_json::from_str(&json).expect("settings deserialize");

    assert_eq!(back, settings);
}

#[test]
fn snapshot_resumes_after_json() {
    let mut original = SecondOrderDynamics::from_settings(settings(), 0.5);
    for step in 0..30 {
        original.update(DT, (step as f32 * 0.2).cos(), None);
    }

    let json = serde_json::to_string(&original.snapshot()).expect("snapshot serializes");
    let snapshot: Snapshot = serde_json::from_str(&json).expect("snapshot deserializes");

    let mut resumed = SecondOrderDynamics::from_settings(settings(), 0.0);
    resumed.restore(snapshot);

    // Integration constants are not stored; restoring re-derives them.
    assert_eq!(resumed.state(), original.state());
    for step in 0..30 {
        let target = (step as f32 * 0.3).sin();
        assert_eq!(resumed.update(DT, target, None), original.update(DT, target, None));
    }
}

#[test]
fn transform_survives_json() {
    let transform = Transform {
        position: glam::Vec3::new(1.0, -2.0, 0.25),
        rotation: glam::Quat::from_rotation_y(0.75),
        scale: glam::Vec3::splat(1.5),
    };

    let json = serde_json::to_string(&transform).expect("transform serializes");
    let back: Transform = serde_json::from_str(&json).expect("transform deserializes");

    assert_eq!(back, transform);
}
