//! Property-based tests for the pipeline stages.
//!
//! Uses proptest to verify the invariants the renderer relies on: finite
//! trajectories for any settings, endpoint-exact interpolation, phosphor
//! monotonicity, and interpolation-independent highlight placement.

use proptest::prelude::*;

use fosforo_core::{
    BeamState, DisplayMode, Point, Preprocessor, ScopeSettings, Viewport, catmull_rom,
    direction_changes, excitation, interpolate_trajectory, segment_trajectory,
};

fn arb_settings() -> impl Strategy<Value = ScopeSettings> {
    (
        0usize..4,
        -2.0f32..2.0,
        0.0f32..3.0,
        0.0f32..3.0,
        0.0f32..2.0,
        0.0f32..1.5,
        0.0f32..0.3,
        0.0f32..1.5,
        0.0f32..3.0,
        0.0005f32..0.1,
    )
        .prop_map(
            |(mode, trigger, coil, inertia, damping, dimming, noise, power, gain, quantum)| {
                let mut s = ScopeSettings {
                    mode: [
                        DisplayMode::A,
                        DisplayMode::B,
                        DisplayMode::Ab,
                        DisplayMode::Xy,
                    ][mode],
                    trigger_level: trigger,
                    coil_strength: coil,
                    beam_inertia: inertia,
                    field_damping: damping,
                    velocity_dimming: dimming,
                    signal_noise: noise,
                    beam_power: power,
                    ampl_div_a: gain,
                    ampl_div_b: gain,
                    time_segment: quantum,
                    ..ScopeSettings::default()
                };
                s.sanitize();
                s
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// For any sanitized settings and bounded input, the full stage chain
    /// produces finite positions and speeds.
    #[test]
    fn pipeline_output_is_finite(
        samples in prop::collection::vec(-1.0f32..=1.0, 64..512),
        settings in arb_settings(),
        seed in 0u64..1_000,
    ) {
        let viewport = Viewport::new(600.0, 600.0);
        let mut pre = Preprocessor::with_seed(seed);
        let b: Vec<f32> = samples.iter().map(|s| -s).collect();
        let plan = pre.process_frame(&samples, &b, 48_000.0, &settings, &viewport);

        let mut beam = BeamState::new();
        for pass in &plan.passes {
            let trace = beam.advance(&pass.targets, &settings, 48_000.0);
            let trace = interpolate_trajectory(&trace, 48_000.0, settings.time_segment);
            for p in &trace {
                prop_assert!(p.pos.is_finite(), "non-finite position");
                prop_assert!(p.speed.is_finite() && p.speed >= 0.0);
            }
            let segs = segment_trajectory(&trace, 48_000.0, settings.time_segment, true);
            for s in &segs {
                prop_assert!(s.start <= s.end && s.end < trace.len());
                prop_assert!(s.mean_speed.is_finite());
            }
        }
    }

    /// Catmull-Rom is exact at the span endpoints for any control points.
    #[test]
    fn catmull_rom_endpoint_exact(
        p0 in -1e3f32..1e3,
        p1 in -1e3f32..1e3,
        p2 in -1e3f32..1e3,
        p3 in -1e3f32..1e3,
    ) {
        let at0 = catmull_rom(p0, p1, p2, p3, 0.0);
        let at1 = catmull_rom(p0, p1, p2, p3, 1.0);
        // t = 0 has no cancellation; t = 1 cancels sums on the magnitude of
        // all four control points.
        let tol = 1e-2 + (p0.abs() + p1.abs() + p2.abs() + p3.abs()) * 1e-5;
        prop_assert_eq!(at0, p1);
        prop_assert!((at1 - p2).abs() <= tol);
    }

    /// Phosphor brightness never increases with speed.
    #[test]
    fn excitation_monotone_in_speed(
        dimming in 0.0f32..=1.0,
        power in 0.0f32..=2.0,
        speeds in prop::collection::vec(0.0f32..1e6, 2..64),
    ) {
        let mut sorted = speeds;
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let mut prev = f32::INFINITY;
        for s in sorted {
            let b = excitation(s, dimming, power);
            prop_assert!(b <= prev + 1e-5, "brightness rose at speed {s}");
            prev = b;
        }
    }

    /// Phosphor brightness never decreases with base power.
    #[test]
    fn excitation_monotone_in_power(
        dimming in 0.0f32..=1.0,
        speed in 0.0f32..1e6,
        powers in prop::collection::vec(0.0f32..=2.0, 2..64),
    ) {
        let mut sorted = powers;
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let mut prev = -1.0f32;
        for p in sorted {
            let b = excitation(speed, dimming, p);
            prop_assert!(b >= prev - 1e-5);
            prev = b;
        }
    }

    /// The highlight set depends only on the original points, never on the
    /// interpolation quantum.
    #[test]
    fn highlights_invariant_under_quantum(
        samples in prop::collection::vec(-1.0f32..=1.0, 16..128),
        quantum_a in 0.001f32..0.05,
        quantum_b in 0.001f32..0.05,
    ) {
        let viewport = Viewport::new(600.0, 600.0);
        let settings_a = ScopeSettings {
            mode: DisplayMode::Xy,
            time_segment: quantum_a,
            signal_noise: 0.0,
            ..ScopeSettings::default()
        };
        let settings_b = ScopeSettings {
            time_segment: quantum_b,
            ..settings_a.clone()
        };
        let b: Vec<f32> = samples.iter().rev().copied().collect();

        let plan_a = Preprocessor::with_seed(1)
            .process_frame(&samples, &b, 48_000.0, &settings_a, &viewport);
        let plan_b = Preprocessor::with_seed(2)
            .process_frame(&samples, &b, 48_000.0, &settings_b, &viewport);

        let hl_a = direction_changes(&plan_a.passes[0].original);
        let hl_b = direction_changes(&plan_b.passes[0].original);
        prop_assert_eq!(hl_a, hl_b);
    }

    /// Windowed output never exceeds the decay budget.
    #[test]
    fn window_respects_decay(
        len in 1usize..4096,
        decay in 512u32..16384,
        time_div in 50e-9f32..0.5,
    ) {
        let settings = ScopeSettings {
            mode: DisplayMode::Xy,
            decay,
            time_div,
            signal_noise: 0.0,
            ..ScopeSettings::default()
        };
        let samples = vec![0.25f32; len];
        let plan = Preprocessor::with_seed(3)
            .process_frame(&samples, &samples, 48_000.0, &settings, &Viewport::new(600.0, 600.0));
        for pass in &plan.passes {
            prop_assert!(pass.targets.len() <= decay as usize);
            prop_assert!(pass.targets.len() <= len);
        }
    }
}

/// A beam driven by a slow circle stays near the circle after settling;
/// plain #[test] because the scenario is fixed.
#[test]
fn beam_follows_slow_circle() {
    let settings = ScopeSettings::default();
    let mut beam = BeamState::new();
    let center = Point::new(300.0, 300.0);
    let mut max_err = 0.0f32;
    for i in 0..4096 {
        let angle = i as f32 * 0.01;
        let target = Point::new(
            center.x + 90.0 * angle.cos(),
            center.y + 90.0 * angle.sin(),
        );
        let pos = beam.step(
            target,
            settings.coil_strength,
            settings.beam_inertia,
            settings.field_damping,
        );
        if i > 512 {
            max_err = max_err.max(pos.distance(target));
        }
    }
    assert!(
        max_err < 10.0,
        "settled beam should track a slow circle closely, err {max_err}"
    );
}
