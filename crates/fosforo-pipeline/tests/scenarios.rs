//! End-to-end scenarios through the real host/worker protocol.
//!
//! Each scenario builds deterministic input signals, drives frames through
//! [`ScopeHost`], and checks the observable: pixels of the returned
//! framebuffer snapshots plus the frame stats.

use std::f32::consts::TAU;

use fosforo_core::{DisplayMode, ScopeSettings};
use fosforo_pipeline::{FrameRequest, ScopeHost, SurfaceConfig};
use fosforo_render::{BACKGROUND, Framebuffer, RendererKind};

const RATE: f32 = 48_000.0;

fn sine(n: usize, freq: f32, phase: f32) -> Vec<f32> {
    (0..n)
        .map(|i| (TAU * freq * i as f32 / RATE + phase).sin())
        .collect()
}

fn square(n: usize, freq: f32, phase_samples: usize) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let t = (i + phase_samples) as f32 * freq / RATE;
            if t.fract() < 0.5 { 1.0 } else { -1.0 }
        })
        .collect()
}

fn request(a: Vec<f32>, b: Vec<f32>, settings: &ScopeSettings) -> FrameRequest {
    FrameRequest {
        samples_a: a,
        samples_b: b,
        sample_rate: RATE,
        settings: settings.clone(),
        dt_wall: 1.0 / 60.0,
    }
}

fn spawn_software() -> ScopeHost {
    let (host, info) = ScopeHost::spawn(SurfaceConfig::default()).expect("spawn worker");
    assert!(info.available.contains(&RendererKind::Software));
    assert_eq!(info.active, RendererKind::Software);
    host
}

fn render_blocking(host: &mut ScopeHost, req: FrameRequest) -> fosforo_pipeline::FrameReady {
    assert!(host.try_render(req).expect("worker alive"));
    host.wait_ready().expect("frame completes")
}

/// Scenario 1: silent DC input collapses to a bright dot at canvas center.
#[test]
fn silent_dc_renders_center_dot() {
    let settings = ScopeSettings {
        mode: DisplayMode::Xy,
        persistence: 0.0,
        signal_noise: 0.0,
        ..ScopeSettings::default()
    };
    let mut host = spawn_software();
    // Two frames: the first carries the beam's approach from the origin,
    // the second (persistence 0 wiped it) is the steady state.
    let zeros = vec![0.0f32; 16384];
    render_blocking(&mut host, request(zeros.clone(), zeros.clone(), &settings));
    let ready = render_blocking(&mut host, request(zeros.clone(), zeros, &settings));

    let center = ready.frame.pixel(300, 300).unwrap();
    assert!(center[1] > 200, "center dot missing: {center:?}");
    // Away from the center the screen is pure background.
    let mut lit = 0;
    for y in 0..600 {
        for x in 0..600 {
            let p = ready.frame.pixel(x, y).unwrap();
            if p != [BACKGROUND.r, BACKGROUND.g, BACKGROUND.b] {
                lit += 1;
                let dx = x as i32 - 300;
                let dy = y as i32 - 300;
                assert!(
                    dx * dx + dy * dy < 12 * 12,
                    "lit pixel far from center at ({x}, {y})"
                );
            }
        }
    }
    assert!(lit > 0, "the dot must be visible");
}

/// Scenario 2: a sine/cosine pair traces a closed circle with no dwell
/// highlights.
#[test]
fn sine_pair_traces_circle() {
    let settings = ScopeSettings {
        mode: DisplayMode::Xy,
        persistence: 0.0,
        signal_noise: 0.0,
        coil_strength: 0.32,
        beam_inertia: 0.06,
        field_damping: 0.44,
        decay: 16384,
        ..ScopeSettings::default()
    };
    let mut host = spawn_software();
    let a = sine(16384, 440.0, 0.0);
    let b = sine(16384, 440.0, std::f32::consts::FRAC_PI_2);
    render_blocking(&mut host, request(a.clone(), b.clone(), &settings));
    let ready = render_blocking(&mut host, request(a, b, &settings));

    assert_eq!(ready.stats.highlights, 0, "a circle has no apices");
    // Ring samples at radius 90 are lit, center is dark.
    for angle in [0.0f32, 1.2, 2.5, 4.0, 5.5] {
        let x = (300.0 + 90.0 * angle.cos()).round() as u32;
        let y = (300.0 + 90.0 * angle.sin()).round() as u32;
        assert_ne!(
            ready.frame.pixel(x, y).unwrap(),
            [BACKGROUND.r, BACKGROUND.g, BACKGROUND.b],
            "ring dark at angle {angle}"
        );
    }
    assert_eq!(
        ready.frame.pixel(300, 300).unwrap(),
        [BACKGROUND.r, BACKGROUND.g, BACKGROUND.b],
        "circle interior must stay dark"
    );
}

/// Scenario 3: a square-wave pair dwells at four corners; the corner dots
/// are maximal direction changes.
#[test]
fn square_pair_lights_four_corners() {
    let settings = ScopeSettings {
        mode: DisplayMode::Xy,
        persistence: 0.0,
        signal_noise: 0.0,
        time_div: 0.0005,
        ..ScopeSettings::default()
    };
    let mut host = spawn_software();
    let a = square(16384, 1000.0, 0);
    let b = square(16384, 1000.0, 12); // quarter period of 48 samples
    render_blocking(&mut host, request(a.clone(), b.clone(), &settings));
    let ready = render_blocking(&mut host, request(a, b, &settings));

    assert!(
        ready.stats.highlights >= 4,
        "expected dwell highlights at the corners, got {}",
        ready.stats.highlights
    );
    // The four corners at amplitude 1 * 90 px deflection glow.
    for (cx, cy) in [(390, 210), (390, 390), (210, 210), (210, 390)] {
        let p = ready.frame.pixel(cx, cy).unwrap();
        assert!(
            p[1] > BACKGROUND.g,
            "corner ({cx}, {cy}) should glow, got {p:?}"
        );
    }
}

/// Scenario 4: triggering keeps successive frames of a free-running sine
/// phase-stable: no horizontal drift.
#[test]
fn trigger_stabilizes_timebase_frames() {
    let settings = ScopeSettings {
        mode: DisplayMode::A,
        trigger_level: 0.0,
        persistence: 0.0,
        signal_noise: 0.0,
        time_div: 0.001,
        ..ScopeSettings::default()
    };
    let mut host = spawn_software();

    // Three frames whose buffers start at unrelated phases, as if sliced
    // from a continuous capture.
    let f1 = render_blocking(&mut host, request(sine(8192, 440.0, 0.0), sine(8192, 440.0, 0.0), &settings));
    let f2 = render_blocking(&mut host, request(sine(8192, 440.0, 1.1), sine(8192, 440.0, 1.1), &settings));
    let f3 = render_blocking(&mut host, request(sine(8192, 440.0, 2.7), sine(8192, 440.0, 2.7), &settings));

    // The first frame still shows the beam's approach; compare the two
    // settled frames. Trigger alignment pins the waveform: the trace
    // centerline in any column moves at most by the sub-sample quantization
    // of the crossing (~one sample of slope).
    let _ = f1;
    for column in [50u32, 150, 250, 380] {
        let y2 = brightest_row(&f2.frame, column);
        let y3 = brightest_row(&f3.frame, column);
        assert!(
            y2.abs_diff(y3) <= 8,
            "column {column} drifted: {y2} vs {y3}"
        );
    }
}

/// Row with the strongest green channel in a column.
fn brightest_row(fb: &Framebuffer, x: u32) -> u32 {
    let mut best = (0u32, 0u8);
    for y in 0..fb.height() {
        let g = fb.pixel(x, y).unwrap()[1];
        if g > best.1 {
            best = (y, g);
        }
    }
    best.0
}

/// Scenario 5: persistence decays an old trace geometrically under empty
/// input.
#[test]
fn persistence_decays_over_empty_frames() {
    let settings = ScopeSettings {
        mode: DisplayMode::Xy,
        persistence: 0.8,
        signal_noise: 0.0,
        ..ScopeSettings::default()
    };
    let mut host = spawn_software();
    let ready = render_blocking(
        &mut host,
        request(sine(8192, 200.0, 0.0), sine(8192, 200.0, 1.0), &settings),
    );
    let peak = ready.frame.max_deviation_from(BACKGROUND);
    assert!(peak > 50, "initial trace should be clearly visible");

    let mut last = ready;
    for _ in 0..10 {
        last = render_blocking(&mut host, request(vec![], vec![], &settings));
    }
    let ghost = f32::from(last.frame.max_deviation_from(BACKGROUND));
    let bound = f32::from(peak) * 0.8f32.powi(10) + 30.0;
    assert!(
        ghost <= bound,
        "ghost {ghost} exceeds geometric bound {bound}"
    );
}

/// Scenario 6: the highlight set is invariant under the interpolation
/// quantum.
#[test]
fn highlights_do_not_depend_on_time_segment() {
    let mk_settings = |quantum: f32| ScopeSettings {
        mode: DisplayMode::Xy,
        persistence: 0.0,
        signal_noise: 0.0,
        time_segment: quantum,
        time_div: 0.0005,
        ..ScopeSettings::default()
    };
    let a = square(16384, 1000.0, 0);
    let b = square(16384, 1000.0, 12);

    // Exact, core-level statement: identical (index, brightness) sets.
    use fosforo_core::{Preprocessor, Viewport, direction_changes};
    let vp = Viewport::new(600.0, 600.0);
    let coarse = Preprocessor::with_seed(5).process_frame(&a, &b, RATE, &mk_settings(0.021), &vp);
    let fine = Preprocessor::with_seed(6).process_frame(&a, &b, RATE, &mk_settings(0.005), &vp);
    assert_eq!(
        direction_changes(&coarse.passes[0].original),
        direction_changes(&fine.passes[0].original),
    );

    // And the full pipeline agrees on the rendered count.
    let mut host_a = spawn_software();
    let mut host_b = spawn_software();
    let ra = render_blocking(&mut host_a, request(a.clone(), b.clone(), &mk_settings(0.021)));
    let rb = render_blocking(&mut host_b, request(a, b, &mk_settings(0.005)));
    assert_eq!(ra.stats.highlights, rb.stats.highlights);
}

/// Backpressure: a second render without polling is dropped, not queued.
#[test]
fn one_frame_in_flight_drops_extras() {
    let settings = ScopeSettings::default();
    let mut host = spawn_software();
    let req = request(sine(4096, 440.0, 0.0), sine(4096, 440.0, 0.0), &settings);

    assert!(host.try_render(req.clone()).unwrap());
    assert!(host.frame_in_flight());
    // Still unacknowledged: the next tick's frame is dropped.
    assert!(!host.try_render(req.clone()).unwrap());

    let ready = host.wait_ready().unwrap();
    assert_eq!(ready.frame_no, 1, "dropped frame must not render");
    assert!(!host.frame_in_flight());
    assert!(host.try_render(req).unwrap());
    let ready = host.wait_ready().unwrap();
    assert_eq!(ready.frame_no, 2);
}

/// A renderer switch after the first frame fails and reports the requested
/// kind for the host's rebuild.
#[test]
fn late_renderer_switch_requires_rebuild() {
    let settings = ScopeSettings::default();
    let mut host = spawn_software();
    render_blocking(
        &mut host,
        request(vec![0.0; 1024], vec![0.0; 1024], &settings),
    );

    host.switch_renderer(RendererKind::Gpu).unwrap();
    // The failure arrives asynchronously; give the worker a moment.
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    loop {
        host.poll_ready();
        if let Some(kind) = host.take_switch_failure() {
            assert_eq!(kind, RendererKind::Gpu);
            break;
        }
        assert!(
            std::time::Instant::now() < deadline,
            "switch failure never reported"
        );
        std::thread::sleep(std::time::Duration::from_millis(10));
    }
}

/// Clear keeps physics state; reset also re-homes the beam.
#[test]
fn clear_and_reset_behave_distinctly() {
    let settings = ScopeSettings {
        mode: DisplayMode::Xy,
        persistence: 0.95,
        signal_noise: 0.0,
        ..ScopeSettings::default()
    };
    let mut host = spawn_software();
    let bright = render_blocking(
        &mut host,
        request(sine(8192, 300.0, 0.0), sine(8192, 300.0, 1.5), &settings),
    );
    assert!(bright.frame.max_deviation_from(BACKGROUND) > 50);

    host.clear().unwrap();
    // Render an empty frame to observe the cleared screen.
    let after = render_blocking(&mut host, request(vec![], vec![], &settings));
    assert!(
        after.frame.max_deviation_from(BACKGROUND) <= 12,
        "clear should wipe the trace"
    );

    host.reset().unwrap();
    let settled = render_blocking(
        &mut host,
        request(vec![0.0; 4096], vec![0.0; 4096], &settings),
    );
    // After reset the beam re-approaches from the origin: the top-left
    // diagonal streak is present again.
    let mut streak = false;
    for d in 40..260 {
        let p = settled.frame.pixel(d, d).unwrap();
        if p != [BACKGROUND.r, BACKGROUND.g, BACKGROUND.b] {
            streak = true;
            break;
        }
    }
    assert!(streak, "reset beam must re-approach from the origin");
}
