//! Per-frame stage composition.
//!
//! This is the pipeline itself: pre-process, integrate, upsample, segment,
//! excite, stroke. The compositor draws in a fixed order so the phosphor
//! layers correctly:
//!
//! 1. persistence fade over the whole screen
//! 2. trace strokes, one per temporal segment, opacity from mean speed
//! 3. direction-change dots at ORIGINAL (pre-physics) coordinates
//! 4. debug overlays when enabled
//!
//! Empty input degrades to the fade alone: the previous trace decays and
//! nothing new is drawn, which is exactly what a silent scope shows.

use fosforo_core::{
    BeamState, Preprocessor, ScopeSettings, Viewport, direction_changes, excitation,
    interpolate_trajectory, segment_trajectory,
};
use fosforo_render::{DEBUG_INTERPOLATED, DEBUG_ORIGINAL, P31_GREEN, Renderer};

use crate::messages::FrameRequest;

/// Workload numbers for one rendered frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    /// Wall-clock milliseconds spent in the pipeline.
    pub render_ms: f32,
    /// Trajectory points after interpolation, summed over passes.
    pub points: usize,
    /// Temporal segments stroked.
    pub segments: usize,
    /// Direction-change dots drawn.
    pub highlights: usize,
}

/// Run the full pipeline for one frame and draw it.
///
/// `settings` must already be sanitized. Never fails; invalid or empty
/// input produces a fade-only frame.
pub fn render_frame(
    renderer: &mut dyn Renderer,
    beam: &mut BeamState,
    pre: &mut Preprocessor,
    viewport: &Viewport,
    request: &FrameRequest,
    settings: &ScopeSettings,
) -> FrameStats {
    let mut stats = FrameStats::default();

    // Stage 1: persistence fade, unconditionally.
    renderer.clear_with_persistence(1.0 - settings.persistence);

    let plan = pre.process_frame(
        &request.samples_a,
        &request.samples_b,
        request.sample_rate,
        settings,
        viewport,
    );

    let dt_sample = 1.0 / request.sample_rate.max(1.0);
    let quantum = settings.time_segment / 1000.0;
    let interp_active = quantum < dt_sample;

    // AB mode renders channel A then channel B through the same beam; the
    // cross-channel drag that causes is part of the look.
    for pass in &plan.passes {
        if pass.targets.len() < 2 {
            continue;
        }

        let trace = beam.advance(&pass.targets, settings, request.sample_rate);
        let highlights = direction_changes(&pass.original);
        let trace = interpolate_trajectory(&trace, request.sample_rate, settings.time_segment);
        let segments =
            segment_trajectory(&trace, request.sample_rate, settings.time_segment, interp_active);

        stats.points += trace.len();
        stats.segments += segments.len();
        stats.highlights += highlights.len();

        // Stage 2: one stroke per temporal segment.
        let width = viewport.line_width();
        let mut stroke: Vec<fosforo_core::Point> = Vec::new();
        for seg in &segments {
            stroke.clear();
            stroke.extend(trace[seg.start..=seg.end].iter().map(|p| p.pos));
            let opacity = excitation(seg.mean_speed, settings.velocity_dimming, settings.beam_power);
            renderer.stroke_polyline(&stroke, P31_GREEN, opacity, width);
        }

        // Stage 3: dwell dots at original coordinates.
        let radius = viewport.dot_radius();
        for h in &highlights {
            let opacity =
                (settings.beam_power * h.brightness * settings.dot_opacity).clamp(0.0, 1.0);
            renderer.fill_dot(pass.original[h.index], radius, P31_GREEN, opacity);
        }

        // Stage 4: debug overlays.
        if settings.debug_mode {
            for p in &trace {
                if p.interpolated {
                    renderer.fill_dot(
                        p.pos,
                        radius,
                        DEBUG_INTERPOLATED,
                        settings.sample_dot_opacity,
                    );
                }
            }
            for h in &highlights {
                renderer.fill_dot(
                    pass.original[h.index],
                    radius * (1.0 + h.brightness * settings.dot_size_variation),
                    DEBUG_ORIGINAL,
                    settings.sample_dot_opacity,
                );
            }
        }
    }

    if settings.debug_mode && request.dt_wall > 0.0 {
        renderer.draw_fps((1.0 / request.dt_wall).round() as u32);
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use fosforo_core::DisplayMode;
    use fosforo_render::{BACKGROUND, RendererKind, SoftwareRenderer};

    fn request(a: Vec<f32>, b: Vec<f32>, settings: ScopeSettings) -> FrameRequest {
        FrameRequest {
            samples_a: a,
            samples_b: b,
            sample_rate: 48_000.0,
            settings,
            dt_wall: 1.0 / 60.0,
        }
    }

    fn run(req: &FrameRequest) -> (SoftwareRenderer, FrameStats) {
        let mut renderer = SoftwareRenderer::new(600, 600);
        let mut beam = BeamState::new();
        let mut pre = Preprocessor::with_seed(9);
        let viewport = Viewport::new(600.0, 600.0);
        let settings = req.settings.sanitized();
        let stats = render_frame(
            &mut renderer,
            &mut beam,
            &mut pre,
            &viewport,
            req,
            &settings,
        );
        (renderer, stats)
    }

    #[test]
    fn empty_input_renders_fade_only() {
        let req = request(vec![], vec![], ScopeSettings::default());
        let (mut renderer, stats) = run(&req);
        assert_eq!(stats.segments, 0);
        assert_eq!(renderer.finish_frame().max_deviation_from(BACKGROUND), 0);
        assert_eq!(renderer.kind(), RendererKind::Software);
    }

    #[test]
    fn silent_dc_xy_draws_center_dot() {
        let settings = ScopeSettings {
            mode: DisplayMode::Xy,
            persistence: 0.0,
            signal_noise: 0.0,
            ..ScopeSettings::default()
        };
        let req = request(vec![0.0; 16384], vec![0.0; 16384], settings);
        let (mut renderer, stats) = run(&req);
        assert!(stats.segments > 0);
        let fb = renderer.finish_frame();
        // Bright at the center...
        let center = fb.pixel(300, 300).unwrap();
        assert!(center[1] > 200, "center should glow, got {center:?}");
        // ...and background away from both the dot and the beam's initial
        // approach streak from the origin (the state starts at (0, 0)).
        assert_eq!(
            fb.pixel(450, 150).unwrap(),
            [BACKGROUND.r, BACKGROUND.g, BACKGROUND.b]
        );
    }

    #[test]
    fn sine_circle_strokes_a_ring() {
        let rate = 48_000.0;
        let a: Vec<f32> = (0..16384)
            .map(|i| (std::f32::consts::TAU * 440.0 * i as f32 / rate).sin())
            .collect();
        let b: Vec<f32> = (0..16384)
            .map(|i| (std::f32::consts::TAU * 440.0 * i as f32 / rate).cos())
            .collect();
        let settings = ScopeSettings {
            mode: DisplayMode::Xy,
            signal_noise: 0.0,
            persistence: 0.0,
            decay: 16384,
            ..ScopeSettings::default()
        };
        let req = request(a, b, settings);
        let (mut renderer, stats) = run(&req);
        // The beam sweeps continuously: no dwell highlights on a circle.
        assert_eq!(stats.highlights, 0);
        let fb = renderer.finish_frame();
        // Ring radius is amplitude * scale = 90 px: lit on the ring, dark
        // at the center.
        assert_ne!(
            fb.pixel(300 + 90, 300).unwrap(),
            [BACKGROUND.r, BACKGROUND.g, BACKGROUND.b],
            "ring should be lit"
        );
        assert_eq!(
            fb.pixel(300, 300).unwrap(),
            [BACKGROUND.r, BACKGROUND.g, BACKGROUND.b],
            "circle center should stay dark"
        );
    }

    #[test]
    fn debug_mode_adds_overlay_content() {
        let a: Vec<f32> = (0..2048)
            .map(|i| ((i / 24) % 2) as f32 * 2.0 - 1.0)
            .collect();
        let b: Vec<f32> = (0..2048)
            .map(|i| (((i + 12) / 24) % 2) as f32 * 2.0 - 1.0)
            .collect();
        let mut settings = ScopeSettings {
            mode: DisplayMode::Xy,
            signal_noise: 0.0,
            persistence: 0.0,
            ..ScopeSettings::default()
        };
        let plain = run(&request(a.clone(), b.clone(), settings.clone())).0;
        settings.debug_mode = true;
        let debug = run(&request(a, b, settings)).0;
        let mut differs = false;
        'outer: for y in 0..600 {
            for x in 0..600 {
                if plain.framebuffer().pixel(x, y) != debug.framebuffer().pixel(x, y) {
                    differs = true;
                    break 'outer;
                }
            }
        }
        assert!(differs, "debug overlays must change the frame");
    }
}
