//! CPU rasterizer, the authoritative backend.
//!
//! Strokes are rendered as capsules: every pixel within half the stroke
//! width of the polyline's centerline is covered, which yields round caps
//! and round joins for free. Coverage falls off linearly over one pixel at
//! the rim for antialiasing.
//!
//! One stroke composites once. Per-segment coverage accumulates into a
//! scratch buffer with `max`, and the whole polyline blends onto the
//! framebuffer in a single pass; overlapping segments of one stroke can
//! therefore never double-blend, matching what a single canvas `stroke()`
//! does.

use fosforo_core::Point;

use crate::color::{BACKGROUND, Color, P31_GREEN};
use crate::framebuffer::Framebuffer;
use crate::renderer::{Renderer, RendererKind};

/// Coverage scratch region reused across strokes.
#[derive(Debug, Default)]
struct Scratch {
    coverage: Vec<f32>,
    /// Bounding box of the area the current stroke touched, in buffer
    /// coordinates: (x0, y0, x1, y1), exclusive end.
    region: (i32, i32, i32, i32),
}

/// Software renderer over a [`Framebuffer`].
#[derive(Debug)]
pub struct SoftwareRenderer {
    fb: Framebuffer,
    scratch: Scratch,
}

impl SoftwareRenderer {
    /// Create a software renderer with its framebuffer cleared to the
    /// background color.
    pub fn new(width: u32, height: u32) -> Self {
        let mut fb = Framebuffer::new(width, height);
        fb.fill(BACKGROUND);
        Self {
            fb,
            scratch: Scratch::default(),
        }
    }

    /// Direct access to the framebuffer.
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    /// Prepare the scratch coverage buffer for a clamped region.
    fn begin_coverage(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> bool {
        let w = self.fb.width() as i32;
        let h = self.fb.height() as i32;
        let rx0 = (x0.floor() as i32).max(0);
        let ry0 = (y0.floor() as i32).max(0);
        let rx1 = (x1.ceil() as i32 + 1).min(w);
        let ry1 = (y1.ceil() as i32 + 1).min(h);
        if rx0 >= rx1 || ry0 >= ry1 {
            return false;
        }
        let area = ((rx1 - rx0) * (ry1 - ry0)) as usize;
        self.scratch.coverage.clear();
        self.scratch.coverage.resize(area, 0.0);
        self.scratch.region = (rx0, ry0, rx1, ry1);
        true
    }

    /// Accumulate capsule coverage for one segment into the scratch buffer.
    fn cover_segment(&mut self, a: Point, b: Point, half_width: f32) {
        let (rx0, ry0, rx1, ry1) = self.scratch.region;
        let reach = half_width + 0.5;

        let sx0 = ((a.x.min(b.x) - reach).floor() as i32).max(rx0);
        let sy0 = ((a.y.min(b.y) - reach).floor() as i32).max(ry0);
        let sx1 = ((a.x.max(b.x) + reach).ceil() as i32 + 1).min(rx1);
        let sy1 = ((a.y.max(b.y) + reach).ceil() as i32 + 1).min(ry1);

        let abx = b.x - a.x;
        let aby = b.y - a.y;
        let len_sq = abx * abx + aby * aby;
        let row_w = (rx1 - rx0) as usize;

        for py in sy0..sy1 {
            let cy = py as f32 + 0.5;
            for px in sx0..sx1 {
                let cx = px as f32 + 0.5;
                // Distance from pixel center to the segment.
                let t = if len_sq > 0.0 {
                    (((cx - a.x) * abx + (cy - a.y) * aby) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let dx = cx - (a.x + abx * t);
                let dy = cy - (a.y + aby * t);
                let dist = (dx * dx + dy * dy).sqrt();
                let cov = (half_width + 0.5 - dist).clamp(0.0, 1.0);
                if cov > 0.0 {
                    let idx = (py - ry0) as usize * row_w + (px - rx0) as usize;
                    let slot = &mut self.scratch.coverage[idx];
                    if cov > *slot {
                        *slot = cov;
                    }
                }
            }
        }
    }

    /// Blend the scratch coverage onto the framebuffer at `opacity`.
    fn composite_coverage(&mut self, color: Color, opacity: f32) {
        let (rx0, ry0, rx1, ry1) = self.scratch.region;
        let row_w = (rx1 - rx0) as usize;
        for py in ry0..ry1 {
            for px in rx0..rx1 {
                let cov = self.scratch.coverage[(py - ry0) as usize * row_w + (px - rx0) as usize];
                if cov > 0.0 {
                    self.fb.blend_pixel(px, py, color, cov * opacity);
                }
            }
        }
    }
}

impl Renderer for SoftwareRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Software
    }

    fn clear(&mut self) {
        self.fb.fill(BACKGROUND);
    }

    fn clear_with_persistence(&mut self, alpha: f32) {
        self.fb.fill_blend(BACKGROUND, alpha);
    }

    fn stroke_polyline(&mut self, points: &[Point], color: Color, opacity: f32, width: f32) {
        if points.len() < 2 || opacity <= 0.0 || width <= 0.0 {
            return;
        }
        let half = width * 0.5;
        let reach = half + 1.0;

        let mut x0 = f32::INFINITY;
        let mut y0 = f32::INFINITY;
        let mut x1 = f32::NEG_INFINITY;
        let mut y1 = f32::NEG_INFINITY;
        for p in points {
            if !p.is_finite() {
                return;
            }
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        if !self.begin_coverage(x0 - reach, y0 - reach, x1 + reach, y1 + reach) {
            return;
        }
        for pair in points.windows(2) {
            self.cover_segment(pair[0], pair[1], half);
        }
        self.composite_coverage(color, opacity.clamp(0.0, 1.0));
    }

    fn fill_dot(&mut self, center: Point, radius: f32, color: Color, opacity: f32) {
        if opacity <= 0.0 || radius <= 0.0 || !center.is_finite() {
            return;
        }
        let reach = radius + 1.0;
        if !self.begin_coverage(
            center.x - reach,
            center.y - reach,
            center.x + reach,
            center.y + reach,
        ) {
            return;
        }
        self.cover_segment(center, center, radius);
        self.composite_coverage(color, opacity.clamp(0.0, 1.0));
    }

    fn draw_fps(&mut self, fps: u32) {
        draw_counter(&mut self.fb, fps.min(999));
    }

    fn finish_frame(&mut self) -> &Framebuffer {
        &self.fb
    }
}

/// Draw an unsigned counter in the top-left corner.
pub(crate) fn draw_counter(fb: &mut Framebuffer, value: u32) {
    crate::glyphs::lit_cells(value, |x, y| {
        for sy in 0..crate::glyphs::GLYPH_SCALE {
            for sx in 0..crate::glyphs::GLYPH_SCALE {
                fb.blend_pixel(x + sx, y + sy, P31_GREEN, 1.0);
            }
        }
    });
}
