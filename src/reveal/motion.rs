//! Particle fly-in animation.
//!
//! Each particle starts scattered somewhere in the viewport, invisible and
//! shrunk to nothing, and eases into its module position at full size and
//! opacity once its own delay has elapsed.

use crate::models::{Bitmap, ParticleField, Point, Rgb};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Fly-in duration of a single particle, in seconds
pub const ANIMATION_SECONDS: f32 = 1.0;

/// `cubic-bezier(0.16, 1, 0.3, 1)`: fast start, long soft landing
pub const EASE_OUT_EXPO: CubicBezier = CubicBezier::new(0.16, 1.0, 0.3, 1.0);

/// CSS-style timing curve through (0,0), (x1,y1), (x2,y2), (1,1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl CubicBezier {
    /// Curve with the given control points; x values must lie in [0, 1]
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn axis(a: f32, b: f32, t: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * t * a + 3.0 * u * t * t * b + t * t * t
    }

    fn axis_slope(a: f32, b: f32, t: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * a + 6.0 * u * t * (b - a) + 3.0 * t * t * (1.0 - b)
    }

    /// Eased progress for linear progress `x` in [0, 1]
    pub fn ease(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }

        // Newton first, bisection if the slope flattens out
        let mut t = x;
        for _ in 0..8 {
            let err = Self::axis(self.x1, self.x2, t) - x;
            if err.abs() < 1e-6 {
                return Self::axis(self.y1, self.y2, t);
            }
            let slope = Self::axis_slope(self.x1, self.x2, t);
            if slope.abs() < 1e-6 {
                break;
            }
            t -= err / slope;
        }

        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        t = x;
        for _ in 0..32 {
            let v = Self::axis(self.x1, self.x2, t);
            if (v - x).abs() < 1e-6 {
                break;
            }
            if v < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        Self::axis(self.y1, self.y2, t)
    }
}

/// One particle's visual state at an instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleFrame {
    /// Top-left corner, before scaling
    pub position: Point,
    /// 0 (invisible) to 1 (opaque)
    pub opacity: f32,
    /// 0 (collapsed) to 1 (full module size)
    pub scale: f32,
}

/// Scatter offsets for every particle of a field.
#[derive(Debug, Clone)]
pub struct MotionPlan {
    offsets: Vec<Point>,
    easing: CubicBezier,
}

impl MotionPlan {
    /// Scatter each particle uniformly within +/- half the viewport on each
    /// axis. The same seed always yields the same plan.
    pub fn new(field: &ParticleField, viewport: (f32, f32), seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let (vw, vh) = viewport;
        let offsets = field
            .particles
            .iter()
            .map(|_| {
                Point::new(
                    rng.random_range(-0.5f32..0.5) * vw,
                    rng.random_range(-0.5f32..0.5) * vh,
                )
            })
            .collect();
        Self {
            offsets,
            easing: EASE_OUT_EXPO,
        }
    }

    /// Starting offset of particle `index`
    pub fn offset(&self, index: usize) -> Point {
        self.offsets.get(index).copied().unwrap_or_default()
    }

    /// State of particle `index` of `field` at `elapsed` seconds into the cycle.
    pub fn frame(&self, field: &ParticleField, index: usize, elapsed: f32) -> ParticleFrame {
        let particle = &field.particles[index];
        let linear = ((elapsed - particle.delay) / ANIMATION_SECONDS).clamp(0.0, 1.0);
        let progress = self.easing.ease(linear);
        let offset = self.offset(index);
        let start = particle.position.translate(offset.x, offset.y);
        ParticleFrame {
            position: start.lerp(&particle.position, progress),
            opacity: progress,
            scale: progress,
        }
    }

    /// Whether every particle has landed at `elapsed`
    pub fn is_finished(&self, field: &ParticleField, elapsed: f32) -> bool {
        field
            .particles
            .iter()
            .all(|p| elapsed >= p.delay + ANIMATION_SECONDS)
    }
}

/// Draw one animation frame: every particle at `elapsed`, in `foreground`,
/// over a `size`-square canvas of `background`.
pub fn compose_frame(
    field: &ParticleField,
    plan: &MotionPlan,
    elapsed: f32,
    size: usize,
    foreground: Rgb,
    background: Rgb,
) -> Bitmap {
    let mut canvas = Bitmap::filled(size, size, background);
    for index in 0..field.particles.len() {
        let frame = plan.frame(field, index, elapsed);
        if frame.opacity <= 0.0 || frame.scale <= 0.0 {
            continue;
        }
        let full = field.particles[index].size;
        let edge = full * frame.scale;
        let inset = (full - edge) / 2.0;
        let x0 = frame.position.x + inset;
        let y0 = frame.position.y + inset;
        draw_square(&mut canvas, x0, y0, edge, foreground, frame.opacity);
    }
    canvas
}

fn draw_square(canvas: &mut Bitmap, x0: f32, y0: f32, edge: f32, color: Rgb, alpha: f32) {
    let (w, h) = (canvas.width() as f32, canvas.height() as f32);
    let left = x0.max(0.0);
    let top = y0.max(0.0);
    let right = (x0 + edge).min(w);
    let bottom = (y0 + edge).min(h);
    if left >= right || top >= bottom {
        return;
    }
    let blend = |under: u8, over: u8| {
        (under as f32 + (over as f32 - under as f32) * alpha).round() as u8
    };
    for y in top.floor() as usize..bottom.ceil() as usize {
        for x in left.floor() as usize..right.ceil() as usize {
            let [r, g, b, _] = canvas.pixel(x, y);
            canvas.put(x, y, [blend(r, color.r), blend(g, color.g), blend(b, color.b), 255]);
        }
    }
}
