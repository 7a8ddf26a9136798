//! Easing transforms
//!
//! An [`Easing`] maps a tweener's normalized progress (0.0 to 1.0) to the
//! interpolation fraction handed to [`TweenValue::lerp`](crate::TweenValue::lerp).

use serde::{Deserialize, Serialize};

/// Progress transform applied by a tweener
///
/// In config files unit variants are written in kebab-case (`"ease-out-cubic"`)
/// and the bezier variant as `{ cubic-bezier = [x1, y1, x2, y2] }`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Map progress `t` to an eased fraction.
    ///
    /// `t` is clamped to `[0, 1]` first, so the endpoints always map to
    /// exactly 0.0 and 1.0.
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match *self {
            Easing::Linear => t,
            Easing::EaseInQuad => power_in(t, 2),
            Easing::EaseOutQuad => power_out(t, 2),
            Easing::EaseInOutQuad => power_in_out(t, 2),
            // The unqualified curves are the cubic family.
            Easing::EaseIn | Easing::EaseInCubic => power_in(t, 3),
            Easing::EaseOut | Easing::EaseOutCubic => power_out(t, 3),
            Easing::EaseInOut | Easing::EaseInOutCubic => power_in_out(t, 3),
            Easing::EaseInQuart => power_in(t, 4),
            Easing::EaseOutQuart => power_out(t, 4),
            Easing::EaseInOutQuart => power_in_out(t, 4),
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, x1, y1, x2, y2),
        }
    }
}

#[inline]
fn power_in(t: f32, n: i32) -> f32 {
    t.powi(n)
}

#[inline]
fn power_out(t: f32, n: i32) -> f32 {
    1.0 - (1.0 - t).powi(n)
}

#[inline]
fn power_in_out(t: f32, n: i32) -> f32 {
    if t < 0.5 {
        // 2^(n-1) * t^n
        (1 << (n - 1)) as f32 * t.powi(n)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(n) / 2.0
    }
}

/// CSS-style cubic bezier timing function.
///
/// The curve parameter for `t` is bracketed from a coarse sample table of
/// the x axis, then refined with Newton steps that fall back to bisection
/// whenever a step would leave the bracket.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let x_axis = BezierAxis::new(x1 as f64, x2 as f64);
    let y_axis = BezierAxis::new(y1 as f64, y2 as f64);
    let p = x_axis.solve(t as f64);
    y_axis.at(p) as f32
}

const BEZIER_SAMPLES: usize = 11;
const BEZIER_TOLERANCE: f64 = 1e-7;

/// One axis of a bezier anchored at 0 and 1, as `((a*p + b)*p + c)*p`
#[derive(Clone, Copy)]
struct BezierAxis {
    a: f64,
    b: f64,
    c: f64,
}

impl BezierAxis {
    fn new(p1: f64, p2: f64) -> Self {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        Self {
            a: 1.0 - c - b,
            b,
            c,
        }
    }

    #[inline]
    fn at(self, p: f64) -> f64 {
        ((self.a * p + self.b) * p + self.c) * p
    }

    #[inline]
    fn slope(self, p: f64) -> f64 {
        (3.0 * self.a * p + 2.0 * self.b) * p + self.c
    }

    /// Parameter `p` in `[0, 1]` with `at(p) == x`
    fn solve(self, x: f64) -> f64 {
        let step = 1.0 / (BEZIER_SAMPLES - 1) as f64;
        let samples: [f64; BEZIER_SAMPLES] = std::array::from_fn(|i| self.at(i as f64 * step));

        let slot = samples[1..]
            .iter()
            .position(|&v| v >= x)
            .unwrap_or(BEZIER_SAMPLES - 2);
        let (mut lo, mut hi) = (slot as f64 * step, (slot + 1) as f64 * step);

        let (v_lo, v_hi) = (samples[slot], samples[slot + 1]);
        let mut p = if v_hi > v_lo {
            lo + (x - v_lo) / (v_hi - v_lo) * step
        } else {
            (lo + hi) * 0.5
        };

        for _ in 0..32 {
            let err = self.at(p) - x;
            if err.abs() < BEZIER_TOLERANCE {
                break;
            }
            if err < 0.0 {
                lo = p;
            } else {
                hi = p;
            }

            let slope = self.slope(p);
            let next = if slope.abs() > 1e-9 { p - err / slope } else { f64::NAN };
            // NaN fails the range check too.
            p = if next > lo && next < hi {
                next
            } else {
                (lo + hi) * 0.5
            };
        }
        p
    }
}
