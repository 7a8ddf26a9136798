//! Interpolated property values
//!
//! Tweeners interpolate a closed set of value kinds instead of taking an
//! arbitrary lerp callback. [`Tweenable`] bridges plain Rust types to
//! [`TweenValue`] so setters stay strongly typed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// RGBA color with components in 0.0..=1.0
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// A value a tweener can interpolate
///
/// Deserializes untagged: integers become [`TweenValue::Discrete`], floats
/// [`TweenValue::Scalar`], two-element arrays [`TweenValue::Vec2`] and
/// `{ r, g, b, a }` tables [`TweenValue::Color`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TweenValue {
    /// Stepped integer (letter counts, frame indices)
    Discrete(i64),
    Scalar(f32),
    Vec2([f32; 2]),
    Color(Rgba),
}

/// The kind of a [`TweenValue`], used to reject mismatched endpoints
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Discrete,
    Scalar,
    Vec2,
    Color,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Discrete => "discrete",
            ValueKind::Scalar => "scalar",
            ValueKind::Vec2 => "vec2",
            ValueKind::Color => "color",
        };
        f.write_str(name)
    }
}

impl TweenValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            TweenValue::Discrete(_) => ValueKind::Discrete,
            TweenValue::Scalar(_) => ValueKind::Scalar,
            TweenValue::Vec2(_) => ValueKind::Vec2,
            TweenValue::Color(_) => ValueKind::Color,
        }
    }

    /// Interpolate from `self` toward `to` by fraction `d`.
    ///
    /// `d` is expected in `[0, 1]` but is not clamped, so overshooting
    /// easings extrapolate. Discrete values step toward `to` and only reach
    /// it at `d >= 1`, staying within the endpoints even for spans wider
    /// than `i64`. Mismatched kinds return `self` unchanged; the
    /// timeline builder rejects them before playback.
    pub fn lerp(&self, to: &TweenValue, d: f32) -> TweenValue {
        match (*self, *to) {
            (TweenValue::Scalar(a), TweenValue::Scalar(b)) => TweenValue::Scalar(lerp_f32(a, b, d)),
            (TweenValue::Vec2(a), TweenValue::Vec2(b)) => {
                TweenValue::Vec2([lerp_f32(a[0], b[0], d), lerp_f32(a[1], b[1], d)])
            }
            (TweenValue::Color(a), TweenValue::Color(b)) => TweenValue::Color(Rgba {
                r: lerp_f32(a.r, b.r, d),
                g: lerp_f32(a.g, b.g, d),
                b: lerp_f32(a.b, b.b, d),
                a: lerp_f32(a.a, b.a, d),
            }),
            (TweenValue::Discrete(a), TweenValue::Discrete(b)) => {
                if d >= 1.0 {
                    TweenValue::Discrete(b)
                } else {
                    TweenValue::Discrete(step_discrete(a, b, d))
                }
            }
            _ => *self,
        }
    }

    pub fn as_scalar(&self) -> Option<f32> {
        match *self {
            TweenValue::Scalar(v) => Some(v),
            TweenValue::Discrete(v) => Some(v as f32),
            _ => None,
        }
    }
}

impl fmt::Display for TweenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TweenValue::Discrete(v) => write!(f, "{}", v),
            TweenValue::Scalar(v) => write!(f, "{:.3}", v),
            TweenValue::Vec2([x, y]) => write!(f, "({:.3}, {:.3})", x, y),
            TweenValue::Color(c) => write!(f, "rgba({:.3}, {:.3}, {:.3}, {:.3})", c.r, c.g, c.b, c.a),
        }
    }
}

/// `a` stepped toward `b` by `trunc((b - a) * d)`, computed in i128 and
/// clamped to the endpoints.
fn step_discrete(a: i64, b: i64, d: f32) -> i64 {
    let span = b as i128 - a as i128;
    let step = (span as f64 * d as f64).trunc() as i128;
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    (a as i128 + step).clamp(lo as i128, hi as i128) as i64
}

#[inline]
fn lerp_f32(a: f32, b: f32, d: f32) -> f32 {
    a + (b - a) * d
}

/// Plain Rust types that map onto one [`TweenValue`] kind
pub trait Tweenable: Sized + 'static {
    fn into_value(self) -> TweenValue;

    /// Recover the typed value; `None` when the kind does not match.
    fn from_value(value: &TweenValue) -> Option<Self>;
}

impl Tweenable for f32 {
    fn into_value(self) -> TweenValue {
        TweenValue::Scalar(self)
    }

    fn from_value(value: &TweenValue) -> Option<Self> {
        match *value {
            TweenValue::Scalar(v) => Some(v),
            _ => None,
        }
    }
}

impl Tweenable for f64 {
    fn into_value(self) -> TweenValue {
        TweenValue::Scalar(self as f32)
    }

    fn from_value(value: &TweenValue) -> Option<Self> {
        match *value {
            TweenValue::Scalar(v) => Some(v as f64),
            _ => None,
        }
    }
}

impl Tweenable for [f32; 2] {
    fn into_value(self) -> TweenValue {
        TweenValue::Vec2(self)
    }

    fn from_value(value: &TweenValue) -> Option<Self> {
        match *value {
            TweenValue::Vec2(v) => Some(v),
            _ => None,
        }
    }
}

impl Tweenable for Rgba {
    fn into_value(self) -> TweenValue {
        TweenValue::Color(self)
    }

    fn from_value(value: &TweenValue) -> Option<Self> {
        match *value {
            TweenValue::Color(c) => Some(c),
            _ => None,
        }
    }
}

impl Tweenable for i64 {
    fn into_value(self) -> TweenValue {
        TweenValue::Discrete(self)
    }

    fn from_value(value: &TweenValue) -> Option<Self> {
        match *value {
            TweenValue::Discrete(v) => Some(v),
            _ => None,
        }
    }
}

impl Tweenable for TweenValue {
    fn into_value(self) -> TweenValue {
        self
    }

    fn from_value(value: &TweenValue) -> Option<Self> {
        Some(*value)
    }
}

impl From<f32> for TweenValue {
    fn from(v: f32) -> Self {
        TweenValue::Scalar(v)
    }
}

impl From<i64> for TweenValue {
    fn from(v: i64) -> Self {
        TweenValue::Discrete(v)
    }
}

impl From<[f32; 2]> for TweenValue {
    fn from(v: [f32; 2]) -> Self {
        TweenValue::Vec2(v)
    }
}

impl From<Rgba> for TweenValue {
    fn from(c: Rgba) -> Self {
        TweenValue::Color(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_lerp() {
        let v = TweenValue::Scalar(2.0).lerp(&TweenValue::Scalar(4.0), 0.5);
        assert_eq!(v, TweenValue::Scalar(3.0));
    }

    #[test]
    fn test_color_lerp_is_component_wise() {
        let from = TweenValue::Color(Rgba::new(0.0, 0.0, 0.0, 1.0));
        let to = TweenValue::Color(Rgba::new(1.0, 0.5, 0.0, 0.0));
        match from.lerp(&to, 0.5) {
            TweenValue::Color(c) => {
                assert!((c.r - 0.5).abs() < 1e-6);
                assert!((c.g - 0.25).abs() < 1e-6);
                assert_eq!(c.b, 0.0);
                assert!((c.a - 0.5).abs() < 1e-6);
            }
            other => panic!("expected color, got {:?}", other),
        }
    }

    #[test]
    fn test_discrete_steps_toward_target() {
        let from = TweenValue::Discrete(0);
        let to = TweenValue::Discrete(10);
        assert_eq!(from.lerp(&to, 0.0), TweenValue::Discrete(0));
        assert_eq!(from.lerp(&to, 0.39), TweenValue::Discrete(3));
        assert_eq!(from.lerp(&to, 0.999), TweenValue::Discrete(9));
        assert_eq!(from.lerp(&to, 1.0), TweenValue::Discrete(10));

        // Counting down truncates toward the start value as well
        let down = TweenValue::Discrete(10).lerp(&TweenValue::Discrete(0), 0.39);
        assert_eq!(down, TweenValue::Discrete(7));
    }

    #[test]
    fn test_fade_color_alpha() {
        let from = TweenValue::Color(Rgba::WHITE);
        let to = TweenValue::Color(Rgba::WHITE.with_alpha(0.0));
        assert_eq!(from.lerp(&to, 1.0), to);
        assert_eq!(to, TweenValue::Color(Rgba::new(1.0, 1.0, 1.0, Rgba::TRANSPARENT.a)));
        assert_eq!(TweenValue::Discrete(7).as_scalar(), Some(7.0));
        assert_eq!(TweenValue::Vec2([0.0, 0.0]).as_scalar(), None);
    }

    #[test]
    fn test_discrete_extreme_endpoints_do_not_overflow() {
        let from = TweenValue::Discrete(i64::MIN);
        let to = TweenValue::Discrete(i64::MAX);
        for d in [0.0, 0.25, 0.5, 0.999, -0.5] {
            match from.lerp(&to, d) {
                TweenValue::Discrete(_) => {}
                other => panic!("expected discrete, got {:?}", other),
            }
        }
        assert_eq!(from.lerp(&to, 0.0), from);
        assert_eq!(from.lerp(&to, -0.5), from);
        assert_eq!(to.lerp(&from, 1.0), from);

        // Halfway lands near zero
        match from.lerp(&to, 0.5) {
            TweenValue::Discrete(v) => assert!(v.unsigned_abs() < 1 << 12, "got {}", v),
            other => panic!("expected discrete, got {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_kinds_keep_start_value() {
        let from = TweenValue::Scalar(1.0);
        assert_eq!(from.lerp(&TweenValue::Discrete(5), 0.5), from);
    }

    #[test]
    fn test_tweenable_round_trip_rejects_other_kinds() {
        assert_eq!(f32::from_value(&TweenValue::Scalar(1.5)), Some(1.5));
        assert_eq!(f32::from_value(&TweenValue::Discrete(1)), None);
        assert_eq!(i64::from_value(&3i64.into_value()), Some(3));
        assert_eq!(<[f32; 2]>::from_value(&TweenValue::Scalar(0.0)), None);
    }

    #[test]
    fn test_untagged_deserialize() {
        #[derive(Deserialize)]
        struct Holder {
            int: TweenValue,
            float: TweenValue,
            vec: TweenValue,
            color: TweenValue,
        }

        let holder: Holder = toml::from_str(
            "int = 4\nfloat = 0.5\nvec = [1.0, 2.0]\ncolor = { r = 1.0, g = 0.0, b = 0.0 }",
        )
        .unwrap();
        assert_eq!(holder.int, TweenValue::Discrete(4));
        assert_eq!(holder.float, TweenValue::Scalar(0.5));
        assert_eq!(holder.vec, TweenValue::Vec2([1.0, 2.0]));
        assert_eq!(holder.color, TweenValue::Color(Rgba::new(1.0, 0.0, 0.0, 1.0)));
    }
}
