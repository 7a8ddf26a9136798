//! Single-property tweener

use std::fmt;

use crate::easing::Easing;
use crate::error::{Result, TweenError};
use crate::value::{TweenValue, Tweenable};

/// Applies an interpolated value to an external target
pub type Setter = Box<dyn FnMut(&TweenValue)>;

/// Interpolates one property between two values over a duration
///
/// The tweener holds no clock of its own. It is evaluated against the
/// timeline's absolute time and clamps everything outside
/// `[delay, delay + duration]`.
pub struct PropertyTweener {
    setter: Setter,
    from: TweenValue,
    to: TweenValue,
    easing: Easing,
    duration: f32,
    delay: f32,
    label: Option<String>,
}

impl PropertyTweener {
    /// Create a tweener starting `delay` seconds into its timeline.
    ///
    /// Fails when `duration` is not a positive finite number or when the
    /// endpoints are different value kinds.
    pub fn new(
        setter: Setter,
        from: TweenValue,
        to: TweenValue,
        duration: f32,
        delay: f32,
        easing: Easing,
    ) -> Result<Self> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(TweenError::InvalidDuration(duration));
        }
        if from.kind() != to.kind() {
            return Err(TweenError::KindMismatch {
                from: from.kind(),
                to: to.kind(),
            });
        }

        Ok(Self {
            setter,
            from,
            to,
            easing,
            duration,
            delay,
            label: None,
        })
    }

    /// Wrap a typed setter so it can receive [`TweenValue`]s.
    pub fn typed_setter<T, F>(mut setter: F) -> Setter
    where
        T: Tweenable,
        F: FnMut(T) + 'static,
    {
        Box::new(move |value: &TweenValue| {
            if let Some(typed) = T::from_value(value) {
                setter(typed);
            }
        })
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = Some(label.into());
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn start_value(&self) -> TweenValue {
        self.from
    }

    pub fn end_value(&self) -> TweenValue {
        self.to
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    /// Absolute timeline time at which this tweener reaches `to`
    pub fn finishes_at(&self) -> f32 {
        self.delay + self.duration
    }

    /// Eased progress fraction at absolute time `t`
    pub fn fraction_at(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t };
        let local = (t - self.delay).clamp(0.0, self.duration);
        self.easing.apply(local / self.duration)
    }

    /// Value at absolute time `t` without touching the target
    pub fn value_at(&self, t: f32) -> TweenValue {
        let d = self.fraction_at(t);
        // Pin the endpoints exactly regardless of float error in lerp.
        if d <= 0.0 {
            self.from
        } else if d >= 1.0 {
            self.to
        } else {
            self.from.lerp(&self.to, d)
        }
    }

    /// Evaluate at absolute time `t` and push the value to the target.
    pub fn update(&mut self, t: f32) {
        let value = self.value_at(t);
        (self.setter)(&value);
    }
}

impl fmt::Debug for PropertyTweener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyTweener")
            .field("label", &self.label)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("easing", &self.easing)
            .field("duration", &self.duration)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn scalar_tweener(
        from: f32,
        to: f32,
        duration: f32,
        delay: f32,
    ) -> (PropertyTweener, Rc<Cell<f32>>) {
        let target = Rc::new(Cell::new(f32::NAN));
        let sink = target.clone();
        let tweener = PropertyTweener::new(
            PropertyTweener::typed_setter(move |v: f32| sink.set(v)),
            from.into(),
            to.into(),
            duration,
            delay,
            Easing::Linear,
        )
        .unwrap();
        (tweener, target)
    }

    #[test]
    fn test_before_delay_pins_to_start() {
        let (mut tweener, target) = scalar_tweener(3.0, 9.0, 2.0, 1.5);
        for t in [-10.0, 0.0, 0.75, 1.5] {
            tweener.update(t);
            assert_eq!(target.get(), 3.0, "t = {}", t);
        }
    }

    #[test]
    fn test_after_finish_pins_to_end() {
        let (mut tweener, target) = scalar_tweener(3.0, 9.0, 2.0, 1.5);
        assert_eq!(tweener.finishes_at(), 3.5);
        for t in [3.5, 3.6, 100.0, f32::INFINITY] {
            tweener.update(t);
            assert_eq!(target.get(), 9.0, "t = {}", t);
        }
    }

    #[test]
    fn test_linear_midpoint() {
        let (mut tweener, target) = scalar_tweener(-2.0, 6.0, 4.0, 1.0);
        tweener.update(1.0 + 2.0);
        assert!((target.get() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_nan_time_reads_as_zero() {
        let (mut tweener, target) = scalar_tweener(1.0, 2.0, 1.0, 0.0);
        tweener.update(f32::NAN);
        assert_eq!(target.get(), 1.0);
    }

    #[test]
    fn test_rejects_bad_duration() {
        for duration in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let result = PropertyTweener::new(
                Box::new(|_: &TweenValue| {}),
                TweenValue::Scalar(0.0),
                TweenValue::Scalar(1.0),
                duration,
                0.0,
                Easing::Linear,
            );
            assert!(matches!(result, Err(TweenError::InvalidDuration(_))));
        }
    }

    #[test]
    fn test_rejects_kind_mismatch() {
        let result = PropertyTweener::new(
            Box::new(|_: &TweenValue| {}),
            TweenValue::Scalar(0.0),
            TweenValue::Vec2([1.0, 1.0]),
            1.0,
            0.0,
            Easing::Linear,
        );
        assert!(matches!(result, Err(TweenError::KindMismatch { .. })));
    }

    #[test]
    fn test_eased_value_differs_from_linear() {
        let mut tweener = PropertyTweener::new(
            Box::new(|_: &TweenValue| {}),
            TweenValue::Scalar(0.0),
            TweenValue::Scalar(1.0),
            1.0,
            0.0,
            Easing::EaseInQuad,
        )
        .unwrap();
        tweener.set_label("opacity");
        assert_eq!(tweener.label(), Some("opacity"));
        assert_eq!(tweener.value_at(0.5), TweenValue::Scalar(0.25));
    }
}
