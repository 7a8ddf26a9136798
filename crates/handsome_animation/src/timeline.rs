//! Timeline orchestration for property tweeners
//!
//! A timeline is assembled with [`TimelineBuilder`] and then driven by the
//! caller's frame loop. Building and playback are separate types, so the
//! append cursor cannot move once playback has started.
//!
//! ```rust
//! use handsome_animation::Timeline;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! # fn main() -> handsome_animation::Result<()> {
//! let opacity = Rc::new(Cell::new(0.0f32));
//! let offset = Rc::new(Cell::new(0.0f32));
//!
//! let (o, y) = (opacity.clone(), offset.clone());
//! let mut timeline = Timeline::builder()
//!     .tween_property(move |v: f32| o.set(v), 0.0, 1.0, 0.5)?
//!     .wait_all_finished()
//!     .tween_property(move |v: f32| y.set(v), 0.0, 40.0, 1.0)?
//!     .build();
//!
//! timeline.seek_to(0.0);
//! while !timeline.is_finished() {
//!     timeline.update(1.0 / 60.0);
//! }
//! assert_eq!(opacity.get(), 1.0);
//! assert_eq!(offset.get(), 40.0);
//! # Ok(())
//! # }
//! ```

use std::fmt;

use serde::Serialize;

use crate::easing::Easing;
use crate::error::{Result, TweenError};
use crate::tweener::{PropertyTweener, Setter};
use crate::value::{TweenValue, Tweenable};

type FinishedCallback = Box<dyn FnOnce()>;

/// Collects tweeners, delays and barriers before playback
pub struct TimelineBuilder {
    tweeners: Vec<PropertyTweener>,
    /// Delay given to the next appended tweener
    cursor: f32,
    /// Index of the first tweener appended since the last barrier
    batch_start: usize,
    default_easing: Easing,
    on_finished: Option<FinishedCallback>,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self {
            tweeners: Vec::new(),
            cursor: 0.0,
            batch_start: 0,
            default_easing: Easing::Linear,
            on_finished: None,
        }
    }

    /// Easing used by [`tween_property`](Self::tween_property)
    pub fn with_default_easing(mut self, easing: Easing) -> Self {
        self.default_easing = easing;
        self
    }

    /// Append a tween of one property, starting at the current cursor.
    ///
    /// The cursor does not move, so consecutive calls run in parallel.
    pub fn tween_property<T, F>(self, setter: F, from: T, to: T, duration: f32) -> Result<Self>
    where
        T: Tweenable,
        F: FnMut(T) + 'static,
    {
        let easing = self.default_easing;
        self.tween_property_eased(setter, from, to, duration, easing)
    }

    pub fn tween_property_eased<T, F>(
        self,
        setter: F,
        from: T,
        to: T,
        duration: f32,
        easing: Easing,
    ) -> Result<Self>
    where
        T: Tweenable,
        F: FnMut(T) + 'static,
    {
        self.tween_value(
            PropertyTweener::typed_setter(setter),
            from.into_value(),
            to.into_value(),
            duration,
            easing,
        )
    }

    /// Append a tween with an untyped setter.
    ///
    /// Rejects endpoints of different kinds as well as bad durations.
    pub fn tween_value(
        mut self,
        setter: Setter,
        from: TweenValue,
        to: TweenValue,
        duration: f32,
        easing: Easing,
    ) -> Result<Self> {
        let tweener = PropertyTweener::new(setter, from, to, duration, self.cursor, easing)?;
        self.tweeners.push(tweener);
        Ok(self)
    }

    /// Name the most recently appended tweener.
    pub fn label(mut self, name: impl Into<String>) -> Self {
        match self.tweeners.last_mut() {
            Some(tweener) => tweener.set_label(name),
            None => tracing::warn!("label() called before any tween was appended"),
        }
        self
    }

    /// Push the cursor `seconds` further for tweeners appended afterward.
    pub fn wait(mut self, seconds: f32) -> Result<Self> {
        if !(seconds.is_finite() && seconds >= 0.0) {
            return Err(TweenError::InvalidWait(seconds));
        }
        self.cursor += seconds;
        Ok(self)
    }

    /// Barrier: continue after the slowest tween of the current batch.
    ///
    /// The batch is every tweener appended since the previous barrier. An
    /// empty batch leaves the cursor where it is.
    pub fn wait_all_finished(mut self) -> Self {
        let batch_end = self.tweeners[self.batch_start..]
            .iter()
            .map(PropertyTweener::finishes_at)
            .fold(None, |acc: Option<f32>, t| Some(acc.map_or(t, |a| a.max(t))));

        if let Some(end) = batch_end {
            self.cursor = self.cursor.max(end);
        }
        self.batch_start = self.tweeners.len();
        self
    }

    /// Register a callback fired once when playback finishes.
    pub fn on_finished(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_finished = Some(Box::new(callback));
        self
    }

    /// Current append cursor in seconds
    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.tweeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweeners.is_empty()
    }

    /// Freeze the schedule into a playable timeline.
    pub fn build(self) -> Timeline {
        let total_duration = self
            .tweeners
            .iter()
            .map(PropertyTweener::finishes_at)
            .fold(0.0_f32, f32::max);

        tracing::debug!(
            tweens = self.tweeners.len(),
            total_duration,
            "timeline built"
        );

        Timeline {
            tweeners: self.tweeners,
            total_duration,
            elapsed: 0.0,
            state: PlaybackState::Ready,
            on_finished: self.on_finished,
        }
    }
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TimelineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineBuilder")
            .field("tweeners", &self.tweeners)
            .field("cursor", &self.cursor)
            .field("batch_start", &self.batch_start)
            .field("default_easing", &self.default_easing)
            .finish_non_exhaustive()
    }
}

/// Playback phase of a [`Timeline`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Built but never driven
    Ready,
    Playing,
    /// Terminal for `update`; the finished callback has fired
    Finished,
}

/// One row of [`Timeline::schedule`]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScheduleEntry {
    pub label: Option<String>,
    pub delay: f32,
    pub duration: f32,
    pub finishes_at: f32,
}

/// A frozen schedule of tweeners driven by an external clock
pub struct Timeline {
    tweeners: Vec<PropertyTweener>,
    total_duration: f32,
    elapsed: f32,
    state: PlaybackState,
    on_finished: Option<FinishedCallback>,
}

impl Timeline {
    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::new()
    }

    /// Latest `finishes_at` over all tweeners; 0.0 when empty
    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == PlaybackState::Finished
    }

    /// Elapsed time as a fraction of the total duration
    pub fn progress(&self) -> f32 {
        if self.total_duration <= 0.0 {
            return if self.is_finished() { 1.0 } else { 0.0 };
        }
        (self.elapsed / self.total_duration).clamp(0.0, 1.0)
    }

    pub fn len(&self) -> usize {
        self.tweeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweeners.is_empty()
    }

    pub fn tweeners(&self) -> &[PropertyTweener] {
        &self.tweeners
    }

    pub fn schedule(&self) -> Vec<ScheduleEntry> {
        self.tweeners
            .iter()
            .map(|t| ScheduleEntry {
                label: t.label().map(str::to_owned),
                delay: t.delay(),
                duration: t.duration(),
                finishes_at: t.finishes_at(),
            })
            .collect()
    }

    /// Advance playback by `dt` seconds.
    ///
    /// Every tweener is re-evaluated in insertion order. The timeline
    /// finishes once `elapsed` is strictly greater than the total duration,
    /// so the frame that lands exactly on the end still counts as playing.
    /// After that, calls are no-ops.
    pub fn update(&mut self, dt: f32) {
        if self.is_finished() {
            return;
        }

        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            tracing::warn!(dt, "ignoring invalid timeline delta");
            0.0
        };

        self.state = PlaybackState::Playing;
        self.elapsed += dt;
        self.apply(self.elapsed);

        if self.elapsed > self.total_duration {
            self.finish();
        }
    }

    /// Jump to absolute time `t` seconds and re-evaluate every tweener.
    ///
    /// Unlike [`update`](Self::update) the end is inclusive: seeking to
    /// exactly the total duration finishes the timeline. Seeking back
    /// before the end resumes playback, but the finished callback never
    /// fires twice. Negative or NaN times are clamped to 0.
    pub fn seek_to(&mut self, t: f32) {
        let t = if t.is_nan() { 0.0 } else { t.max(0.0) };
        self.elapsed = t;
        self.apply(t);

        if t >= self.total_duration {
            self.finish();
        } else {
            self.state = PlaybackState::Playing;
        }
    }

    fn apply(&mut self, t: f32) {
        for tweener in &mut self.tweeners {
            tweener.update(t);
        }
    }

    fn finish(&mut self) {
        self.state = PlaybackState::Finished;
        if let Some(callback) = self.on_finished.take() {
            tracing::debug!(elapsed = self.elapsed, "timeline finished");
            callback();
        }
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("tweeners", &self.tweeners)
            .field("total_duration", &self.total_duration)
            .field("elapsed", &self.elapsed)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
