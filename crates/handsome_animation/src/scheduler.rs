//! Tween scheduler
//!
//! Owns every running timeline and advances them each frame. Finished
//! timelines are dropped on the tick that finishes them.

use crate::timeline::Timeline;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::time::Instant;

new_key_type! {
    pub struct TimelineId;
}

/// A callback deferred until enough frame time has accumulated
struct DelayedCall {
    remaining: f32,
    callback: Box<dyn FnOnce()>,
}

/// Drives a set of timelines from one frame clock
pub struct TweenScheduler {
    timelines: SlotMap<TimelineId, Timeline>,
    delayed: Vec<DelayedCall>,
    last_frame: Instant,
}

impl TweenScheduler {
    pub fn new() -> Self {
        Self {
            timelines: SlotMap::with_key(),
            delayed: Vec::new(),
            last_frame: Instant::now(),
        }
    }

    pub fn add(&mut self, timeline: Timeline) -> TimelineId {
        self.timelines.insert(timeline)
    }

    pub fn get(&self, id: TimelineId) -> Option<&Timeline> {
        self.timelines.get(id)
    }

    pub fn get_mut(&mut self, id: TimelineId) -> Option<&mut Timeline> {
        self.timelines.get_mut(id)
    }

    /// Stop tracking a timeline; its finished callback will not fire.
    pub fn remove(&mut self, id: TimelineId) -> Option<Timeline> {
        self.timelines.remove(id)
    }

    /// Run `callback` once, on the first tick where at least `delay`
    /// seconds have passed since scheduling.
    pub fn schedule_once(&mut self, delay: f32, callback: impl FnOnce() + 'static) {
        self.delayed.push(DelayedCall {
            remaining: delay.max(0.0),
            callback: Box::new(callback),
        });
    }

    /// Advance everything by `dt` seconds.
    ///
    /// Returns how many timelines finished and were removed.
    pub fn tick(&mut self, dt: f32) -> usize {
        let mut finished: SmallVec<[TimelineId; 8]> = SmallVec::new();
        for (id, timeline) in self.timelines.iter_mut() {
            timeline.update(dt);
            if timeline.is_finished() {
                finished.push(id);
            }
        }
        for id in &finished {
            self.timelines.remove(*id);
        }

        self.run_delayed(dt);

        tracing::trace!(
            dt,
            active = self.timelines.len(),
            finished = finished.len(),
            "scheduler tick"
        );
        finished.len()
    }

    /// Tick using wall-clock time since the previous `tick_now`.
    pub fn tick_now(&mut self) -> usize {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.tick(dt)
    }

    fn run_delayed(&mut self, dt: f32) {
        if self.delayed.is_empty() {
            return;
        }

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.delayed.len() {
            self.delayed[i].remaining -= dt;
            if self.delayed[i].remaining <= 0.0 {
                due.push(self.delayed.swap_remove(i));
            } else {
                i += 1;
            }
        }

        // Callbacks run after bookkeeping so they cannot observe a
        // half-updated queue.
        for call in due {
            (call.callback)();
        }
    }

    pub fn has_active_timelines(&self) -> bool {
        !self.timelines.is_empty()
    }

    pub fn pending_calls(&self) -> usize {
        self.delayed.len()
    }

    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TimelineId, &Timeline)> {
        self.timelines.iter()
    }
}

impl Default for TweenScheduler {
    fn default() -> Self {
        Self::new()
    }
}
