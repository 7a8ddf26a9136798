//! Tween presets for common HUD patterns
//!
//! Presets append to an existing [`TimelineBuilder`] so they compose with
//! hand-written steps and with each other.

use crate::config::NotificationSettings;
use crate::easing::Easing;
use crate::error::Result;
use crate::timeline::TimelineBuilder;

/// Pre-built tween sequences
pub struct TweenPreset;

impl TweenPreset {
    // ========================================================================
    // Fades
    // ========================================================================

    /// Opacity 0 -> 1
    pub fn fade_in(
        builder: TimelineBuilder,
        setter: impl FnMut(f32) + 'static,
        duration: f32,
    ) -> Result<TimelineBuilder> {
        builder.tween_property_eased(setter, 0.0, 1.0, duration, Easing::EaseOut)
    }

    /// Opacity 1 -> 0
    pub fn fade_out(
        builder: TimelineBuilder,
        setter: impl FnMut(f32) + 'static,
        duration: f32,
        easing: Easing,
    ) -> Result<TimelineBuilder> {
        builder.tween_property_eased(setter, 1.0, 0.0, duration, easing)
    }

    // ========================================================================
    // Text
    // ========================================================================

    /// Reveal `letters` characters one at a time.
    ///
    /// The setter receives the number of visible characters. An empty label
    /// appends nothing.
    pub fn typewriter(
        builder: TimelineBuilder,
        setter: impl FnMut(i64) + 'static,
        letters: usize,
        letters_per_second: f32,
    ) -> Result<TimelineBuilder> {
        if letters == 0 {
            return Ok(builder);
        }
        let duration = letters as f32 / letters_per_second;
        builder.tween_property_eased(setter, 0_i64, letters as i64, duration, Easing::Linear)
    }
}

/// The level-up banner: type out the label, hold it, then fade it away
///
/// The reveal advances one step per non-space character; spaces appear
/// together with the letter before them. While a letter is being typed a
/// "ghost" copy of it fades in.
#[derive(Debug, Clone)]
pub struct LevelUpNotification {
    text: String,
    settings: NotificationSettings,
    /// Visible character count after each reveal step, starting at step 0
    stops: Vec<usize>,
}

impl LevelUpNotification {
    pub fn new(text: impl Into<String>, settings: NotificationSettings) -> Self {
        let text = text.into();
        let stops = reveal_stops(&text);
        Self {
            text,
            settings,
            stops,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn settings(&self) -> &NotificationSettings {
        &self.settings
    }

    pub fn letter_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Number of typed steps; spaces take none
    pub fn reveal_steps(&self) -> usize {
        self.stops.len() - 1
    }

    /// Visible character count once `step` letters have been typed
    pub fn visible_at_step(&self, step: usize) -> usize {
        self.stops[step.min(self.reveal_steps())]
    }

    /// The character the ghost label shows past `visible` characters
    pub fn ghost_glyph(&self, visible: usize) -> Option<char> {
        self.text.chars().nth(visible)
    }

    /// Seconds until the whole label is visible
    pub fn reveal_duration(&self) -> f32 {
        self.reveal_steps() as f32 / self.settings.letters_per_second
    }

    /// Seconds until the label has fully faded
    pub fn total_duration(&self) -> f32 {
        self.reveal_duration() + self.settings.fade_delay + self.settings.fade_duration
    }

    /// Build the banner timeline.
    ///
    /// `on_letters` receives the visible character count, `on_ghost` the
    /// opacity of the next glyph being typed (0 once the reveal ends) and
    /// `on_alpha` the label opacity. The builder is returned so callers can
    /// attach `on_finished` (typically closing the HUD element).
    pub fn timeline(
        &self,
        mut on_letters: impl FnMut(i64) + 'static,
        mut on_ghost: impl FnMut(f32) + 'static,
        on_alpha: impl FnMut(f32) + 'static,
    ) -> Result<TimelineBuilder> {
        self.settings.validate()?;

        let mut builder = TimelineBuilder::new();
        let steps = self.reveal_steps();
        if steps > 0 {
            let stops = self.stops.clone();
            let reveal = move |progress: f32| {
                let step = (progress.max(0.0).floor() as usize).min(steps);
                let partial = if step == steps {
                    0.0
                } else {
                    progress - step as f32
                };
                on_letters(stops[step] as i64);
                on_ghost(partial.clamp(0.0, 1.0));
            };
            builder = builder
                .tween_property_eased(
                    reveal,
                    0.0_f32,
                    steps as f32,
                    self.reveal_duration(),
                    Easing::Linear,
                )?
                .label("reveal");
        }

        // Empty labels still fade, so the banner always closes.
        let builder = builder.wait_all_finished().wait(self.settings.fade_delay)?;
        let builder = TweenPreset::fade_out(
            builder,
            on_alpha,
            self.settings.fade_duration,
            self.settings.fade_easing,
        )?;

        Ok(builder.label("alpha"))
    }
}

/// Visible character counts per reveal step.
///
/// Entry `k` is the position just past the `k`-th non-space character,
/// extended over any spaces that follow it.
fn reveal_stops(text: &str) -> Vec<usize> {
    let chars: Vec<char> = text.chars().collect();
    let past_spaces = |mut i: usize| {
        while i < chars.len() && chars[i] == ' ' {
            i += 1;
        }
        i
    };

    let mut stops = vec![past_spaces(0)];
    for (i, c) in chars.iter().enumerate() {
        if *c != ' ' {
            stops.push(past_spaces(i + 1));
        }
    }
    stops
}
