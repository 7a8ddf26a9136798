//! Declarative timeline and preset configuration
//!
//! Timelines can be described in TOML and resolved against a
//! [`PropertyStore`], which stands in for the external targets a host would
//! normally provide setters for.
//!
//! ```toml
//! easing = "ease-out"
//!
//! [[step]]
//! kind = "tween"
//! property = "alpha"
//! from = 0.0
//! to = 1.0
//! duration = 0.5
//!
//! [[step]]
//! kind = "wait-all"
//!
//! [[step]]
//! kind = "tween"
//! property = "letters"
//! from = 0
//! to = 12
//! duration = 1.0
//! easing = "linear"
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::{Result, TweenError};
use crate::timeline::{Timeline, TimelineBuilder};
use crate::tweener::Setter;
use crate::value::TweenValue;

/// A whole timeline description
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TimelineConfig {
    /// Display name, used in logs only
    #[serde(default)]
    pub name: Option<String>,
    /// Easing for tween steps that do not name one
    #[serde(default)]
    pub easing: Easing,
    #[serde(default, rename = "step")]
    pub steps: Vec<StepConfig>,
}

/// One builder call
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StepConfig {
    Tween {
        property: String,
        from: TweenValue,
        to: TweenValue,
        duration: f32,
        #[serde(default)]
        easing: Option<Easing>,
    },
    Wait {
        seconds: f32,
    },
    WaitAll,
}

impl TimelineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| TweenError::Config(e.to_string()))
    }

    /// Property names in first-use order
    pub fn properties(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for step in &self.steps {
            if let StepConfig::Tween { property, .. } = step {
                if !names.contains(&property.as_str()) {
                    names.push(property);
                }
            }
        }
        names
    }

    /// Resolve the steps into a timeline writing into `store`.
    ///
    /// Each property is declared in the store with the start value of its
    /// first tween so it has a value before playback.
    pub fn builder(&self, store: &PropertyStore) -> Result<TimelineBuilder> {
        let mut builder = TimelineBuilder::new().with_default_easing(self.easing);

        for (index, step) in self.steps.iter().enumerate() {
            builder = match step {
                StepConfig::Tween {
                    property,
                    from,
                    to,
                    duration,
                    easing,
                } => {
                    if property.is_empty() {
                        return Err(TweenError::Config(format!(
                            "step {} has an empty property name",
                            index
                        )));
                    }
                    let (from, to) = coerce_endpoints(*from, *to);
                    store.declare(property, from);
                    builder
                        .tween_value(
                            store.setter(property),
                            from,
                            to,
                            *duration,
                            easing.unwrap_or(self.easing),
                        )?
                        .label(property.as_str())
                }
                StepConfig::Wait { seconds } => builder.wait(*seconds)?,
                StepConfig::WaitAll => builder.wait_all_finished(),
            };
        }

        tracing::debug!(
            name = self.name.as_deref().unwrap_or("<unnamed>"),
            steps = self.steps.len(),
            "resolved timeline config"
        );
        Ok(builder)
    }

    pub fn build(&self, store: &PropertyStore) -> Result<Timeline> {
        Ok(self.builder(store)?.build())
    }
}

/// An integer written next to a float (`from = 0`, `to = 1.5`) is meant as
/// a scalar tween, not a kind mismatch.
fn coerce_endpoints(from: TweenValue, to: TweenValue) -> (TweenValue, TweenValue) {
    match (from, to) {
        (TweenValue::Discrete(a), TweenValue::Scalar(b)) => {
            (TweenValue::Scalar(a as f32), TweenValue::Scalar(b))
        }
        (TweenValue::Scalar(a), TweenValue::Discrete(b)) => {
            (TweenValue::Scalar(a), TweenValue::Scalar(b as f32))
        }
        other => other,
    }
}

/// Named property values shared between setters and readers
///
/// Cloning yields another handle to the same map. Entries keep their
/// declaration order.
#[derive(Clone, Debug, Default)]
pub struct PropertyStore {
    values: Rc<RefCell<IndexMap<String, TweenValue>>>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `name` with `initial` unless it already exists.
    pub fn declare(&self, name: &str, initial: TweenValue) {
        self.values
            .borrow_mut()
            .entry(name.to_owned())
            .or_insert(initial);
    }

    pub fn set(&self, name: &str, value: TweenValue) {
        self.values.borrow_mut().insert(name.to_owned(), value);
    }

    pub fn get(&self, name: &str) -> Option<TweenValue> {
        self.values.borrow().get(name).copied()
    }

    /// A setter writing into this store under `name`
    pub fn setter(&self, name: &str) -> Setter {
        let store = self.clone();
        let name = name.to_owned();
        Box::new(move |value: &TweenValue| store.set(&name, *value))
    }

    pub fn snapshot(&self) -> IndexMap<String, TweenValue> {
        self.values.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

/// Settings for the level-up notification preset
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Typewriter speed of the label reveal
    pub letters_per_second: f32,
    /// Hold time after the reveal before fading
    pub fade_delay: f32,
    pub fade_duration: f32,
    pub fade_easing: Easing,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            letters_per_second: 12.5,
            fade_delay: 3.0,
            fade_duration: 2.75,
            fade_easing: Easing::Linear,
        }
    }
}

impl NotificationSettings {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let settings: Self =
            toml::from_str(source).map_err(|e| TweenError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.letters_per_second.is_finite() && self.letters_per_second > 0.0) {
            return Err(TweenError::Config(format!(
                "letters_per_second must be positive, got {}",
                self.letters_per_second
            )));
        }
        if !(self.fade_delay.is_finite() && self.fade_delay >= 0.0) {
            return Err(TweenError::InvalidWait(self.fade_delay));
        }
        if !(self.fade_duration.is_finite() && self.fade_duration > 0.0) {
            return Err(TweenError::InvalidDuration(self.fade_duration));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FADE_AND_COUNT: &str = r#"
name = "fade-and-count"
easing = "ease-out"

[[step]]
kind = "tween"
property = "alpha"
from = 0.0
to = 1.0
duration = 0.5

[[step]]
kind = "tween"
property = "offset"
from = [0.0, 20.0]
to = [0.0, 0.0]
duration = 1.0
easing = "linear"

[[step]]
kind = "wait-all"

[[step]]
kind = "wait"
seconds = 0.25

[[step]]
kind = "tween"
property = "letters"
from = 0
to = 12
duration = 1.0
"#;

    #[test]
    fn test_parse_steps() {
        let config = TimelineConfig::from_toml_str(FADE_AND_COUNT).unwrap();
        assert_eq!(config.name.as_deref(), Some("fade-and-count"));
        assert_eq!(config.easing, Easing::EaseOut);
        assert_eq!(config.steps.len(), 5);
        assert_eq!(config.steps[2], StepConfig::WaitAll);
        assert_eq!(config.steps[3], StepConfig::Wait { seconds: 0.25 });
        assert_eq!(config.properties(), vec!["alpha", "offset", "letters"]);
    }

    #[test]
    fn test_build_schedule_and_store() {
        let config = TimelineConfig::from_toml_str(FADE_AND_COUNT).unwrap();
        let store = PropertyStore::new();
        let mut timeline = config.build(&store).unwrap();

        let schedule = timeline.schedule();
        assert_eq!(schedule[0].delay, 0.0);
        assert_eq!(schedule[1].delay, 0.0);
        assert_eq!(schedule[2].delay, 1.25);
        assert_eq!(schedule[2].label.as_deref(), Some("letters"));
        assert_eq!(timeline.total_duration(), 2.25);

        // Declared before playback, in first-use order
        let names: Vec<String> = store.snapshot().keys().cloned().collect();
        assert_eq!(names, vec!["alpha", "offset", "letters"]);
        assert_eq!(store.get("letters"), Some(TweenValue::Discrete(0)));

        timeline.seek_to(10.0);
        assert_eq!(store.get("alpha"), Some(TweenValue::Scalar(1.0)));
        assert_eq!(store.get("offset"), Some(TweenValue::Vec2([0.0, 0.0])));
        assert_eq!(store.get("letters"), Some(TweenValue::Discrete(12)));
    }

    #[test]
    fn test_mixed_int_and_float_coerce_to_scalar() {
        let config = TimelineConfig::from_toml_str(
            "[[step]]\nkind = \"tween\"\nproperty = \"x\"\nfrom = 0\nto = 2.5\nduration = 1.0\n",
        )
        .unwrap();
        let store = PropertyStore::new();
        let mut timeline = config.build(&store).unwrap();
        timeline.seek_to(0.5);
        assert_eq!(store.get("x"), Some(TweenValue::Scalar(1.25)));
    }

    #[test]
    fn test_full_range_discrete_tween_plays() {
        let source = format!(
            "[[step]]\nkind = \"tween\"\nproperty = \"n\"\nfrom = {}\nto = {}\nduration = 1.0\n",
            i64::MIN,
            i64::MAX
        );
        let config = TimelineConfig::from_toml_str(&source).unwrap();
        let store = PropertyStore::new();
        let mut timeline = config.build(&store).unwrap();

        timeline.seek_to(0.5);
        assert!(matches!(store.get("n"), Some(TweenValue::Discrete(_))));
        timeline.update(1.0);
        assert_eq!(store.get("n"), Some(TweenValue::Discrete(i64::MAX)));
    }

    #[test]
    fn test_kind_mismatch_is_reported() {
        let config = TimelineConfig::from_toml_str(
            "[[step]]\nkind = \"tween\"\nproperty = \"x\"\nfrom = 0.0\nto = [1.0, 1.0]\nduration = 1.0\n",
        )
        .unwrap();
        let err = config.build(&PropertyStore::new()).unwrap_err();
        assert!(matches!(err, TweenError::KindMismatch { .. }));
    }

    #[test]
    fn test_unknown_step_kind_is_config_error() {
        let err = TimelineConfig::from_toml_str("[[step]]\nkind = \"jump\"\n").unwrap_err();
        assert!(matches!(err, TweenError::Config(_)));
    }

    #[test]
    fn test_negative_wait_is_rejected() {
        let config =
            TimelineConfig::from_toml_str("[[step]]\nkind = \"wait\"\nseconds = -1.0\n").unwrap();
        let err = config.build(&PropertyStore::new()).unwrap_err();
        assert_eq!(err, TweenError::InvalidWait(-1.0));
    }

    #[test]
    fn test_notification_settings_defaults() {
        let settings = NotificationSettings::from_toml_str("fade_delay = 1.0").unwrap();
        assert_eq!(settings.letters_per_second, 12.5);
        assert_eq!(settings.fade_delay, 1.0);
        assert_eq!(settings.fade_duration, 2.75);

        let err = NotificationSettings::from_toml_str("letters_per_second = 0.0").unwrap_err();
        assert!(matches!(err, TweenError::Config(_)));
    }
}
