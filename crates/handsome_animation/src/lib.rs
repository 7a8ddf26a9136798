//! Handsome Tween Engine
//!
//! Property tweeners composed into barrier-synchronized timelines, driven
//! by an external frame clock.
//!
//! # Features
//!
//! - **Tweeners**: Interpolate one property between two values with easing
//! - **Timelines**: Parallel tweens, explicit waits and "wait for all" barriers
//! - **Scheduler**: Tick many timelines from one frame loop, plus delayed calls
//! - **Config**: Describe timelines in TOML and play them into a property store
//! - **Presets**: Fades, typewriter reveals, and the level-up banner

pub mod config;
pub mod easing;
pub mod error;
pub mod presets;
pub mod scheduler;
pub mod timeline;
pub mod tweener;
pub mod value;

pub use config::{NotificationSettings, PropertyStore, StepConfig, TimelineConfig};
pub use easing::Easing;
pub use error::{Result, TweenError};
pub use presets::{LevelUpNotification, TweenPreset};
pub use scheduler::{TimelineId, TweenScheduler};
pub use timeline::{PlaybackState, ScheduleEntry, Timeline, TimelineBuilder};
pub use tweener::{PropertyTweener, Setter};
pub use value::{Rgba, TweenValue, Tweenable, ValueKind};
