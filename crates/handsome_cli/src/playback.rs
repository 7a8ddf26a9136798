//! Fixed-rate timeline playback

use anyhow::{Context, Result};
use handsome_animation::{
    LevelUpNotification, NotificationSettings, PropertyStore, Timeline, TimelineConfig,
    TweenValue,
};
use std::cell::Cell;
use std::rc::Rc;

/// Upper bound on frames so a misconfigured timeline cannot spin forever
const MAX_FRAMES: usize = 1_000_000;

fn frame_delta(fps: u32) -> Result<f32> {
    if fps == 0 {
        anyhow::bail!("--fps must be at least 1");
    }
    Ok(1.0 / fps as f32)
}

/// Drive `timeline` at `dt` from an initial seek to zero, calling `frame`
/// after each evaluation. Returns the number of frames emitted.
fn drive(
    timeline: &mut Timeline,
    dt: f32,
    mut frame: impl FnMut(usize, f32) -> Result<()>,
) -> Result<usize> {
    timeline.seek_to(0.0);
    frame(0, 0.0)?;

    let mut index = 0;
    while !timeline.is_finished() {
        index += 1;
        if index > MAX_FRAMES {
            anyhow::bail!("timeline did not finish within {} frames", MAX_FRAMES);
        }
        timeline.update(dt);
        frame(index, timeline.elapsed())?;
    }

    tracing::info!(
        frames = index + 1,
        elapsed = timeline.elapsed(),
        "playback finished"
    );
    Ok(index + 1)
}

pub fn run(config: &TimelineConfig, fps: u32, json: bool) -> Result<()> {
    let dt = frame_delta(fps)?;
    let store = PropertyStore::new();
    let mut timeline = config
        .build(&store)
        .context("Failed to build timeline")?;

    if !json {
        let names: Vec<&str> = config.properties();
        println!("{:>6} {:>9}  {}", "frame", "time", names.join("  "));
    }

    drive(&mut timeline, dt, |index, time| {
        if json {
            let line = serde_json::json!({
                "frame": index,
                "time": time,
                "values": store.snapshot(),
            });
            println!("{}", serde_json::to_string(&line)?);
        } else {
            println!("{}", format_row(index, time, &store));
        }
        Ok(())
    })?;

    Ok(())
}

fn format_row(index: usize, time: f32, store: &PropertyStore) -> String {
    let values: Vec<String> = store
        .snapshot()
        .values()
        .map(TweenValue::to_string)
        .collect();
    format!("{:>6} {:>9.4}  {}", index, time, values.join("  "))
}

pub fn inspect(config: &TimelineConfig) -> Result<()> {
    let store = PropertyStore::new();
    let timeline = config
        .build(&store)
        .context("Failed to build timeline")?;

    if let Some(name) = &config.name {
        println!("timeline: {}", name);
    }
    println!("{:<16} {:>8} {:>8} {:>8}", "property", "delay", "duration", "ends");
    for entry in timeline.schedule() {
        println!(
            "{:<16} {:>8.3} {:>8.3} {:>8.3}",
            entry.label.as_deref().unwrap_or("-"),
            entry.delay,
            entry.duration,
            entry.finishes_at
        );
    }
    println!("total duration: {:.3}s", timeline.total_duration());
    Ok(())
}

pub fn level_up(text: &str, settings: NotificationSettings, fps: u32) -> Result<()> {
    let dt = frame_delta(fps)?;
    let banner = LevelUpNotification::new(text, settings);

    let letters = Rc::new(Cell::new(0_i64));
    let ghost = Rc::new(Cell::new(0.0_f32));
    let alpha = Rc::new(Cell::new(1.0_f32));
    let (l, g, a) = (letters.clone(), ghost.clone(), alpha.clone());

    let mut timeline = banner
        .timeline(move |n| l.set(n), move |v| g.set(v), move |v| a.set(v))
        .context("Failed to build level-up timeline")?
        .on_finished(|| tracing::info!("banner closed"))
        .build();

    tracing::info!(
        letters = banner.letter_count(),
        steps = banner.reveal_steps(),
        total = banner.total_duration(),
        "showing level-up banner"
    );

    drive(&mut timeline, dt, |index, time| {
        let visible = letters.get().max(0) as usize;
        println!(
            "{}",
            format_banner_row(&banner, index, time, visible, ghost.get(), alpha.get())
        );
        Ok(())
    })?;

    Ok(())
}

/// Visible text, then the fading ghost glyph in brackets while one is typed
fn format_banner_row(
    banner: &LevelUpNotification,
    index: usize,
    time: f32,
    visible: usize,
    ghost: f32,
    alpha: f32,
) -> String {
    let shown: String = banner.text().chars().take(visible).collect();
    let pending = match banner.ghost_glyph(visible) {
        Some(glyph) if ghost > 0.0 => format!("[{}]", glyph),
        _ => String::new(),
    };
    format!(
        "{:>6} {:>9.4}  {:.3}  {:.3}  {}{}",
        index, time, alpha, ghost, shown, pending
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_fps_is_rejected() {
        assert!(frame_delta(0).is_err());
        assert_eq!(frame_delta(4).unwrap(), 0.25);
    }

    #[test]
    fn test_drive_emits_initial_frame_and_finishes() {
        let mut timeline = Timeline::builder()
            .tween_property(|_: f32| {}, 0.0, 1.0, 1.0)
            .unwrap()
            .build();

        let mut times = Vec::new();
        let frames = drive(&mut timeline, 0.25, |_, t| {
            times.push(t);
            Ok(())
        })
        .unwrap();

        // 0.0 from the seek, then 0.25 .. 1.25 (strictly past the end)
        assert_eq!(frames, 6);
        assert_eq!(times.first(), Some(&0.0));
        assert_eq!(times.last(), Some(&1.25));
    }

    #[test]
    fn test_format_row_lists_values_in_order() {
        let store = PropertyStore::new();
        store.set("b", TweenValue::Discrete(3));
        store.set("a", TweenValue::Scalar(0.5));
        assert_eq!(format_row(2, 0.5, &store), "     2    0.5000  3  0.500");
    }

    #[test]
    fn test_banner_row_shows_ghost_glyph_while_typing() {
        let banner = LevelUpNotification::new("AB CD", NotificationSettings::default());
        assert_eq!(
            format_banner_row(&banner, 3, 0.12, 3, 0.5, 1.0),
            "     3    0.1200  1.000  0.500  AB [C]"
        );
        assert_eq!(
            format_banner_row(&banner, 9, 4.0, 5, 0.0, 0.25),
            "     9    4.0000  0.250  0.000  AB CD"
        );
    }
}
