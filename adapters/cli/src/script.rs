//! Scripted key input for headless runs.
//!
//! A script is a comma separated list of `<keys>*<ticks>` segments such as
//! `wd*10,*5`: hold up and right for ten ticks, then idle for five. Keys use
//! the `wasd` layout and are listed in press order. A segment without `*`
//! lasts one tick.

use anyhow::{bail, Context, Result};
use sneaky_doctor_core::Key;

/// Keys held for a number of consecutive ticks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ScriptSegment {
    pub(crate) keys: Vec<Key>,
    pub(crate) ticks: u64,
}

/// Parsed key script, replayed one tick at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct KeyScript {
    segments: Vec<ScriptSegment>,
}

impl KeyScript {
    pub(crate) fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        for raw in source.split(',') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let (keys, ticks) = match raw.split_once('*') {
                Some((keys, ticks)) => {
                    let ticks = ticks
                        .trim()
                        .parse::<u64>()
                        .with_context(|| format!("invalid tick count in segment `{raw}`"))?;
                    (keys.trim(), ticks)
                }
                None => (raw, 1),
            };
            let keys = keys
                .chars()
                .map(|letter| key_for(letter).with_context(|| format!("in segment `{raw}`")))
                .collect::<Result<Vec<Key>>>()?;
            segments.push(ScriptSegment { keys, ticks });
        }
        Ok(Self { segments })
    }

    /// Number of ticks the script covers.
    pub(crate) fn total_ticks(&self) -> u64 {
        self.segments.iter().map(|segment| segment.ticks).sum()
    }

    /// Keys held at `tick`, counted from zero. Past the end nothing is held.
    pub(crate) fn keys_at(&self, tick: u64) -> &[Key] {
        let mut remaining = tick;
        for segment in &self.segments {
            if remaining < segment.ticks {
                return &segment.keys;
            }
            remaining -= segment.ticks;
        }
        &[]
    }
}

fn key_for(letter: char) -> Result<Key> {
    Ok(match letter.to_ascii_lowercase() {
        'w' => Key::Up,
        'a' => Key::Left,
        's' => Key::Down,
        'd' => Key::Right,
        other => bail!("unknown key `{other}`, expected one of w, a, s, d"),
    })
}
