#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cross-level game session.
//!
//! The session owns the [`GameStats`] record of one game and decides what
//! happens once a level attempt ends: dying restarts the level with the mask
//! count it was entered with, reaching the exit keeps the masks and moves on
//! to the next level until the last one is cleared.

use sneaky_doctor_core::{Event, GameConfig, GameStats};
use tracing::info;

/// What the driver has to do after a batch of events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Keep playing the current level.
    Continue,
    /// Rebuild the current level from scratch.
    Restart {
        /// Level to rebuild.
        level: u32,
    },
    /// Build the next level.
    Advance {
        /// Level to build.
        level: u32,
    },
    /// The last level was cleared.
    Completed,
}

/// Stats bookkeeping across level attempts.
#[derive(Clone, Debug)]
pub struct Session {
    stats: GameStats,
    level_count: u32,
    entry_masks: u32,
    completed: bool,
}

impl Session {
    /// Starts a session from previously saved or fresh stats.
    #[must_use]
    pub fn new(config: &GameConfig, stats: GameStats) -> Self {
        Self {
            entry_masks: stats.mask_count,
            stats,
            level_count: config.level_count,
            completed: false,
        }
    }

    /// Current stats, including masks picked up in the running attempt.
    #[must_use]
    pub const fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Level the session is currently on.
    #[must_use]
    pub const fn current_level(&self) -> u32 {
        self.stats.current_level
    }

    /// Reports whether every level has been cleared.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Consumes world events and reports the resulting transition.
    ///
    /// The first level-ending event in `events` decides the transition;
    /// anything after it belongs to a world that is about to be discarded.
    pub fn handle(&mut self, events: &[Event]) -> Transition {
        if self.completed {
            return Transition::Completed;
        }

        for event in events {
            match event {
                Event::MaskCollected { mask_count, .. }
                | Event::PlayerShielded { mask_count, .. } => {
                    self.stats.mask_count = *mask_count;
                }
                Event::PlayerDied => {
                    self.stats.deaths += 1;
                    self.stats.mask_count = self.entry_masks;
                    info!(
                        level = self.stats.current_level,
                        deaths = self.stats.deaths,
                        "level_restart"
                    );
                    return Transition::Restart {
                        level: self.stats.current_level,
                    };
                }
                Event::ExitReached => {
                    self.entry_masks = self.stats.mask_count;
                    if self.stats.current_level >= self.level_count {
                        self.completed = true;
                        info!(
                            level = self.stats.current_level,
                            deaths = self.stats.deaths,
                            "game_completed"
                        );
                        return Transition::Completed;
                    }
                    self.stats.current_level += 1;
                    info!(
                        level = self.stats.current_level,
                        mask_count = self.stats.mask_count,
                        "level_advance"
                    );
                    return Transition::Advance {
                        level: self.stats.current_level,
                    };
                }
                _ => {}
            }
        }
        Transition::Continue
    }
}
