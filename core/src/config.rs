//! Immutable tuning values handed to the decoder, the world and every system.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{RealPosition, RealRect, SpriteSize};

const DEFAULT_BLOCK_SIZE: i32 = 30;
const MAX_BLOCK_SIZE: i32 = 1024;
const MAX_GRID_SIDE: u32 = 1024;

/// Tuning values that define distances, speeds and durations of a game.
///
/// Every field falls back to its default when omitted from a configuration
/// file, so partial TOML documents only override what they mention.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Real-space units spanned by one level pixel.
    pub block_size: i32,
    /// Number of pixel columns in a level image.
    pub grid_columns: u32,
    /// Number of pixel rows in a level image.
    pub grid_rows: u32,
    /// Screen height of a rendered wall block.
    pub wall_height: i32,
    /// Vertical compression applied when projecting real space onto the screen.
    pub foreshortening: f32,
    /// Real-space units the player travels per tick along one axis.
    pub player_speed: i32,
    /// Path entries an enemy advances per tick.
    pub enemy_speed: i32,
    /// Divisor applied to both axes when the player moves diagonally.
    pub diagonal_divisor: f32,
    /// Simulation ticks per second.
    pub framerate: u32,
    /// Seconds of invulnerability granted by consuming a mask.
    pub protect_duration_secs: f32,
    /// Seconds the dying animation runs before the player is dead.
    pub dying_duration_secs: f32,
    /// Ticks between two animation frames.
    pub animation_refresh: u32,
    /// Screen size of the player sprite.
    pub player_sprite: SpriteSize,
    /// Screen size of an enemy sprite.
    pub enemy_sprite: SpriteSize,
    /// Horizontal shift from the player's real rect to its sprite.
    pub player_draw_offset: i32,
    /// Horizontal shift from an enemy's real rect to its sprite.
    pub enemy_draw_offset: i32,
    /// Number of levels that make up a full game.
    pub level_count: u32,
}

impl GameConfig {
    /// Builds the default configuration scaled to the provided block size.
    ///
    /// Sprite sizes, wall height and draw offsets keep their ratios to the
    /// block size.
    #[must_use]
    pub fn for_block_size(block_size: i32) -> Self {
        let scaled = |factor: f32| (factor * block_size as f32).round_ties_even() as i32;
        Self {
            block_size,
            grid_columns: 32,
            grid_rows: 31,
            wall_height: scaled(2.7),
            foreshortening: 0.7,
            player_speed: 5,
            enemy_speed: 7,
            diagonal_divisor: 1.4,
            framerate: 30,
            protect_duration_secs: 2.0,
            dying_duration_secs: 2.0,
            animation_refresh: 3,
            player_sprite: SpriteSize::new(2 * block_size, scaled(2.2)),
            enemy_sprite: SpriteSize::new(scaled(1.5), scaled(2.4)),
            player_draw_offset: scaled(0.5),
            enemy_draw_offset: scaled(0.25),
            level_count: 10,
        }
    }

    /// Checks the invariants the movement and decoding code relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_BLOCK_SIZE).contains(&self.block_size) {
            return Err(ConfigError::BlockSize {
                block_size: self.block_size,
            });
        }
        if self.grid_columns == 0 || self.grid_rows == 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.grid_columns,
                rows: self.grid_rows,
            });
        }
        if self.grid_columns > MAX_GRID_SIDE || self.grid_rows > MAX_GRID_SIDE {
            return Err(ConfigError::OversizedGrid {
                columns: self.grid_columns,
                rows: self.grid_rows,
            });
        }
        if self.player_speed <= 0 || self.player_speed >= self.block_size {
            return Err(ConfigError::PlayerSpeed {
                speed: self.player_speed,
                block_size: self.block_size,
            });
        }
        if self.enemy_speed <= 0 || self.enemy_speed > self.block_size {
            return Err(ConfigError::EnemySpeed {
                speed: self.enemy_speed,
                block_size: self.block_size,
            });
        }
        if !(self.foreshortening > 0.0 && self.foreshortening <= 1.0) {
            return Err(ConfigError::Foreshortening {
                factor: self.foreshortening,
            });
        }
        if !(self.diagonal_divisor >= 1.0) {
            return Err(ConfigError::DiagonalDivisor {
                divisor: self.diagonal_divisor,
            });
        }
        Ok(())
    }

    /// Real-space rectangle covering the whole level.
    #[must_use]
    pub fn real_bounds(&self) -> RealRect {
        RealRect::new(
            RealPosition::new(0, 0),
            self.grid_columns as i32 * self.block_size,
            self.grid_rows as i32 * self.block_size,
        )
    }

    /// Screen size of a wall or exit block.
    #[must_use]
    pub const fn block_sprite(&self) -> SpriteSize {
        SpriteSize::new(self.block_size, self.wall_height)
    }

    /// Number of ticks a consumed mask protects the player.
    #[must_use]
    pub fn protect_ticks(&self) -> u32 {
        seconds_to_ticks(self.protect_duration_secs, self.framerate)
    }

    /// Number of ticks the dying animation runs.
    #[must_use]
    pub fn dying_ticks(&self) -> u32 {
        seconds_to_ticks(self.dying_duration_secs, self.framerate)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::for_block_size(DEFAULT_BLOCK_SIZE)
    }
}

fn seconds_to_ticks(seconds: f32, framerate: u32) -> u32 {
    (seconds * framerate as f32).round().max(0.0) as u32
}

/// Reasons a [`GameConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Block size must be positive and at most 1024.
    #[error("block size must lie in 1..={max} (received {block_size})", max = MAX_BLOCK_SIZE)]
    BlockSize {
        /// Rejected block size.
        block_size: i32,
    },
    /// Level images need at least one pixel.
    #[error("level grid must not be empty (received {columns}x{rows})")]
    EmptyGrid {
        /// Rejected column count.
        columns: u32,
        /// Rejected row count.
        rows: u32,
    },
    /// Level images may be at most 1024 pixels on a side.
    #[error("grid sides must be at most {max} (received {columns}x{rows})", max = MAX_GRID_SIDE)]
    OversizedGrid {
        /// Rejected column count.
        columns: u32,
        /// Rejected row count.
        rows: u32,
    },
    /// The player must move, but never further than one block per tick.
    #[error("player speed must lie in 1..{block_size} (received {speed})")]
    PlayerSpeed {
        /// Rejected speed.
        speed: i32,
        /// Configured block size.
        block_size: i32,
    },
    /// Enemies must advance, but never further than one block per tick.
    #[error("enemy speed must lie in 1..={block_size} (received {speed})")]
    EnemySpeed {
        /// Rejected speed.
        speed: i32,
        /// Configured block size.
        block_size: i32,
    },
    /// Foreshortening must compress, never stretch or flip, the vertical axis.
    #[error("foreshortening must lie in (0, 1] (received {factor})")]
    Foreshortening {
        /// Rejected factor.
        factor: f32,
    },
    /// Diagonal movement must not be faster than axis-aligned movement.
    #[error("diagonal divisor must be at least 1 (received {divisor})")]
    DiagonalDivisor {
        /// Rejected divisor.
        divisor: f32,
    },
}
