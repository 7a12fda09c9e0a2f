#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Sneaky Doctor engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems observe [`Event`] values and
//! immutable world queries, and respond exclusively with [`Command`] batches
//! that the world executes through its `apply` entry point. Geometry, the
//! depth projection and the immutable [`GameConfig`] live here so every crate
//! agrees on units.

mod config;
mod geometry;
mod projection;

use serde::{Deserialize, Serialize};

pub use config::{ConfigError, GameConfig};
pub use geometry::{GridCell, Layer, RealPosition, RealRect, ScreenRect, SpriteSize};
pub use projection::{DepthProjector, Projection};

/// Direction an entity faces, used to pick its animation set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Facing towards decreasing x.
    Left,
    /// Facing towards increasing x.
    #[default]
    Right,
    /// Facing the viewer, i.e. towards increasing y.
    Front,
    /// Facing away from the viewer, i.e. towards decreasing y.
    Back,
}

/// Movement keys an input adapter reports as held down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Move towards the top of the level.
    Up,
    /// Move towards the left of the level.
    Left,
    /// Move towards the bottom of the level.
    Down,
    /// Move towards the right of the level.
    Right,
}

impl Key {
    const fn horizontal_sign(&self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
            Self::Up | Self::Down => 0,
        }
    }

    const fn vertical_sign(&self) -> i32 {
        match self {
            Self::Up => -1,
            Self::Down => 1,
            Self::Left | Self::Right => 0,
        }
    }
}

/// Signed movement request per axis, each component in `-1..=1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MoveIntent {
    /// Horizontal sign, negative for left.
    pub horizontal: i32,
    /// Vertical sign, negative for up.
    pub vertical: i32,
}

impl MoveIntent {
    /// Resolves the held keys into a movement request.
    ///
    /// Keys are listed in press order. The most recently pressed key wins on
    /// each axis, so holding left and then pressing right moves right.
    #[must_use]
    pub fn from_pressed_keys(keys: &[Key]) -> Self {
        let latest = |sign: fn(&Key) -> i32| {
            keys.iter()
                .rev()
                .map(sign)
                .find(|value| *value != 0)
                .unwrap_or(0)
        };
        Self {
            horizontal: latest(Key::horizontal_sign),
            vertical: latest(Key::vertical_sign),
        }
    }

    /// Reports whether both axes are requested at once.
    #[must_use]
    pub const fn is_diagonal(&self) -> bool {
        self.horizontal != 0 && self.vertical != 0
    }
}

/// Per-tick displacement of the player in real units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Velocity {
    /// Horizontal displacement.
    pub dx: i32,
    /// Vertical displacement.
    pub dy: i32,
}

impl Velocity {
    /// Creates a velocity from its components.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Reports whether the velocity moves the player at all.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Unique identifier assigned to an enemy, in path-file order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a collectable mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaskId(u32);

impl MaskId {
    /// Creates a new mask identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Position of an enemy along its patrol path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathCursor {
    index: usize,
    step: i32,
}

impl PathCursor {
    /// Creates a cursor at `index` that advances by `step` entries per tick.
    #[must_use]
    pub const fn new(index: usize, step: i32) -> Self {
        Self { index, step }
    }

    /// Current index into the patrol path.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Signed number of entries advanced per tick.
    #[must_use]
    pub const fn step(&self) -> i32 {
        self.step
    }
}

/// Dense patrol route traversed back and forth by one enemy.
///
/// A path always holds at least two positions so both ends are distinct
/// reflection points.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PatrolPath {
    positions: Vec<RealPosition>,
}

impl PatrolPath {
    /// Wraps the provided positions, rejecting routes shorter than two entries.
    #[must_use]
    pub fn new(positions: Vec<RealPosition>) -> Option<Self> {
        if positions.len() < 2 {
            return None;
        }
        Some(Self { positions })
    }

    /// Number of positions on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always `false`; present for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Index of the final position.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.positions.len() - 1
    }

    /// Position stored at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<RealPosition> {
        self.positions.get(index).copied()
    }

    /// First index holding `position`.
    #[must_use]
    pub fn index_of(&self, position: RealPosition) -> Option<usize> {
        self.positions.iter().position(|entry| *entry == position)
    }
}

/// Progress record carried across levels of one game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    /// Level currently being played, starting at 1.
    pub current_level: u32,
    /// Masks the player holds.
    pub mask_count: u32,
    /// Number of times the player died.
    pub deaths: u32,
}

impl GameStats {
    /// Stats for a fresh game starting at level one.
    #[must_use]
    pub const fn new_game() -> Self {
        Self {
            current_level: 1,
            mask_count: 0,
            deaths: 0,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one fixed-rate tick.
    Tick,
    /// Relocates the player after movement and wall collision resolution.
    MovePlayer {
        /// Resolved real rectangle of the player.
        rect: RealRect,
        /// Displacement requested for this tick.
        velocity: Velocity,
        /// Horizontal facing after this tick's input.
        facing: Facing,
    },
    /// Relocates an enemy along its patrol path.
    MoveEnemy {
        /// Enemy being moved.
        enemy: EnemyId,
        /// Updated path cursor.
        cursor: PathCursor,
        /// Path position the cursor now points at.
        position: RealPosition,
        /// Facing derived from the displacement.
        facing: Facing,
    },
    /// Removes a mask from the level and credits it to the player.
    CollectMask {
        /// Mask touched by the player.
        mask: MaskId,
    },
    /// Consumes one held mask to protect the player from an enemy hit.
    ShieldPlayer,
    /// Starts the dying sequence.
    KillPlayer,
    /// Marks the level as won.
    ReachExit,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Number of ticks processed so far in this level.
        tick: u64,
    },
    /// Confirms that the player moved.
    PlayerMoved {
        /// Real rectangle before the move.
        from: RealRect,
        /// Real rectangle after the move.
        to: RealRect,
        /// Draw layer after the move.
        layer: Layer,
    },
    /// Announces that the player turned and its sprites are now mirrored.
    PlayerTurned {
        /// New horizontal facing.
        facing: Facing,
    },
    /// Confirms that an enemy advanced along its path.
    EnemyMoved {
        /// Enemy that moved.
        enemy: EnemyId,
        /// Position before the move.
        from: RealPosition,
        /// Position after the move.
        to: RealPosition,
        /// Facing after the move.
        facing: Facing,
    },
    /// Confirms that a mask was picked up.
    MaskCollected {
        /// Mask removed from the level.
        mask: MaskId,
        /// Masks held after the pickup.
        mask_count: u32,
    },
    /// Confirms that a mask was spent on protection.
    PlayerShielded {
        /// Masks held after spending one.
        mask_count: u32,
        /// Ticks of protection granted.
        ticks: u32,
    },
    /// Announces that the player was caught and started dying.
    PlayerDying {
        /// Ticks until the player is dead.
        ticks: u32,
    },
    /// Announces that the dying sequence finished.
    PlayerDied,
    /// Announces that the player stands inside the exit.
    ExitReached,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_recent_key_wins_per_axis() {
        let intent = MoveIntent::from_pressed_keys(&[Key::Left, Key::Up, Key::Right]);
        assert_eq!(
            intent,
            MoveIntent {
                horizontal: 1,
                vertical: -1
            }
        );
        assert!(intent.is_diagonal());
        assert_eq!(MoveIntent::from_pressed_keys(&[]), MoveIntent::default());
    }

    #[test]
    fn later_key_on_one_axis_does_not_hide_the_other_axis() {
        let intent = MoveIntent::from_pressed_keys(&[Key::Right, Key::Down, Key::Left]);
        assert_eq!(
            intent,
            MoveIntent {
                horizontal: -1,
                vertical: 1
            }
        );

        let vertical_only = MoveIntent::from_pressed_keys(&[Key::Up, Key::Down]);
        assert_eq!(
            vertical_only,
            MoveIntent {
                horizontal: 0,
                vertical: 1
            }
        );
    }

    #[test]
    fn patrol_path_requires_two_positions() {
        assert!(PatrolPath::new(vec![RealPosition::new(0, 0)]).is_none());
        let path = PatrolPath::new(vec![RealPosition::new(0, 0), RealPosition::new(1, 0)])
            .expect("two positions");
        assert_eq!(path.last_index(), 1);
        assert_eq!(path.index_of(RealPosition::new(1, 0)), Some(1));
    }

    #[test]
    fn game_stats_serialize_as_camel_case_json() {
        let stats = GameStats {
            current_level: 3,
            mask_count: 2,
            deaths: 1,
        };
        let json = serde_json::to_string(&stats).expect("serialize");
        assert_eq!(json, r#"{"currentLevel":3,"maskCount":2,"deaths":1}"#);
        let restored: GameStats = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, stats);
    }
}
