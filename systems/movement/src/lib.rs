#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system for the player and patrolling enemies.
//!
//! Every tick the player is moved first, then each enemy in identifier
//! order. The system only reads world snapshots and answers with
//! [`Command::MovePlayer`] and [`Command::MoveEnemy`].

mod patrol;
mod player;

use sneaky_doctor_core::{Command, Event, Facing, GameConfig, MoveIntent, RealRect};
use sneaky_doctor_world::query::{EnemyView, PlayerSnapshot};
use tracing::debug;

pub use patrol::{advance_cursor, facing_between};
pub use player::{resolve_wall_collisions, CollisionOutcome, PlayerController, PlayerStep};

/// Pure system that reacts to world ticks and emits movement commands.
#[derive(Clone, Copy, Debug)]
pub struct Movement {
    player: PlayerController,
}

impl Movement {
    /// Creates the movement system for the provided configuration.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            player: PlayerController::new(config),
        }
    }

    /// Consumes world events and immutable views to emit movement commands.
    ///
    /// Nothing happens unless `events` contains a tick. A dying player is not
    /// moved and keeps facing the same way.
    pub fn handle(
        &mut self,
        events: &[Event],
        intent: MoveIntent,
        player: &PlayerSnapshot,
        enemies: &EnemyView<'_>,
        walls: &[RealRect],
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        if !player.is_dying() {
            let step = self.player.step(player.rect, intent, walls);
            let facing = match intent.horizontal.signum() {
                1 => Facing::Right,
                -1 => Facing::Left,
                _ => player.facing,
            };
            if step.collision != CollisionOutcome::Clear {
                debug!(outcome = ?step.collision, rect = ?step.rect, "player_wall_collision");
            }
            if step.rect != player.rect
                || step.velocity != player.velocity
                || facing != player.facing
            {
                out.push(Command::MovePlayer {
                    rect: step.rect,
                    velocity: step.velocity,
                    facing,
                });
            }
        }

        for enemy in enemies.iter() {
            let cursor = advance_cursor(enemy.cursor, enemy.path);
            let (Some(from), Some(to)) = (
                enemy.path.get(enemy.cursor.index()),
                enemy.path.get(cursor.index()),
            ) else {
                continue;
            };
            out.push(Command::MoveEnemy {
                enemy: enemy.id,
                cursor,
                position: to,
                facing: facing_between(from, to),
            });
        }
    }
}
