#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Collision arbiter deciding what happens when the player touches things.
//!
//! Runs after movement each tick and compares real rectangles only: masks
//! the player overlaps are collected, enemy contact either spends a mask on
//! protection or kills the player, and standing fully inside the exit wins
//! the level.

use sneaky_doctor_core::{Command, Event, RealRect};
use sneaky_doctor_world::query::{EnemyView, MaskView, PlayerSnapshot};
use tracing::debug;

/// Read-only inputs the arbiter needs for one decision.
#[derive(Clone, Copy, Debug)]
pub struct ArbiterView<'a, 'w> {
    /// Player state after movement.
    pub player: &'a PlayerSnapshot,
    /// Enemy states after movement.
    pub enemies: &'a EnemyView<'w>,
    /// Masks still lying in the level.
    pub masks: &'a MaskView,
    /// Area the player has to enter to win.
    pub exit: RealRect,
    /// Masks the player holds before this tick's pickups.
    pub mask_count: u32,
}

/// Pure system that turns contacts into world commands.
#[derive(Debug, Default)]
pub struct Arbiter;

impl Arbiter {
    /// Consumes world events and the post-movement view to emit commands.
    ///
    /// Decisions are made once per tick and never while the player is dying.
    /// A lethal enemy contact takes precedence over reaching the exit in the
    /// same tick.
    pub fn handle(&mut self, events: &[Event], view: ArbiterView<'_, '_>, out: &mut Vec<Command>) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        let player = view.player;
        if player.is_dying() {
            return;
        }

        let mut available = view.mask_count;
        for mask in view
            .masks
            .iter()
            .filter(|mask| mask.rect.collides(&player.rect))
        {
            available += 1;
            out.push(Command::CollectMask { mask: mask.id });
        }

        let touching = view
            .enemies
            .iter()
            .find(|enemy| enemy.rect.collides(&player.rect));
        if let Some(enemy) = touching {
            if player.is_protected() {
                debug!(enemy = enemy.id.get(), "enemy_contact_while_protected");
            } else if available > 0 {
                debug!(enemy = enemy.id.get(), available, "enemy_contact_shielded");
                out.push(Command::ShieldPlayer);
            } else {
                debug!(enemy = enemy.id.get(), "enemy_contact_lethal");
                out.push(Command::KillPlayer);
                return;
            }
        }

        if view.exit.contains(&player.rect) {
            out.push(Command::ReachExit);
        }
    }
}
