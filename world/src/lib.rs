#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state management for Sneaky Doctor.
//!
//! A [`World`] is built from decoded [`LevelAssets`] and lives for exactly one
//! attempt at one level. Systems never mutate it directly: they read it
//! through [`query`] and submit [`Command`] values to [`apply`], which reports
//! every observable change as an [`Event`].

mod visual;

use sneaky_doctor_core::{
    Command, DepthProjector, EnemyId, Event, Facing, GameConfig, GameStats, MaskId, PathCursor,
    PatrolPath, Projection, RealRect, SpriteSize, Velocity,
};
use sneaky_doctor_level::LevelAssets;
use tracing::{debug, info};

pub use visual::{AnimationClock, Visual};

const BLINK_PERIOD: u32 = 8;
const BLINK_HIDDEN_FROM: u32 = 5;

/// Enemies animate at half the rate of everything else.
const ENEMY_REFRESH_FACTOR: u32 = 2;

/// Outcome of the current level attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LevelStatus {
    /// The level is still being played.
    #[default]
    Playing,
    /// The player stands inside the exit.
    Won,
    /// The dying sequence finished.
    Lost,
}

/// Real-space footprint of an entity together with its screen placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Drawable {
    real: RealRect,
    sprite: SpriteSize,
    draw_offset: i32,
    projection: Projection,
    visual: Visual,
}

impl Drawable {
    fn new(
        real: RealRect,
        sprite: SpriteSize,
        draw_offset: i32,
        visual: Visual,
        projector: &DepthProjector,
    ) -> Self {
        Self {
            real,
            sprite,
            draw_offset,
            projection: projector.project(real, sprite, draw_offset),
            visual,
        }
    }

    fn relocate(&mut self, real: RealRect, projector: &DepthProjector) {
        self.real = real;
        self.projection = projector.project(real, self.sprite, self.draw_offset);
    }

    /// Collision rectangle in real space.
    #[must_use]
    pub const fn real(&self) -> RealRect {
        self.real
    }

    /// Screen rectangle and draw layer derived from [`Drawable::real`].
    #[must_use]
    pub const fn projection(&self) -> Projection {
        self.projection
    }

    /// Animation state of the entity.
    #[must_use]
    pub const fn visual(&self) -> Visual {
        self.visual
    }
}

/// Exit door of the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Exit {
    rect: RealRect,
    lower: Projection,
    upper: Projection,
}

impl Exit {
    /// Area the player has to enter completely.
    #[must_use]
    pub const fn rect(&self) -> RealRect {
        self.rect
    }

    /// Placement of the door frame part standing on the exit's own row.
    #[must_use]
    pub const fn lower(&self) -> Projection {
        self.lower
    }

    /// Placement of the lintel part, drawn one layer further in front.
    #[must_use]
    pub const fn upper(&self) -> Projection {
        self.upper
    }
}

#[derive(Debug)]
struct Mask {
    id: MaskId,
    drawable: Drawable,
}

#[derive(Debug)]
struct Player {
    drawable: Drawable,
    velocity: Velocity,
    facing: Facing,
    protect_remaining: u32,
    dying_remaining: u32,
}

impl Player {
    const fn is_dying(&self) -> bool {
        self.dying_remaining > 0
    }

    const fn is_visible(&self) -> bool {
        let phase = self.protect_remaining % BLINK_PERIOD;
        phase < BLINK_HIDDEN_FROM
    }
}

#[derive(Debug)]
struct Enemy {
    id: EnemyId,
    drawable: Drawable,
    path: PatrolPath,
    cursor: PathCursor,
    facing: Facing,
}

/// Represents the authoritative state of one level attempt.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    projector: DepthProjector,
    level: u32,
    walls: Vec<Drawable>,
    wall_rects: Vec<RealRect>,
    exit: Exit,
    masks: Vec<Mask>,
    player: Player,
    enemies: Vec<Enemy>,
    mask_count: u32,
    tick_index: u64,
    status: LevelStatus,
}

impl World {
    /// Builds the level described by `assets`, carrying the mask count of
    /// `stats` into it.
    #[must_use]
    pub fn new(config: &GameConfig, assets: LevelAssets, stats: &GameStats) -> Self {
        let projector = DepthProjector::new(config);
        let block = config.block_size;
        let animated = || Visual::Animated(AnimationClock::new(config.animation_refresh));

        let walls: Vec<Drawable> = assets
            .map
            .walls
            .iter()
            .map(|wall| {
                Drawable::new(
                    wall.rect,
                    config.block_sprite(),
                    0,
                    Visual::Static,
                    &projector,
                )
            })
            .collect();
        let wall_rects = walls.iter().map(Drawable::real).collect();

        let exit_projection = projector.project(assets.map.exit.rect, config.block_sprite(), 0);
        let door = assets.map.exit;
        let exit = Exit {
            rect: door.rect,
            lower: exit_projection,
            upper: exit_projection.raised(door.upper_layer.get() - exit_projection.layer.get()),
        };

        let masks = assets
            .map
            .masks
            .iter()
            .zip(0_u32..)
            .map(|(cell, index)| Mask {
                id: MaskId::new(index),
                drawable: Drawable::new(
                    RealRect::square(cell.to_real(block), block),
                    config.block_sprite(),
                    0,
                    animated(),
                    &projector,
                ),
            })
            .collect();

        let player = Player {
            drawable: Drawable::new(
                RealRect::square(assets.map.start.to_real(block), block),
                config.player_sprite,
                config.player_draw_offset,
                animated(),
                &projector,
            ),
            velocity: Velocity::default(),
            facing: Facing::Right,
            protect_remaining: 0,
            dying_remaining: 0,
        };

        let enemies = assets
            .patrols
            .into_iter()
            .zip(0_u32..)
            .map(|(patrol, index)| {
                let start = RealRect::square(patrol.start_position(), block);
                Enemy {
                    id: EnemyId::new(index),
                    drawable: Drawable::new(
                        start,
                        config.enemy_sprite,
                        config.enemy_draw_offset,
                        Visual::Animated(AnimationClock::new(
                            config.animation_refresh * ENEMY_REFRESH_FACTOR,
                        )),
                        &projector,
                    ),
                    cursor: PathCursor::new(patrol.start_index, config.enemy_speed),
                    path: patrol.path,
                    facing: Facing::Right,
                }
            })
            .collect::<Vec<_>>();

        info!(
            level = assets.number,
            enemies = enemies.len(),
            mask_count = stats.mask_count,
            "world_created"
        );

        Self {
            config: config.clone(),
            projector,
            level: assets.number,
            walls,
            wall_rects,
            exit,
            masks,
            player,
            enemies,
            mask_count: stats.mask_count,
            tick_index: 0,
            status: LevelStatus::Playing,
        }
    }

    fn enemy_mut(&mut self, enemy: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|candidate| candidate.id == enemy)
    }

    fn advance_clock(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        self.player.drawable.visual.tick();
        for mask in &mut self.masks {
            mask.drawable.visual.tick();
        }
        for enemy in &mut self.enemies {
            enemy.drawable.visual.tick();
        }

        let player = &mut self.player;
        if player.is_dying() {
            player.dying_remaining -= 1;
            if player.dying_remaining == 0 {
                self.status = LevelStatus::Lost;
                info!(level = self.level, tick = self.tick_index, "player_died");
                out_events.push(Event::PlayerDied);
            }
        } else if player.protect_remaining > 0 {
            player.protect_remaining -= 1;
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the level is won or lost every further command is ignored; the
/// session rebuilds the world instead.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.status != LevelStatus::Playing {
        debug!(status = ?world.status, ?command, "command_ignored_after_level_end");
        return;
    }

    match command {
        Command::Tick => world.advance_clock(out_events),
        Command::MovePlayer {
            rect,
            velocity,
            facing,
        } => {
            let player = &mut world.player;
            if player.is_dying() {
                return;
            }
            player.velocity = velocity;
            if facing != player.facing {
                player.facing = facing;
                out_events.push(Event::PlayerTurned { facing });
            }
            let from = player.drawable.real;
            if rect != from {
                player.drawable.relocate(rect, &world.projector);
                out_events.push(Event::PlayerMoved {
                    from,
                    to: rect,
                    layer: player.drawable.projection.layer,
                });
            }
        }
        Command::MoveEnemy {
            enemy,
            cursor,
            position,
            facing,
        } => {
            let projector = world.projector;
            let Some(target) = world.enemy_mut(enemy) else {
                return;
            };
            let from = target.drawable.real.origin();
            target.cursor = cursor;
            target.facing = facing;
            target
                .drawable
                .relocate(target.drawable.real.moved_to(position), &projector);
            out_events.push(Event::EnemyMoved {
                enemy,
                from,
                to: position,
                facing,
            });
        }
        Command::CollectMask { mask } => {
            let Some(index) = world.masks.iter().position(|candidate| candidate.id == mask) else {
                return;
            };
            let _ = world.masks.remove(index);
            world.mask_count += 1;
            out_events.push(Event::MaskCollected {
                mask,
                mask_count: world.mask_count,
            });
        }
        Command::ShieldPlayer => {
            let player = &mut world.player;
            if world.mask_count == 0 || player.protect_remaining > 0 || player.is_dying() {
                return;
            }
            world.mask_count -= 1;
            let ticks = world.config.protect_ticks();
            player.protect_remaining = ticks;
            out_events.push(Event::PlayerShielded {
                mask_count: world.mask_count,
                ticks,
            });
        }
        Command::KillPlayer => {
            let player = &mut world.player;
            if player.protect_remaining > 0 || player.is_dying() {
                return;
            }
            let ticks = world.config.dying_ticks();
            player.drawable.visual.restart();
            player.velocity = Velocity::default();
            out_events.push(Event::PlayerDying { ticks });
            if ticks == 0 {
                world.status = LevelStatus::Lost;
                out_events.push(Event::PlayerDied);
            } else {
                player.dying_remaining = ticks;
            }
        }
        Command::ReachExit => {
            world.status = LevelStatus::Won;
            info!(level = world.level, tick = world.tick_index, "exit_reached");
            out_events.push(Event::ExitReached);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use sneaky_doctor_core::{
        EnemyId, Facing, GameConfig, MaskId, PathCursor, PatrolPath, Projection, RealRect,
        Velocity,
    };

    use super::{Drawable, Exit, LevelStatus, Visual, World};

    /// Configuration the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Number of the level being played.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.level
    }

    /// Ticks processed since the level was built.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick_index
    }

    /// Outcome of the attempt so far.
    #[must_use]
    pub fn status(world: &World) -> LevelStatus {
        world.status
    }

    /// Masks the player currently holds.
    #[must_use]
    pub fn mask_count(world: &World) -> u32 {
        world.mask_count
    }

    /// Collision rectangles of all walls in decode order.
    #[must_use]
    pub fn wall_rects(world: &World) -> &[RealRect] {
        &world.wall_rects
    }

    /// Drawables of all walls in decode order.
    #[must_use]
    pub fn walls(world: &World) -> &[Drawable] {
        &world.walls
    }

    /// Exit door of the level.
    #[must_use]
    pub fn exit(world: &World) -> Exit {
        world.exit
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        let player = &world.player;
        PlayerSnapshot {
            rect: player.drawable.real,
            projection: player.drawable.projection,
            visual: player.drawable.visual,
            velocity: player.velocity,
            facing: player.facing,
            protect_remaining: player.protect_remaining,
            dying_remaining: player.dying_remaining,
            visible: player.is_visible(),
        }
    }

    /// Captures a read-only view of the enemies in identifier order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView<'_> {
        let mut snapshots: Vec<EnemySnapshot<'_>> = world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                rect: enemy.drawable.real,
                projection: enemy.drawable.projection,
                visual: enemy.drawable.visual,
                cursor: enemy.cursor,
                facing: enemy.facing,
                path: &enemy.path,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        EnemyView { snapshots }
    }

    /// Captures the masks still lying in the level, in identifier order.
    #[must_use]
    pub fn mask_view(world: &World) -> MaskView {
        MaskView {
            snapshots: world
                .masks
                .iter()
                .map(|mask| MaskSnapshot {
                    id: mask.id,
                    rect: mask.drawable.real,
                    projection: mask.drawable.projection,
                    visual: mask.drawable.visual,
                })
                .collect(),
        }
    }

    /// Immutable representation of the player.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PlayerSnapshot {
        /// Collision rectangle in real space.
        pub rect: RealRect,
        /// Screen placement and layer.
        pub projection: Projection,
        /// Animation state.
        pub visual: Visual,
        /// Displacement applied during the last movement.
        pub velocity: Velocity,
        /// Horizontal facing.
        pub facing: Facing,
        /// Remaining ticks of mask protection.
        pub protect_remaining: u32,
        /// Remaining ticks of the dying sequence.
        pub dying_remaining: u32,
        /// Whether the sprite is shown this tick; protection makes it blink.
        pub visible: bool,
    }

    impl PlayerSnapshot {
        /// Reports whether the dying sequence is running.
        #[must_use]
        pub const fn is_dying(&self) -> bool {
            self.dying_remaining > 0
        }

        /// Reports whether enemy contact is currently ignored.
        #[must_use]
        pub const fn is_protected(&self) -> bool {
            self.protect_remaining > 0
        }

        /// Sprites are authored facing right and mirrored when facing left.
        #[must_use]
        pub fn is_mirrored(&self) -> bool {
            self.facing == Facing::Left
        }
    }

    /// Read-only snapshot describing all enemies of the level.
    #[derive(Clone, Debug)]
    pub struct EnemyView<'a> {
        snapshots: Vec<EnemySnapshot<'a>>,
    }

    impl<'a> EnemyView<'a> {
        /// Iterator over the captured snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot<'a>> {
            self.snapshots.iter()
        }

        /// Number of enemies captured.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether the level has no enemies.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<EnemySnapshot<'a>> {
            self.snapshots
        }
    }

    /// Immutable representation of a single enemy.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct EnemySnapshot<'a> {
        /// Identifier of the enemy.
        pub id: EnemyId,
        /// Collision rectangle in real space.
        pub rect: RealRect,
        /// Screen placement and layer.
        pub projection: Projection,
        /// Animation state.
        pub visual: Visual,
        /// Position along the patrol path.
        pub cursor: PathCursor,
        /// Direction of the last move.
        pub facing: Facing,
        /// Patrol path the enemy follows.
        pub path: &'a PatrolPath,
    }

    /// Read-only snapshot of the masks left in the level.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct MaskView {
        snapshots: Vec<MaskSnapshot>,
    }

    impl MaskView {
        /// Iterator over the captured snapshots in identifier order.
        pub fn iter(&self) -> impl Iterator<Item = &MaskSnapshot> {
            self.snapshots.iter()
        }

        /// Number of masks left.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether every mask was collected.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }
    }

    /// Immutable representation of a mask lying in the level.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MaskSnapshot {
        /// Identifier of the mask.
        pub id: MaskId,
        /// Collision rectangle in real space.
        pub rect: RealRect,
        /// Screen placement and layer.
        pub projection: Projection,
        /// Animation state.
        pub visual: Visual,
    }
}
