#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Sneaky Doctor adapters.
//!
//! A [`Scene`] is a flat list of sprites, each with a screen rectangle and a
//! draw layer. Backends draw [`Scene::draw_order`], which sorts by layer and
//! keeps insertion order within a layer, so objects further down the level
//! overlap objects further up.

use std::time::Duration;

use anyhow::Result as AnyResult;
use sneaky_doctor_core::{Facing, GameStats, Key, Layer, ScreenRect};
use sneaky_doctor_world::{query, Visual, World};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Colour of the walkable floor behind every sprite.
pub const FLOOR_COLOR: Color = Color::from_rgb_u8(155, 188, 160);

/// Input captured by an adapter for a single frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Movement keys held down, oldest press first.
    pub pressed_keys: Vec<Key>,
}

/// Whether the backend should keep presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameControl {
    /// Present another frame.
    Continue,
    /// Stop the backend.
    Exit,
}

/// What a sprite depicts; backends map each kind onto an image set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    /// A wall block.
    Wall,
    /// The part of the exit door standing on its own row.
    ExitLower,
    /// The lintel of the exit door, drawn one layer in front.
    ExitUpper,
    /// A collectable mask.
    Mask,
    /// An enemy using the animation set for its facing.
    Enemy {
        /// Direction of the enemy's last move.
        facing: Facing,
    },
    /// The player.
    Player {
        /// Whether the images are flipped horizontally.
        mirrored: bool,
        /// Whether the dying animation plays.
        dying: bool,
        /// Whether the sprint animation plays instead of idling.
        moving: bool,
    },
}

/// One sprite placed on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneSprite {
    /// What the sprite depicts.
    pub kind: SpriteKind,
    /// Screen rectangle the image is scaled into.
    pub screen: ScreenRect,
    /// Draw-order key.
    pub layer: Layer,
    /// Animation frames elapsed; static sprites stay at zero.
    pub frame: u32,
    /// Hidden sprites keep their place in the scene but are not drawn.
    pub visible: bool,
}

impl SceneSprite {
    fn new(kind: SpriteKind, screen: ScreenRect, layer: Layer, visual: Visual) -> Self {
        Self {
            kind,
            screen,
            layer,
            frame: visual.clock().map_or(0, |clock| clock.frame()),
            visible: true,
        }
    }
}

/// Scene description of one level frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Level being shown.
    pub level: u32,
    /// Stats shown alongside the level.
    pub stats: GameStats,
    /// Sprites in insertion order.
    pub sprites: Vec<SceneSprite>,
}

impl Scene {
    /// Captures the drawable state of `world`.
    ///
    /// Sprites are inserted as masks, walls, exit, enemies and finally the
    /// player, which decides who is drawn last within a shared layer.
    #[must_use]
    pub fn from_world(world: &World, stats: &GameStats) -> Self {
        let mut sprites = Vec::new();

        for mask in query::mask_view(world).iter() {
            sprites.push(SceneSprite::new(
                SpriteKind::Mask,
                mask.projection.screen,
                mask.projection.layer,
                mask.visual,
            ));
        }

        for wall in query::walls(world) {
            let projection = wall.projection();
            sprites.push(SceneSprite::new(
                SpriteKind::Wall,
                projection.screen,
                projection.layer,
                wall.visual(),
            ));
        }

        let exit = query::exit(world);
        for (kind, projection) in [
            (SpriteKind::ExitLower, exit.lower()),
            (SpriteKind::ExitUpper, exit.upper()),
        ] {
            sprites.push(SceneSprite::new(
                kind,
                projection.screen,
                projection.layer,
                Visual::Static,
            ));
        }

        for enemy in query::enemy_view(world).iter() {
            sprites.push(SceneSprite::new(
                SpriteKind::Enemy {
                    facing: enemy.facing,
                },
                enemy.projection.screen,
                enemy.projection.layer,
                enemy.visual,
            ));
        }

        let player = query::player(world);
        let mut player_sprite = SceneSprite::new(
            SpriteKind::Player {
                mirrored: player.is_mirrored(),
                dying: player.is_dying(),
                moving: !player.velocity.is_zero(),
            },
            player.projection.screen,
            player.projection.layer,
            player.visual,
        );
        player_sprite.visible = player.visible;
        sprites.push(player_sprite);

        Self {
            level: query::level(world),
            stats: stats.clone(),
            sprites,
        }
    }

    /// Sprites sorted by layer, keeping insertion order within a layer.
    #[must_use]
    pub fn draw_order(&self) -> Vec<&SceneSprite> {
        let mut ordered: Vec<&SceneSprite> = self.sprites.iter().collect();
        ordered.sort_by_key(|sprite| sprite.layer);
        ordered
    }

    /// Sprites that are actually painted, back to front.
    pub fn visible_in_draw_order(&self) -> impl Iterator<Item = &SceneSprite> {
        self.draw_order().into_iter().filter(|sprite| sprite.visible)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Fixed duration of one simulation frame.
    pub frame_duration: Duration,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, framerate: u32, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            frame_duration: Duration::from_secs(1) / framerate.max(1),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Sneaky Doctor scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the fixed frame duration
    /// and the input captured for the frame, advances the simulation and
    /// refreshes the scene before it is presented.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameControl;
}
