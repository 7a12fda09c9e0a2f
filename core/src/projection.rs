//! Real-space to screen-space projection for the oblique 2.5D view.

use crate::{GameConfig, Layer, RealRect, ScreenRect, SpriteSize};

/// Screen placement and draw-order key derived from a real rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Projection {
    /// Rectangle the sprite occupies on screen.
    pub screen: ScreenRect,
    /// Row-derived draw-order key.
    pub layer: Layer,
}

impl Projection {
    /// Returns the same placement drawn `offset` layers further in front.
    #[must_use]
    pub const fn raised(self, offset: i32) -> Self {
        Self {
            screen: self.screen,
            layer: self.layer.raised(offset),
        }
    }
}

/// Pure projection from real space onto the foreshortened screen.
///
/// The vertical axis is compressed by the configured foreshortening factor
/// and sprites are anchored so their bottom edge lines up with the top face
/// of a wall standing on the same row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthProjector {
    block_size: i32,
    foreshortening: f64,
    wall_height: i32,
}

impl DepthProjector {
    /// Creates a projector from the game configuration.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            block_size: config.block_size,
            foreshortening: f64::from(config.foreshortening),
            wall_height: config.wall_height,
        }
    }

    /// Projects a real rectangle for a sprite of the given size.
    ///
    /// `horizontal_offset` shifts the sprite left of the real rectangle so
    /// that wide sprites stay centred on their collision footprint.
    #[must_use]
    pub fn project(
        &self,
        real: RealRect,
        sprite: SpriteSize,
        horizontal_offset: i32,
    ) -> Projection {
        let compressed = (self.foreshortening * f64::from(real.top())).round_ties_even() as i32;
        Projection {
            screen: ScreenRect {
                x: real.left() - horizontal_offset,
                y: compressed + self.wall_height - sprite.height,
                width: sprite.width,
                height: sprite.height,
            },
            layer: self.layer_of(real),
        }
    }

    /// Row index of the rectangle's top edge.
    #[must_use]
    pub const fn layer_of(&self, real: RealRect) -> Layer {
        Layer::new(real.top().div_euclid(self.block_size))
    }
}
