//! Decoder for the colour-coded level map image.

use image::{Rgba, RgbaImage};
use sneaky_doctor_core::{GameConfig, GridCell, Layer, RealPosition, RealRect};
use tracing::warn;

use crate::{LoadError, MapMarker};

const WALL: [u8; 4] = [0, 0, 0, 255];
const EXIT: [u8; 4] = [0, 255, 0, 255];
const MASK: [u8; 4] = [255, 0, 0, 255];
const START: [u8; 4] = [0, 0, 255, 255];

/// Meaning of a single map pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapPixel {
    /// Solid wall block.
    Wall,
    /// Exit door.
    Exit,
    /// Collectable mask.
    Mask,
    /// Player spawn point.
    Start,
    /// Walkable floor.
    Floor,
}

impl MapPixel {
    /// Classifies an RGBA pixel. Only fully opaque marker colours count.
    #[must_use]
    pub fn classify(pixel: &Rgba<u8>) -> Self {
        match pixel.0 {
            WALL => Self::Wall,
            EXIT => Self::Exit,
            MASK => Self::Mask,
            START => Self::Start,
            _ => Self::Floor,
        }
    }
}

/// One wall block of the level geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WallBlock {
    /// Map pixel the block was decoded from.
    pub cell: GridCell,
    /// Collision rectangle in real space.
    pub rect: RealRect,
    /// Draw layer, equal to the block's row.
    pub layer: Layer,
}

/// Exit door, drawn as a lower part the player can walk through and an upper
/// part that occludes whoever stands on the row above.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExitDoor {
    /// Map pixel the door was decoded from.
    pub cell: GridCell,
    /// Area the player has to enter completely to win.
    pub rect: RealRect,
    /// Layer of the lower part.
    pub lower_layer: Layer,
    /// Layer of the upper part, one row in front of the lower part.
    pub upper_layer: Layer,
}

/// Static geometry and markers decoded from a level map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelMap {
    /// Wall blocks in row-major pixel order.
    pub walls: Vec<WallBlock>,
    /// Exit door.
    pub exit: ExitDoor,
    /// Cells holding a collectable mask, in row-major order.
    pub masks: Vec<GridCell>,
    /// Cell the player spawns on.
    pub start: GridCell,
}

impl LevelMap {
    /// Collision rectangles of every wall block, preserving decode order.
    #[must_use]
    pub fn wall_rects(&self) -> Vec<RealRect> {
        self.walls.iter().map(|wall| wall.rect).collect()
    }
}

/// Turns a level map image into wall geometry and markers.
#[derive(Clone, Copy, Debug)]
pub struct MapDecoder {
    block_size: i32,
    columns: u32,
    rows: u32,
}

impl MapDecoder {
    /// Creates a decoder for the configured grid and block size.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            block_size: config.block_size,
            columns: config.grid_columns,
            rows: config.grid_rows,
        }
    }

    /// Decodes a map image.
    ///
    /// Fails when the image size differs from the configured grid or when the
    /// start or exit pixel is missing. When a marker appears more than once
    /// the last occurrence in row-major order wins.
    pub fn decode(&self, image: &RgbaImage) -> Result<LevelMap, LoadError> {
        let (width, height) = image.dimensions();
        if (width, height) != (self.columns, self.rows) {
            return Err(LoadError::MapDimensions {
                width,
                height,
                expected_width: self.columns,
                expected_height: self.rows,
            });
        }

        let mut walls = Vec::new();
        let mut masks = Vec::new();
        let mut start = None;
        let mut exit = None;

        for (column, row, pixel) in image.enumerate_pixels() {
            let cell = GridCell::new(column, row);
            match MapPixel::classify(pixel) {
                MapPixel::Wall => walls.push(WallBlock {
                    cell,
                    rect: self.block_rect(cell),
                    layer: Layer::new(row as i32),
                }),
                MapPixel::Exit => {
                    if let Some(previous) = exit.replace(cell) {
                        warn!(?previous, ?cell, "map_duplicate_exit_marker");
                    }
                }
                MapPixel::Mask => masks.push(cell),
                MapPixel::Start => {
                    if let Some(previous) = start.replace(cell) {
                        warn!(?previous, ?cell, "map_duplicate_start_marker");
                    }
                }
                MapPixel::Floor => {}
            }
        }

        let start = start.ok_or(LoadError::MapMissingMarker {
            marker: MapMarker::Start,
        })?;
        let exit = exit.ok_or(LoadError::MapMissingMarker {
            marker: MapMarker::Exit,
        })?;
        let lower_layer = Layer::new(exit.row() as i32);

        Ok(LevelMap {
            walls,
            exit: ExitDoor {
                cell: exit,
                rect: self.block_rect(exit),
                lower_layer,
                upper_layer: lower_layer.raised(1),
            },
            masks,
            start,
        })
    }

    /// Real-space position of a cell's upper-left corner.
    #[must_use]
    pub const fn real_position(&self, cell: GridCell) -> RealPosition {
        cell.to_real(self.block_size)
    }

    fn block_rect(&self, cell: GridCell) -> RealRect {
        RealRect::square(self.real_position(cell), self.block_size)
    }
}
