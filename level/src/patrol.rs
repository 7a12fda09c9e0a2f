//! Decoding of a single enemy patrol image into a dense path.

use image::RgbaImage;
use sneaky_doctor_core::{GameConfig, GridCell, PatrolPath, RealPosition};

use crate::{interpolate, trace_route, LoadError, TraceError};

/// Patrol route of one enemy, ready to be followed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemyPatrol {
    /// File name the route was decoded from.
    pub name: String,
    /// Green pixel the enemy spawns on.
    pub start: GridCell,
    /// Traced pixel route.
    pub route: Vec<GridCell>,
    /// Dense real-space path.
    pub path: PatrolPath,
    /// Index of the spawn position within `path`.
    pub start_index: usize,
}

impl EnemyPatrol {
    /// Real-space spawn position.
    #[must_use]
    pub fn start_position(&self) -> RealPosition {
        self.path.get(self.start_index).unwrap_or_default()
    }
}

/// Turns patrol images into [`EnemyPatrol`] values.
#[derive(Clone, Copy, Debug)]
pub struct PatrolDecoder {
    block_size: i32,
    columns: u32,
    rows: u32,
}

impl PatrolDecoder {
    /// Creates a decoder for the configured grid and block size.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            block_size: config.block_size,
            columns: config.grid_columns,
            rows: config.grid_rows,
        }
    }

    /// Traces and interpolates the patrol image called `name`.
    pub fn decode(&self, name: &str, image: &RgbaImage) -> Result<EnemyPatrol, LoadError> {
        let (width, height) = image.dimensions();
        if (width, height) != (self.columns, self.rows) {
            return Err(LoadError::PathDimensions {
                name: name.to_owned(),
                width,
                height,
                expected_width: self.columns,
                expected_height: self.rows,
            });
        }

        let traced = trace_route(image).map_err(|source| match source {
            TraceError::MissingStart => LoadError::PathMissingMarker {
                name: name.to_owned(),
            },
            source => LoadError::PathTopology {
                name: name.to_owned(),
                source,
            },
        })?;

        let start = traced.start;
        let degenerate = move || LoadError::PathTopology {
            name: name.to_owned(),
            source: TraceError::Degenerate { start },
        };
        let path = PatrolPath::new(interpolate(&traced.cells, self.block_size))
            .ok_or_else(degenerate)?;
        let start_index = path
            .index_of(start.to_real(self.block_size))
            .ok_or_else(degenerate)?;

        Ok(EnemyPatrol {
            name: name.to_owned(),
            start,
            route: traced.cells,
            path,
            start_index,
        })
    }
}
