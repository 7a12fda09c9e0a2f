//! Filesystem access for level directories.
//!
//! A level lives in `<root>/level_<n>/` and contains the map image
//! `map<n>.png` plus zero or more patrol images whose names start with `npc`.
//! Patrol images are decoded in lexicographic file name order, which fixes
//! enemy identifiers across runs.

use std::{
    fs,
    path::{Path, PathBuf},
};

use image::RgbaImage;
use sneaky_doctor_core::GameConfig;
use tracing::{debug, info};

use crate::{EnemyPatrol, LevelMap, LoadError, MapDecoder, PatrolDecoder};

const PATROL_PREFIX: &str = "npc";

/// Everything decoded from one level directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelAssets {
    /// One-based level number.
    pub number: u32,
    /// Static geometry and markers.
    pub map: LevelMap,
    /// Patrol routes in file name order.
    pub patrols: Vec<EnemyPatrol>,
}

/// Loads levels from a directory tree.
#[derive(Clone, Debug)]
pub struct LevelLoader {
    root: PathBuf,
    map_decoder: MapDecoder,
    patrol_decoder: PatrolDecoder,
}

impl LevelLoader {
    /// Creates a loader reading levels below `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, config: &GameConfig) -> Self {
        Self {
            root: root.into(),
            map_decoder: MapDecoder::new(config),
            patrol_decoder: PatrolDecoder::new(config),
        }
    }

    /// Directory holding the files of level `number`.
    #[must_use]
    pub fn level_dir(&self, number: u32) -> PathBuf {
        self.root.join(format!("level_{number}"))
    }

    /// Decodes the map and all patrol routes of level `number`.
    ///
    /// Any failure aborts the whole load; no partial level is returned.
    pub fn load(&self, number: u32) -> Result<LevelAssets, LoadError> {
        let dir = self.level_dir(number);
        info!(level = number, dir = %dir.display(), "level_load_started");

        let map = self
            .map_decoder
            .decode(&read_rgba(&dir.join(format!("map{number}.png")))?)?;

        let mut patrols = Vec::new();
        for (name, path) in patrol_files(&dir)? {
            debug!(level = number, file = %name, "patrol_decode_started");
            let patrol = self.patrol_decoder.decode(&name, &read_rgba(&path)?)?;
            debug!(
                level = number,
                file = %name,
                route_cells = patrol.route.len(),
                path_len = patrol.path.len(),
                "patrol_decode_finished"
            );
            patrols.push(patrol);
        }

        info!(
            level = number,
            walls = map.walls.len(),
            masks = map.masks.len(),
            enemies = patrols.len(),
            "level_load_finished"
        );
        Ok(LevelAssets {
            number,
            map,
            patrols,
        })
    }
}

fn read_rgba(path: &Path) -> Result<RgbaImage, LoadError> {
    let image = image::open(path).map_err(|source| LoadError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}

fn patrol_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, LoadError> {
    let io_error = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(PATROL_PREFIX) || !entry.path().is_file() {
            continue;
        }
        files.push((name, entry.path()));
    }
    files.sort();
    Ok(files)
}
