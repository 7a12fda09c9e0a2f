#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level construction from raster images.
//!
//! A level is authored as a small colour-coded map image plus one image per
//! enemy describing its patrol route. This crate decodes both into static
//! geometry and dense patrol paths before any simulation starts; every
//! failure is fatal for the level being loaded.

mod error;
mod interpolate;
mod loader;
mod map;
mod patrol;
mod trace;

pub use error::{LoadError, LoadErrorKind, MapMarker, TraceError};
pub use interpolate::interpolate;
pub use loader::{LevelAssets, LevelLoader};
pub use map::{ExitDoor, LevelMap, MapDecoder, MapPixel, WallBlock};
pub use patrol::{EnemyPatrol, PatrolDecoder};
pub use trace::{find_start, trace_route, PathTracer, TracedRoute};
