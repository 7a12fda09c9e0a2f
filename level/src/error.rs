use std::{fmt, path::PathBuf};

use sneaky_doctor_core::GridCell;
use thiserror::Error;

/// Markers a level map must contain exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapMarker {
    /// Blue pixel marking where the player spawns.
    Start,
    /// Green pixel marking the exit door.
    Exit,
}

impl fmt::Display for MapMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start (blue)"),
            Self::Exit => f.write_str("exit (green)"),
        }
    }
}

/// Coarse classification of [`LoadError`] used by callers that only need to
/// decide how to react.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadErrorKind {
    /// The map image has the wrong size.
    MapDimension,
    /// The map image lacks its start or exit pixel.
    MapMissingMarker,
    /// A path image has the wrong size.
    PathDimension,
    /// A path image lacks its green start pixel.
    PathMissingMarker,
    /// A path image cannot be traced into a single route.
    PathTopology,
    /// A level file could not be read.
    Io,
    /// A level file could not be decoded as an image.
    Image,
}

/// Failure while constructing a level from its images.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The map image does not match the configured grid size.
    #[error("map image is {width}x{height}, expected {expected_width}x{expected_height}")]
    MapDimensions {
        /// Width of the rejected image.
        width: u32,
        /// Height of the rejected image.
        height: u32,
        /// Configured column count.
        expected_width: u32,
        /// Configured row count.
        expected_height: u32,
    },
    /// The map image lacks a required marker pixel.
    #[error("map image has no {marker} pixel")]
    MapMissingMarker {
        /// Marker that was not found.
        marker: MapMarker,
    },
    /// A path image does not match the configured grid size.
    #[error("path image `{name}` is {width}x{height}, expected {expected_width}x{expected_height}")]
    PathDimensions {
        /// File name of the path image.
        name: String,
        /// Width of the rejected image.
        width: u32,
        /// Height of the rejected image.
        height: u32,
        /// Configured column count.
        expected_width: u32,
        /// Configured row count.
        expected_height: u32,
    },
    /// A path image lacks its start pixel.
    #[error("path image `{name}` has no start (green) pixel")]
    PathMissingMarker {
        /// File name of the path image.
        name: String,
    },
    /// A path image is not a simple line through its start pixel.
    #[error("path image `{name}` cannot be traced")]
    PathTopology {
        /// File name of the path image.
        name: String,
        /// Tracing failure.
        #[source]
        source: TraceError,
    },
    /// A level directory or file could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A level file is not a decodable image.
    #[error("failed to decode image {}", path.display())]
    Image {
        /// Path that failed.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: image::ImageError,
    },
}

impl LoadError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> LoadErrorKind {
        match self {
            Self::MapDimensions { .. } => LoadErrorKind::MapDimension,
            Self::MapMissingMarker { .. } => LoadErrorKind::MapMissingMarker,
            Self::PathDimensions { .. } => LoadErrorKind::PathDimension,
            Self::PathMissingMarker { .. } => LoadErrorKind::PathMissingMarker,
            Self::PathTopology { .. } => LoadErrorKind::PathTopology,
            Self::Io { .. } => LoadErrorKind::Io,
            Self::Image { .. } => LoadErrorKind::Image,
        }
    }
}

/// Failure while walking the pixels of a patrol route.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TraceError {
    /// No green pixel marks where tracing starts.
    #[error("no start (green) pixel")]
    MissingStart,
    /// A pixel branches into more directions than a route allows.
    #[error("pixel ({}, {}) has {neighbors} unvisited path neighbours", cell.column(), cell.row())]
    Ambiguous {
        /// Pixel where tracing stopped.
        cell: GridCell,
        /// Number of candidate continuations found.
        neighbors: usize,
    },
    /// The route consists of the start pixel alone.
    #[error("route starting at ({}, {}) has no path pixels", start.column(), start.row())]
    Degenerate {
        /// Lone start pixel.
        start: GridCell,
    },
}
