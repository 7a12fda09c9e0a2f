//! Pixel-route tracer for enemy patrol images.
//!
//! A patrol image holds a one pixel wide line of black or blue pixels and a
//! single green pixel marking where tracing begins. The tracer walks the
//! 8-connected line depth first and produces one ordered route that runs from
//! one dead end, through the start pixel, to the other dead end.
//!
//! The walk keeps its own stack of frames instead of recursing, so long
//! routes never exhaust the call stack. Only the pixels on the current walk
//! (the frames on the stack) are excluded when looking for continuations;
//! sibling branches may revisit each other's pixels.

use image::RgbaImage;
use sneaky_doctor_core::GridCell;

use crate::TraceError;

const PATH_COLOURS: [[u8; 4]; 2] = [[0, 0, 0, 255], [0, 0, 255, 255]];
const START_COLOUR: [u8; 4] = [0, 255, 0, 255];

/// Ordered pixel route traced from a patrol image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TracedRoute {
    /// Green pixel tracing started from.
    pub start: GridCell,
    /// Route from one end to the other, passing through `start` once.
    pub cells: Vec<GridCell>,
}

/// Locates the start pixel and traces the full route of a patrol image.
///
/// Diagonal runs must be drawn 8-connected. A 4-connected staircase makes
/// every step a corner with two continuations, and one of the branches
/// tried for such a corner sees three, so the image is rejected as
/// [`TraceError::Ambiguous`].
pub fn trace_route(image: &RgbaImage) -> Result<TracedRoute, TraceError> {
    let start = find_start(image).ok_or(TraceError::MissingStart)?;
    let cells = PathTracer::new(image).trace(start)?;
    if cells.len() < 2 {
        return Err(TraceError::Degenerate { start });
    }
    Ok(TracedRoute { start, cells })
}

/// First green pixel in row-major order.
#[must_use]
pub fn find_start(image: &RgbaImage) -> Option<GridCell> {
    image
        .enumerate_pixels()
        .find(|(_, _, pixel)| pixel.0 == START_COLOUR)
        .map(|(column, row, _)| GridCell::new(column, row))
}

/// Explicit-stack walker over the path pixels of one image.
#[derive(Debug)]
pub struct PathTracer<'a> {
    image: &'a RgbaImage,
    on_walk: Vec<bool>,
    buffers: Vec<Vec<GridCell>>,
    free_buffers: Vec<usize>,
}

#[derive(Clone, Copy, Debug)]
struct Visit {
    cell: GridCell,
    backwards: bool,
    out: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    First,
    Second,
}

/// Pending work of a pixel whose continuations are being walked.
#[derive(Clone, Copy, Debug)]
enum Frame {
    /// Plain line pixel with exactly one continuation.
    Segment {
        cell: GridCell,
        backwards: bool,
        out: usize,
    },
    /// Start pixel with two arms; the first arm is emitted reversed, the
    /// second in walking order.
    Root {
        cell: GridCell,
        out: usize,
        second: GridCell,
        phase: Phase,
    },
    /// Fork met mid-walk; both branches go to scratch buffers and the longer
    /// one is kept.
    Fork {
        cell: GridCell,
        backwards: bool,
        out: usize,
        second: GridCell,
        first_buffer: usize,
        second_buffer: usize,
        phase: Phase,
    },
}

impl<'a> PathTracer<'a> {
    /// Prepares a tracer over the provided image.
    #[must_use]
    pub fn new(image: &'a RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            image,
            on_walk: vec![false; width as usize * height as usize],
            buffers: Vec::new(),
            free_buffers: Vec::new(),
        }
    }

    /// Traces the route reachable from `start`.
    ///
    /// Pixels with no continuation end an arm. A pixel with two continuations
    /// is the route's turning point when it is the start pixel, and an
    /// ambiguous corner otherwise, in which case the branch yielding more
    /// pixels wins and ties go to the branch enumerated first. Three or more
    /// continuations are rejected.
    pub fn trace(&mut self, start: GridCell) -> Result<Vec<GridCell>, TraceError> {
        let result = self.acquire_buffer();
        let mut frames: Vec<Frame> = Vec::new();
        let mut pending = Some(Visit {
            cell: start,
            backwards: true,
            out: result,
        });

        loop {
            if let Some(visit) = pending.take() {
                pending = self.enter(visit, &mut frames)?;
                if pending.is_some() {
                    continue;
                }
            }

            let Some(frame) = frames.pop() else {
                break;
            };
            pending = self.resume(frame, &mut frames);
        }

        Ok(std::mem::take(&mut self.buffers[result]))
    }

    /// Inspects a newly reached pixel and returns the next pixel to visit, if
    /// the pixel continues the walk.
    fn enter(
        &mut self,
        visit: Visit,
        frames: &mut Vec<Frame>,
    ) -> Result<Option<Visit>, TraceError> {
        let Visit {
            cell,
            backwards,
            out,
        } = visit;
        let neighbors = self.unvisited_neighbors(cell);

        match *neighbors.as_slice() {
            [] => {
                self.buffers[out].push(cell);
                Ok(None)
            }
            [next] => {
                if !backwards {
                    self.buffers[out].push(cell);
                }
                self.mark(cell, true);
                frames.push(Frame::Segment {
                    cell,
                    backwards,
                    out,
                });
                Ok(Some(Visit { cell: next, ..visit }))
            }
            [first, second] if frames.is_empty() => {
                self.mark(cell, true);
                frames.push(Frame::Root {
                    cell,
                    out,
                    second,
                    phase: Phase::First,
                });
                Ok(Some(Visit {
                    cell: first,
                    backwards: true,
                    out,
                }))
            }
            [first, second] => {
                if !backwards {
                    self.buffers[out].push(cell);
                }
                self.mark(cell, true);
                let first_buffer = self.acquire_buffer();
                let second_buffer = self.acquire_buffer();
                frames.push(Frame::Fork {
                    cell,
                    backwards,
                    out,
                    second,
                    first_buffer,
                    second_buffer,
                    phase: Phase::First,
                });
                Ok(Some(Visit {
                    cell: first,
                    backwards,
                    out: first_buffer,
                }))
            }
            _ => Err(TraceError::Ambiguous {
                cell,
                neighbors: neighbors.len(),
            }),
        }
    }

    /// Continues a frame whose most recent child walk has finished.
    fn resume(&mut self, frame: Frame, frames: &mut Vec<Frame>) -> Option<Visit> {
        match frame {
            Frame::Segment {
                cell,
                backwards,
                out,
            } => {
                if backwards {
                    self.buffers[out].push(cell);
                }
                self.mark(cell, false);
                None
            }
            Frame::Root {
                cell,
                out,
                second,
                phase: Phase::First,
            } => {
                self.buffers[out].push(cell);
                frames.push(Frame::Root {
                    cell,
                    out,
                    second,
                    phase: Phase::Second,
                });
                Some(Visit {
                    cell: second,
                    backwards: false,
                    out,
                })
            }
            Frame::Root {
                cell,
                phase: Phase::Second,
                ..
            } => {
                self.mark(cell, false);
                None
            }
            Frame::Fork {
                cell,
                backwards,
                out,
                second,
                first_buffer,
                second_buffer,
                phase: Phase::First,
            } => {
                frames.push(Frame::Fork {
                    cell,
                    backwards,
                    out,
                    second,
                    first_buffer,
                    second_buffer,
                    phase: Phase::Second,
                });
                Some(Visit {
                    cell: second,
                    backwards,
                    out: second_buffer,
                })
            }
            Frame::Fork {
                cell,
                backwards,
                out,
                first_buffer,
                second_buffer,
                phase: Phase::Second,
                ..
            } => {
                let first = std::mem::take(&mut self.buffers[first_buffer]);
                let second = std::mem::take(&mut self.buffers[second_buffer]);
                let longer = if first.len() >= second.len() {
                    first
                } else {
                    second
                };
                self.buffers[out].extend(longer);
                if backwards {
                    self.buffers[out].push(cell);
                }
                self.release_buffer(first_buffer);
                self.release_buffer(second_buffer);
                self.mark(cell, false);
                None
            }
        }
    }

    /// Path pixels around `cell` that are not on the current walk, in
    /// column-major order starting at the upper-left neighbour.
    fn unvisited_neighbors(&self, cell: GridCell) -> Vec<GridCell> {
        let (width, height) = self.image.dimensions();
        let mut neighbors = Vec::with_capacity(8);
        for dx in -1_i64..=1 {
            for dy in -1_i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let column = i64::from(cell.column()) + dx;
                let row = i64::from(cell.row()) + dy;
                if column < 0
                    || row < 0
                    || column >= i64::from(width)
                    || row >= i64::from(height)
                {
                    continue;
                }
                let candidate = GridCell::new(column as u32, row as u32);
                if self.is_on_walk(candidate) {
                    continue;
                }
                let pixel = self.image.get_pixel(candidate.column(), candidate.row());
                if PATH_COLOURS.contains(&pixel.0) {
                    neighbors.push(candidate);
                }
            }
        }
        neighbors
    }

    fn index(&self, cell: GridCell) -> usize {
        cell.row() as usize * self.image.width() as usize + cell.column() as usize
    }

    fn is_on_walk(&self, cell: GridCell) -> bool {
        self.on_walk[self.index(cell)]
    }

    fn mark(&mut self, cell: GridCell, on_walk: bool) {
        let index = self.index(cell);
        self.on_walk[index] = on_walk;
    }

    fn acquire_buffer(&mut self) -> usize {
        if let Some(index) = self.free_buffers.pop() {
            return index;
        }
        self.buffers.push(Vec::new());
        self.buffers.len() - 1
    }

    fn release_buffer(&mut self, index: usize) {
        self.buffers[index].clear();
        self.free_buffers.push(index);
    }
}
