//! Integer geometry shared by the level decoder, the world and its systems.
//!
//! All gameplay logic runs in *real space*, the top-down authoring coordinate
//! system in which one level pixel spans `block_size` units along both axes.
//! Screen space only exists for drawing and is produced by
//! [`crate::DepthProjector`].

use serde::{Deserialize, Serialize};

/// Location of a single level pixel expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    column: u32,
    row: u32,
}

impl GridCell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Real-space position of the cell's upper-left corner.
    #[must_use]
    pub const fn to_real(self, block_size: i32) -> RealPosition {
        RealPosition::new(
            self.column as i32 * block_size,
            self.row as i32 * block_size,
        )
    }

    /// Reports whether both cells touch within the 8-connected neighbourhood.
    #[must_use]
    pub fn is_adjacent_to(self, other: GridCell) -> bool {
        self != other
            && self.column.abs_diff(other.column) <= 1
            && self.row.abs_diff(other.row) <= 1
    }
}

/// Point in real space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RealPosition {
    x: i32,
    y: i32,
}

impl RealPosition {
    /// Creates a new real-space position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate, growing towards the bottom of the level.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the position shifted by the provided offsets.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Axis-aligned rectangle in real space used for every collision query.
///
/// Edges follow the half-open convention: a rectangle spans `left..right`
/// and `top..bottom`, so two rectangles that merely share an edge do not
/// collide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RealRect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl RealRect {
    /// Creates a rectangle anchored at `origin` with the provided size.
    #[must_use]
    pub const fn new(origin: RealPosition, width: i32, height: i32) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width,
            height,
        }
    }

    /// Creates a square rectangle anchored at `origin`.
    #[must_use]
    pub const fn square(origin: RealPosition, side: i32) -> Self {
        Self::new(origin, side, side)
    }

    /// Upper-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> RealPosition {
        RealPosition::new(self.x, self.y)
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Right edge, exclusive.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Bottom edge, exclusive.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Returns the rectangle translated by the provided offsets.
    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Returns the rectangle moved so its origin matches `origin`.
    #[must_use]
    pub const fn moved_to(self, origin: RealPosition) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            ..self
        }
    }

    /// Moves the rectangle so its left edge sits at `left`.
    pub fn set_left(&mut self, left: i32) {
        self.x = left;
    }

    /// Moves the rectangle so its right edge sits at `right`.
    pub fn set_right(&mut self, right: i32) {
        self.x = right - self.width;
    }

    /// Moves the rectangle so its top edge sits at `top`.
    pub fn set_top(&mut self, top: i32) {
        self.y = top;
    }

    /// Moves the rectangle so its bottom edge sits at `bottom`.
    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.height;
    }

    /// Reports whether the rectangle has no area.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Reports whether the interiors of both rectangles overlap.
    #[must_use]
    pub const fn collides(&self, other: &RealRect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Reports whether `other` lies completely inside this rectangle.
    #[must_use]
    pub const fn contains(&self, other: &RealRect) -> bool {
        self.left() <= other.left()
            && self.top() <= other.top()
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }

    /// Indices of every rectangle in `others` that collides with this one,
    /// in ascending order.
    #[must_use]
    pub fn colliding_indices(&self, others: &[RealRect]) -> Vec<usize> {
        others
            .iter()
            .enumerate()
            .filter(|(_, other)| self.collides(other))
            .map(|(index, _)| index)
            .collect()
    }

    /// Reports whether any rectangle in `others` collides with this one.
    #[must_use]
    pub fn collides_any(&self, others: &[RealRect]) -> bool {
        others.iter().any(|other| self.collides(other))
    }

    /// Pushes the rectangle back inside `bounds` one edge at a time.
    pub fn clamp_within(&mut self, bounds: &RealRect) {
        if bounds.contains(self) {
            return;
        }
        if self.left() < bounds.left() {
            self.set_left(bounds.left());
        }
        if self.right() > bounds.right() {
            self.set_right(bounds.right());
        }
        if self.top() < bounds.top() {
            self.set_top(bounds.top());
        }
        if self.bottom() > bounds.bottom() {
            self.set_bottom(bounds.bottom());
        }
    }
}

/// Rectangle in screen space, produced by the depth projection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenRect {
    /// Horizontal screen coordinate of the left edge.
    pub x: i32,
    /// Vertical screen coordinate of the top edge.
    pub y: i32,
    /// Width in screen pixels.
    pub width: i32,
    /// Height in screen pixels.
    pub height: i32,
}

/// Dimensions of a sprite in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteSize {
    /// Width in screen pixels.
    pub width: i32,
    /// Height in screen pixels.
    pub height: i32,
}

impl SpriteSize {
    /// Creates a new sprite size.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Draw-order key; higher layers draw later and therefore in front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Layer(i32);

impl Layer {
    /// Wraps the provided row index.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying row index.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Returns a layer shifted by `offset` rows.
    #[must_use]
    pub const fn raised(self, offset: i32) -> Self {
        Self(self.0 + offset)
    }
}
