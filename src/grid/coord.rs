//! Cell coordinates for the patrol grid.

use serde::{Deserialize, Serialize};

/// Grid coordinates (integer cell indices)
///
/// `x` is the row and `y` the column, so a cell's row-major index is
/// `x * cols + y`. Signed so neighbor offsets can step outside the grid
/// before being bounds-checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCoord {
    /// Row index
    pub x: i32,
    /// Column index
    pub y: i32,
}

impl GridCoord {
    /// Create a new grid coordinate
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Get the 4 orthogonal neighbors (up, left, right, down)
    #[inline]
    pub fn neighbors_4(&self) -> [GridCoord; 4] {
        [
            GridCoord::new(self.x - 1, self.y), // Up
            GridCoord::new(self.x, self.y - 1), // Left
            GridCoord::new(self.x, self.y + 1), // Right
            GridCoord::new(self.x + 1, self.y), // Down
        ]
    }

    /// Get the 8 neighbors (including diagonals), row by row
    #[inline]
    pub fn neighbors_8(&self) -> [GridCoord; 8] {
        [
            GridCoord::new(self.x - 1, self.y - 1),
            GridCoord::new(self.x - 1, self.y),
            GridCoord::new(self.x - 1, self.y + 1),
            GridCoord::new(self.x, self.y - 1),
            GridCoord::new(self.x, self.y + 1),
            GridCoord::new(self.x + 1, self.y - 1),
            GridCoord::new(self.x + 1, self.y),
            GridCoord::new(self.x + 1, self.y + 1),
        ]
    }
}
