//! Static occupancy grid parsed from text.
//!
//! The text format is one grid row per line, values separated by
//! whitespace. `0` marks a free cell, any other integer a blocked one.
//!
//! ```text
//! 0 0 0
//! 0 1 0
//! 0 0 0
//! ```

use std::path::Path;

use super::GridCoord;
use crate::error::{PatrolError, Result};

/// Free/blocked map in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    rows: usize,
    cols: usize,
    blocked: Vec<bool>,
}

impl OccupancyGrid {
    /// Parse a grid from its text form.
    ///
    /// Blank lines are ignored. Every remaining line must hold the same
    /// number of integer values.
    pub fn parse(text: &str) -> Result<Self> {
        let mut blocked = Vec::new();
        let mut rows = 0;
        let mut cols = None;

        for (line_no, line) in text.lines().enumerate() {
            let mut width = 0;
            for token in line.split_whitespace() {
                let value: i64 = token.parse().map_err(|_| {
                    PatrolError::MalformedInput(format!(
                        "line {}: '{}' is not an integer",
                        line_no + 1,
                        token
                    ))
                })?;
                blocked.push(value != 0);
                width += 1;
            }

            if width == 0 {
                continue;
            }

            match cols {
                None => cols = Some(width),
                Some(expected) if expected != width => {
                    return Err(PatrolError::MalformedInput(format!(
                        "line {}: expected {} values, found {}",
                        line_no + 1,
                        expected,
                        width
                    )));
                }
                Some(_) => {}
            }
            rows += 1;
        }

        let cols = cols.ok_or_else(|| PatrolError::MalformedInput("grid has no rows".into()))?;
        Ok(Self {
            rows,
            cols,
            blocked,
        })
    }

    /// Read and parse a grid file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Build a grid from explicit rows of cell values.
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if cols == 0 {
            return Err(PatrolError::MalformedInput("grid has no cells".into()));
        }

        let mut blocked = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(PatrolError::MalformedInput(format!(
                    "row {}: expected {} values, found {}",
                    i,
                    cols,
                    row.len()
                )));
            }
            blocked.extend(row.iter().map(|&v| v != 0));
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            blocked,
        })
    }

    /// All-free grid of the given size.
    pub fn open(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            blocked: vec![false; rows * cols],
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    /// True if the grid holds no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    /// Row-major index of a coordinate, or `None` if out of bounds.
    #[inline]
    pub fn index_of(&self, coord: GridCoord) -> Option<usize> {
        if coord.x < 0 || coord.y < 0 {
            return None;
        }
        let (row, col) = (coord.x as usize, coord.y as usize);
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    /// Coordinate of a row-major index.
    #[inline]
    pub fn coord_of(&self, index: usize) -> GridCoord {
        GridCoord::new((index / self.cols) as i32, (index % self.cols) as i32)
    }

    /// Whether the cell at `index` is blocked. Out-of-range counts as blocked.
    #[inline]
    pub fn is_blocked(&self, index: usize) -> bool {
        self.blocked.get(index).copied().unwrap_or(true)
    }

    /// Number of free cells.
    pub fn free_count(&self) -> usize {
        self.blocked.iter().filter(|&&b| !b).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let grid = OccupancyGrid::parse("0 0 0\n0 1 0\n0 0 0\n").unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.len(), 9);
        assert!(grid.is_blocked(4));
        assert!(!grid.is_blocked(0));
        assert_eq!(grid.free_count(), 8);
    }

    #[test]
    fn test_parse_without_trailing_newline() {
        let grid = OccupancyGrid::parse("0 0\n0 0").unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 2);
    }

    #[test]
    fn test_parse_nonzero_values_are_blocked() {
        let grid = OccupancyGrid::parse("0 2 -1\n").unwrap();
        assert!(!grid.is_blocked(0));
        assert!(grid.is_blocked(1));
        assert!(grid.is_blocked(2));
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let grid = OccupancyGrid::parse("\n0 0\n\n0 1\n\n").unwrap();
        assert_eq!(grid.rows(), 2);
        assert!(grid.is_blocked(3));
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        let err = OccupancyGrid::parse("0 0 0\n0 0\n").unwrap_err();
        assert!(matches!(err, PatrolError::MalformedInput(_)));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            OccupancyGrid::parse("").unwrap_err(),
            PatrolError::MalformedInput(_)
        ));
        assert!(matches!(
            OccupancyGrid::parse("  \n\n").unwrap_err(),
            PatrolError::MalformedInput(_)
        ));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = OccupancyGrid::parse("0 x 0\n").unwrap_err();
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_from_rows() {
        let grid = OccupancyGrid::from_rows(&[[0, 1], [0, 0]]).unwrap();
        assert_eq!(grid.rows(), 2);
        assert!(grid.is_blocked(1));

        let ragged: Vec<Vec<i32>> = vec![vec![0, 0], vec![0]];
        assert!(OccupancyGrid::from_rows(&ragged).is_err());

        let empty: Vec<Vec<i32>> = Vec::new();
        assert!(OccupancyGrid::from_rows(&empty).is_err());
    }

    #[test]
    fn test_index_round_trip() {
        let grid = OccupancyGrid::open(3, 4);
        assert_eq!(grid.index_of(GridCoord::new(2, 1)), Some(9));
        assert_eq!(grid.coord_of(9), GridCoord::new(2, 1));
        assert_eq!(grid.index_of(GridCoord::new(-1, 0)), None);
        assert_eq!(grid.index_of(GridCoord::new(0, 4)), None);
        assert_eq!(grid.index_of(GridCoord::new(3, 0)), None);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.txt");
        std::fs::write(&path, "0 0\n1 0\n").unwrap();

        let grid = OccupancyGrid::load(&path).unwrap();
        assert_eq!(grid.free_count(), 3);

        let missing = OccupancyGrid::load(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(missing, PatrolError::Io(_)));
    }
}
