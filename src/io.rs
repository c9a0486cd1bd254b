//! Visited-path persistence.
//!
//! Format: one line per path entry, `index row col`, in visiting order.
//! The first line is the start node.
//!
//! ```text
//! 4 1 1
//! 1 0 1
//! 0 0 0
//! ```

use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{PatrolError, Result};
use crate::grid::GridGraph;

/// Save a visited path to a file, creating parent directories.
pub fn save_path(path: &Path, visited: &[usize], graph: &GridGraph) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_path(&mut writer, visited, graph)?;
    writer.flush()?;
    Ok(())
}

/// Write a visited path to any writer.
pub fn write_path<W: Write>(writer: &mut W, visited: &[usize], graph: &GridGraph) -> Result<()> {
    for &index in visited {
        let coord = graph.grid().coord_of(index);
        writeln!(writer, "{} {} {}", index, coord.x, coord.y)?;
    }
    Ok(())
}

/// Read back the node indices of a saved path.
pub fn read_path<R: Read>(reader: R) -> Result<Vec<usize>> {
    let mut path = Vec::new();
    for (line_no, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let Some(first) = line.split_whitespace().next() else {
            continue;
        };
        let index = first.parse().map_err(|_| {
            PatrolError::MalformedInput(format!(
                "path line {}: '{}' is not a node index",
                line_no + 1,
                first
            ))
        })?;
        path.push(index);
    }
    Ok(path)
}

/// Load the node indices of a saved path file.
pub fn load_path(path: &Path) -> Result<Vec<usize>> {
    read_path(std::fs::File::open(path)?)
}
