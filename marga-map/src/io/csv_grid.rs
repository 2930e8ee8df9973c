//! CSV text encoding of wall grids.

use std::path::Path;

use thiserror::Error;

use crate::grid::{EdgeLayer, GridDialect, WallGrid, WallState};

/// Errors while loading or saving a persisted grid.
#[derive(Error, Debug)]
pub enum MapIoError {
    /// Underlying file error
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being read or written
        path: String,
        /// Cause
        source: std::io::Error,
    },

    /// A cell is not an integer
    #[error("row {row}, column {col}: '{text}' is not an integer")]
    Parse {
        /// Zero-based record index
        row: usize,
        /// Zero-based field index
        col: usize,
        /// Offending text
        text: String,
    },

    /// A cell is an integer outside the dialect's alphabet
    #[error("row {row}, column {col}: value {value} is not valid in the {dialect} dialect")]
    InvalidCell {
        /// Zero-based record index
        row: usize,
        /// Zero-based field index
        col: usize,
        /// Offending value
        value: i64,
        /// Dialect name
        dialect: &'static str,
    },

    /// Row or column count does not match the maze size
    #[error("expected {expected_rows}x{expected_cols} edges, found {rows} rows (row {bad_row} has {cols} columns)")]
    Dimensions {
        /// Required record count
        expected_rows: usize,
        /// Required fields per record
        expected_cols: usize,
        /// Records found
        rows: usize,
        /// First record with a wrong field count, or the record count itself
        bad_row: usize,
        /// Fields found in `bad_row`
        cols: usize,
    },

    /// The grid holds a state the target dialect cannot express
    #[error("edge state {state:?} cannot be written in the {dialect} dialect")]
    Unencodable {
        /// State that failed to encode
        state: WallState,
        /// Dialect name
        dialect: &'static str,
    },
}

/// Parse one edge layer of `rows × cols` values.
pub fn parse_layer(
    text: &str,
    rows: usize,
    cols: usize,
    dialect: GridDialect,
) -> Result<Vec<WallState>, MapIoError> {
    let records: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if records.len() != rows {
        return Err(MapIoError::Dimensions {
            expected_rows: rows,
            expected_cols: cols,
            rows: records.len(),
            bad_row: records.len(),
            cols: 0,
        });
    }

    let mut states = Vec::with_capacity(rows * cols);
    for (row, record) in records.iter().enumerate() {
        let fields: Vec<&str> = record.split(',').map(str::trim).collect();
        if fields.len() != cols {
            return Err(MapIoError::Dimensions {
                expected_rows: rows,
                expected_cols: cols,
                rows: records.len(),
                bad_row: row,
                cols: fields.len(),
            });
        }

        for (col, field) in fields.iter().enumerate() {
            let value: i64 = field.parse().map_err(|_| MapIoError::Parse {
                row,
                col,
                text: field.to_string(),
            })?;
            let state = dialect.decode(value).ok_or(MapIoError::InvalidCell {
                row,
                col,
                value,
                dialect: dialect.name(),
            })?;
            states.push(state);
        }
    }

    Ok(states)
}

/// Format one edge layer as CSV text (one record per line).
pub fn format_layer(
    grid: &WallGrid,
    layer: EdgeLayer,
    dialect: GridDialect,
) -> Result<String, MapIoError> {
    let (_, cols) = grid.layer_dims(layer);
    let mut out = String::new();

    for row in grid.layer(layer).chunks(cols.max(1)) {
        let encoded: Vec<String> = row
            .iter()
            .map(|&state| {
                dialect
                    .encode(state)
                    .map(|v| v.to_string())
                    .ok_or(MapIoError::Unencodable {
                        state,
                        dialect: dialect.name(),
                    })
            })
            .collect::<Result<_, _>>()?;
        out.push_str(&encoded.join(","));
        out.push('\n');
    }

    Ok(out)
}

/// Build a grid from the text of both edge layers.
pub fn read_grid(
    horizontal: &str,
    vertical: &str,
    width: usize,
    height: usize,
    dialect: GridDialect,
) -> Result<WallGrid, MapIoError> {
    let h = parse_layer(horizontal, height + 1, width, dialect)?;
    let v = parse_layer(vertical, height, width + 1, dialect)?;

    // Lengths were validated by parse_layer
    WallGrid::from_edges(width, height, h, v).ok_or(MapIoError::Dimensions {
        expected_rows: height,
        expected_cols: width,
        rows: 0,
        bad_row: 0,
        cols: 0,
    })
}

fn read_file(path: &Path) -> Result<String, MapIoError> {
    std::fs::read_to_string(path).map_err(|source| MapIoError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), MapIoError> {
    std::fs::write(path, contents).map_err(|source| MapIoError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Load a grid from its two edge files.
pub fn load_grid(
    horizontal: &Path,
    vertical: &Path,
    width: usize,
    height: usize,
    dialect: GridDialect,
) -> Result<WallGrid, MapIoError> {
    let h = read_file(horizontal)?;
    let v = read_file(vertical)?;
    let grid = read_grid(&h, &v, width, height, dialect)?;

    let (unknown, open, wall) = grid.edge_counts();
    log::info!(
        "Loaded {}x{} {} grid: {} wall, {} open, {} unknown edges",
        width,
        height,
        dialect.name(),
        wall,
        open,
        unknown
    );

    Ok(grid)
}

/// Load a grid, substituting an all-open grid if the files are missing or
/// malformed.
///
/// The error is logged once and returned alongside the fallback so callers
/// can surface it.
pub fn load_grid_or_open(
    horizontal: &Path,
    vertical: &Path,
    width: usize,
    height: usize,
    dialect: GridDialect,
) -> (WallGrid, Option<MapIoError>) {
    match load_grid(horizontal, vertical, width, height, dialect) {
        Ok(grid) => (grid, None),
        Err(e) => {
            log::warn!("Failed to load wall grid ({}), using an all-open grid", e);
            (WallGrid::open(width, height), Some(e))
        }
    }
}

/// Save both edge layers of a grid.
pub fn save_grid(
    grid: &WallGrid,
    horizontal: &Path,
    vertical: &Path,
    dialect: GridDialect,
) -> Result<(), MapIoError> {
    let h = format_layer(grid, EdgeLayer::Horizontal, dialect)?;
    let v = format_layer(grid, EdgeLayer::Vertical, dialect)?;

    write_file(horizontal, &h)?;
    write_file(vertical, &v)?;

    log::info!(
        "Saved {} grid to {} and {}",
        dialect.name(),
        horizontal.display(),
        vertical.display()
    );
    Ok(())
}
