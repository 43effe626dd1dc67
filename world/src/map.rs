//! Background layer loading.
//!
//! The simulation treats the background as an opaque immutable layer. The
//! [`MapLoader`] trait is the seam adapters use to supply one; the bundled
//! [`TomlMapLoader`] reads a plain-text tile map.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;

use crate::{config::single_char, error::LoadError, grid_item::GridItem};

/// Tile legend entry.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TileSpec {
    /// Frame drawn for the tile.
    pub frame: String,
    /// Whether mobs can walk over the tile.
    #[serde(default = "passable_by_default")]
    pub passable: bool,
}

fn passable_by_default() -> bool {
    true
}

/// Immutable terrain layer of a grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    width: i32,
    height: i32,
    cells: Vec<Option<GridItem>>,
}

impl Background {
    /// Creates a background of the given size without any tiles.
    #[must_use]
    pub fn empty(width: u16, height: u16) -> Self {
        Self {
            width: i32::from(width),
            height: i32::from(height),
            cells: vec![None; usize::from(width) * usize::from(height)],
        }
    }

    /// Builds a background from rows of legend symbols, top row first.
    ///
    /// A space that the legend does not define leaves the cell empty.
    pub fn from_rows<S: AsRef<str>>(
        rows: &[S],
        legend: &BTreeMap<char, TileSpec>,
    ) -> Result<Self, LoadError> {
        let expected = rows
            .first()
            .map(|row| row.as_ref().chars().count())
            .unwrap_or(0);
        let width = u16::try_from(expected).map_err(|_| LoadError::RowWidth {
            row: 0,
            expected: usize::from(u16::MAX),
            found: expected,
        })?;
        let height = u16::try_from(rows.len()).map_err(|_| LoadError::RowCount {
            expected: usize::from(u16::MAX),
            found: rows.len(),
        })?;

        let mut cells = Vec::with_capacity(expected * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != expected {
                return Err(LoadError::RowWidth {
                    row,
                    expected,
                    found,
                });
            }
            for symbol in line.chars() {
                let tile = match legend.get(&symbol) {
                    Some(spec) => Some(GridItem::terrain(spec.frame.clone(), spec.passable)),
                    None if symbol == ' ' => None,
                    None => return Err(LoadError::UnknownTile { symbol }),
                };
                cells.push(tile);
            }
        }

        Ok(Self {
            width: i32::from(width),
            height: i32::from(height),
            cells,
        })
    }

    /// Width in cells.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    pub(crate) fn into_cells(self) -> Vec<Option<GridItem>> {
        self.cells
    }
}

/// Source of background layers.
pub trait MapLoader {
    /// Loads the background stored at `path`.
    fn load(&self, path: &Path) -> Result<Background, LoadError>;
}

/// Loads tile maps stored as TOML.
///
/// ```toml
/// width = 3
/// height = 2
/// rows = ["#.#", "..."]
///
/// [legend."#"]
/// frame = "tiles_07"
/// passable = false
///
/// [legend."."]
/// frame = "tiles_00"
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct TomlMapLoader;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MapFile {
    width: usize,
    height: usize,
    rows: Vec<String>,
    #[serde(default)]
    legend: BTreeMap<String, TileSpec>,
}

impl TomlMapLoader {
    /// Parses a map document that was already read into memory.
    pub fn parse(&self, path: &Path, contents: &str) -> Result<Background, LoadError> {
        let file: MapFile = toml::from_str(contents).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if file.rows.len() != file.height {
            return Err(LoadError::RowCount {
                expected: file.height,
                found: file.rows.len(),
            });
        }
        if let Some((row, line)) = file
            .rows
            .iter()
            .enumerate()
            .find(|(_, line)| line.chars().count() != file.width)
        {
            return Err(LoadError::RowWidth {
                row,
                expected: file.width,
                found: line.chars().count(),
            });
        }

        let mut legend = BTreeMap::new();
        for (symbol, spec) in file.legend {
            let _ = legend.insert(single_char(&symbol)?, spec);
        }
        Background::from_rows(&file.rows, &legend)
    }
}

impl MapLoader for TomlMapLoader {
    fn load(&self, path: &Path) -> Result<Background, LoadError> {
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(path, &contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = r##"
        width = 4
        height = 2
        rows = ["#.. ", "...#"]

        [legend."#"]
        frame = "tiles_07"
        passable = false

        [legend."."]
        frame = "tiles_01"
    "##;

    #[test]
    fn parses_rows_and_legend() {
        let background = TomlMapLoader
            .parse(Path::new("inline.toml"), MAP)
            .expect("map parses");
        assert_eq!(background.width(), 4);
        assert_eq!(background.height(), 2);

        let cells = background.into_cells();
        assert_eq!(cells.len(), 8);
        assert!(cells[0].as_ref().is_some_and(|tile| !tile.passable()));
        assert!(cells[1].as_ref().is_some_and(GridItem::passable));
        assert!(cells[3].is_none(), "undefined space leaves the cell empty");
    }

    #[test]
    fn empty_background_sizes_cells_at_the_widest_extent() {
        let background = Background::empty(u16::MAX, 2);
        assert_eq!(background.width(), i32::from(u16::MAX));
        assert_eq!(background.into_cells().len(), usize::from(u16::MAX) * 2);
    }

    #[test]
    fn rejects_row_count_mismatch() {
        let broken = MAP.replace("height = 2", "height = 3");
        assert!(matches!(
            TomlMapLoader.parse(Path::new("inline.toml"), &broken),
            Err(LoadError::RowCount {
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn rejects_unknown_symbols() {
        let broken = MAP.replace("\"...#\"", "\"..?#\"");
        assert!(matches!(
            TomlMapLoader.parse(Path::new("inline.toml"), &broken),
            Err(LoadError::UnknownTile { symbol: '?' })
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let error = TomlMapLoader
            .load(Path::new("does/not/exist.toml"))
            .expect_err("missing file fails");
        assert!(error.to_string().contains("does/not/exist.toml"));
    }
}
