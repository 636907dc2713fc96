//! Notebook and worksheet containers.

use serde_json::{Map, Value};

use crate::cell::Cell;

/// A parsed notebook.
#[derive(Debug, Clone, PartialEq)]
pub struct Notebook {
    pub nbformat: u64,
    pub nbformat_minor: u64,
    pub metadata: Map<String, Value>,
    pub worksheets: Vec<Worksheet>,
}

/// Ordered group of cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Worksheet {
    pub cells: Vec<Cell>,
    pub extra: Map<String, Value>,
}

impl Notebook {
    /// Build a single-worksheet notebook from cells.
    #[must_use]
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Self {
            nbformat: 3,
            nbformat_minor: 0,
            metadata: Map::new(),
            worksheets: vec![Worksheet {
                cells,
                extra: Map::new(),
            }],
        }
    }

    /// Notebook name from `metadata.name`, if set and non-empty.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.metadata
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }

    /// All cells in document order, across worksheets.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.worksheets.iter().flat_map(|ws| ws.cells.iter())
    }
}

impl Worksheet {
    #[must_use]
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            extra: Map::new(),
        }
    }
}
