//! Notebook reader.
//!
//! Parses nbformat 3 JSON (notebooks with worksheets, heading cells and
//! `pyout`/`pyerr` outputs) into the [`Notebook`] model.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::cell::Cell;
use crate::error::{NotebookError, Result};
use crate::notebook::{Notebook, Worksheet};

/// Top-level shape of the file; cells are converted separately so errors can
/// name their position.
#[derive(Deserialize)]
struct RawNotebook {
    #[serde(default)]
    metadata: Map<String, Value>,
    nbformat: Option<u64>,
    #[serde(default)]
    nbformat_minor: u64,
    worksheets: Option<Vec<RawWorksheet>>,
}

#[derive(Deserialize)]
struct RawWorksheet {
    #[serde(default)]
    cells: Vec<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Read and parse a notebook file.
///
/// # Errors
///
/// Returns [`NotebookError::Io`] if the file cannot be read, or any parse error
/// from [`parse_notebook`].
pub fn read_notebook(path: impl AsRef<Path>) -> Result<Notebook> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| NotebookError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Read notebook");
    parse_notebook(&content)
}

/// Parse a notebook from JSON text.
///
/// # Errors
///
/// Returns an error if the text is not JSON, declares a version other than 3,
/// has no worksheets, or contains a malformed cell or output.
pub fn parse_notebook(content: &str) -> Result<Notebook> {
    let raw: RawNotebook = serde_json::from_str(content)?;

    let nbformat = raw.nbformat.unwrap_or(3);
    if nbformat != 3 {
        return Err(NotebookError::UnsupportedVersion {
            major: nbformat,
            minor: raw.nbformat_minor,
        });
    }

    let raw_worksheets = raw
        .worksheets
        .ok_or_else(|| NotebookError::InvalidFormat("notebook has no worksheets".to_owned()))?;
    if raw_worksheets.is_empty() {
        return Err(NotebookError::InvalidFormat(
            "notebook has no worksheets".to_owned(),
        ));
    }

    let worksheets = raw_worksheets
        .into_iter()
        .enumerate()
        .map(|(ws_index, ws)| {
            let cells = ws
                .cells
                .into_iter()
                .enumerate()
                .map(|(cell_index, value)| {
                    Cell::from_value(value).map_err(|e| {
                        NotebookError::InvalidFormat(format!(
                            "worksheet {ws_index}, cell {cell_index}: {e}"
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Worksheet {
                cells,
                extra: ws.extra,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Notebook {
        nbformat,
        nbformat_minor: raw.nbformat_minor,
        metadata: raw.metadata,
        worksheets,
    })
}
