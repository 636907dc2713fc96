//! Error types for rendering and conversion.

use std::path::PathBuf;

use nbc_notebook::NotebookError;

use crate::figure::FigureError;

/// Error raised while rendering a single cell or output.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Backend received a cell, output or display format it has no routine for.
    #[error("{backend} backend does not implement {routine}")]
    Unimplemented {
        backend: &'static str,
        routine: &'static str,
    },

    /// Figure could not be extracted.
    #[error(transparent)]
    Figure(#[from] FigureError),

    /// Backend produced a document envelope that is not valid JSON.
    #[error("Rendered notebook is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl RenderError {
    pub(crate) fn unimplemented(backend: &'static str, routine: &'static str) -> Self {
        Self::Unimplemented { backend, routine }
    }
}

/// Error returned by a conversion run.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Read(#[from] NotebookError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Figure(#[from] FigureError),

    /// Output file could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stylesheet given to the HTML backend could not be read.
    #[error("Failed to read stylesheet {}: {source}", path.display())]
    Stylesheet {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output text contains a character the target encoding cannot represent.
    #[error("Cannot encode output as {encoding}: character {ch:?} is not representable")]
    Encode { encoding: &'static str, ch: char },

    /// Encoding name is not supported.
    #[error("Unsupported encoding '{0}', supported encodings are: utf-8, latin-1, ascii")]
    UnsupportedEncoding(String),

    /// Output format name is not known.
    #[error("Unknown format '{0}', known formats are: rst, html, latex, markdown, py")]
    UnknownFormat(String),
}
