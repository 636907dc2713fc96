//! Dispatch-based notebook renderer with pluggable format backends.
//!
//! A [`Converter`] walks a parsed notebook cell by cell and hands each cell to
//! a routine selected by its kind. Routines are provided by a [`Backend`], one
//! per output format:
//! - [`RstBackend`]: reStructuredText
//! - [`HtmlBackend`]: standalone HTML page
//! - [`LatexBackend`]: LaTeX article
//! - [`MarkdownBackend`]: Markdown
//! - [`PyBackend`]: Python script
//! - [`NotebookBackend`]: canonical `.ipynb` JSON
//!
//! Image representations are extracted by the [`FigureStore`] into a
//! `{input_base}_files/` directory next to the input, and the backend embeds a
//! relative link to each file.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use nbc_renderer::{ConvertOptions, OutputFormat, convert_file};
//!
//! let summary = convert_file(
//!     Path::new("analysis.ipynb"),
//!     OutputFormat::Markdown,
//!     &ConvertOptions::default(),
//! )?;
//! assert!(summary.output_path.ends_with("analysis.md"));
//! # Ok::<(), nbc_renderer::ConvertError>(())
//! ```

mod backend;
mod converter;
pub mod dispatch;
mod encoding;
mod error;
mod figure;
mod format;
mod formats;
pub mod text;

pub use backend::{Backend, DocumentInfo, Lines, RenderContext};
pub use converter::Converter;
pub use encoding::TextEncoding;
pub use error::{ConvertError, RenderError};
pub use figure::{Figure, FigureError, FigureStore};
pub use format::{ConvertOptions, ConvertSummary, OutputFormat, convert_file};
pub use formats::{
    DEFAULT_MATHJAX_URL, HtmlBackend, LatexBackend, MarkdownBackend, MarkdownOptions,
    NotebookBackend, PyBackend, PyOptions, RstBackend,
};
