//! Backend trait for format-specific rendering.
//!
//! A backend supplies the routines the dispatchers in [`crate::dispatch`]
//! select between. Routines return content lines; the conversion engine joins
//! them into one block per cell.
//!
//! # Required routines
//!
//! Every backend renders the four known cell kinds ([`render_heading`],
//! [`render_code`], [`render_markdown`], [`render_raw`]). Output and
//! display-format routines have defaults that fail with
//! [`RenderError::Unimplemented`], so a backend only implements what it can
//! receive. Receiving something it did not implement fails the run.
//!
//! [`render_heading`]: Backend::render_heading
//! [`render_code`]: Backend::render_code
//! [`render_markdown`]: Backend::render_markdown
//! [`render_raw`]: Backend::render_raw

use nbc_notebook::{
    CellKind, CodeCell, ErrorOutput, HeadingCell, Notebook, Output, RichOutput, StreamOutput,
    TextCell,
};

use crate::dispatch;
use crate::error::RenderError;
use crate::figure::{Figure, FigureStore};

/// Rendered lines for one cell or output.
pub type Lines = Vec<String>;

/// Document-level information available to headers and footers.
#[derive(Debug, Clone, Copy)]
pub struct DocumentInfo<'a> {
    /// Base name of the document (input file name without extension).
    pub name: &'a str,
    pub notebook: &'a Notebook,
}

/// Mutable state shared with render routines during one conversion run.
pub struct RenderContext<'a> {
    figures: &'a mut FigureStore,
    warnings: &'a mut Vec<String>,
}

impl<'a> RenderContext<'a> {
    pub fn new(figures: &'a mut FigureStore, warnings: &'a mut Vec<String>) -> Self {
        Self { figures, warnings }
    }

    /// Figure store of the current run.
    pub fn figures(&mut self) -> &mut FigureStore {
        self.figures
    }

    /// Record a non-fatal problem. Warnings never fail the run.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Format-specific rendering routines.
///
/// Routines take `&mut self` so backends can keep counters and options as
/// instance state.
pub trait Backend: Sized {
    /// Short name used in logs and errors (e.g. `"rst"`).
    fn name(&self) -> &'static str;

    /// File extension of the generated document, without the dot.
    fn extension(&self) -> &'static str;

    /// Separator placed between rendered cell blocks.
    fn cell_separator(&self) -> &'static str {
        "\n"
    }

    /// Lines placed before the first cell.
    fn optional_header(&self, info: &DocumentInfo<'_>) -> Lines {
        let _ = info;
        Vec::new()
    }

    /// Lines placed after the last cell.
    fn optional_footer(&self, info: &DocumentInfo<'_>) -> Lines {
        let _ = info;
        Vec::new()
    }

    /// Post-process the assembled document.
    fn finish(&self, document: String) -> Result<String, RenderError> {
        Ok(document)
    }

    /// Whether extracted figures are kept next to the output. Backends that
    /// embed payloads inline return `false` and the figure directory is
    /// removed after conversion.
    fn uses_figures(&self) -> bool {
        true
    }

    /// Whether the backend renders cells of `kind` with its own routine.
    /// Returning `false` routes the kind to the unknown-cell handler.
    fn renders_cell(&self, kind: &CellKind) -> bool {
        let _ = kind;
        true
    }

    fn render_heading(
        &mut self,
        cell: &HeadingCell,
        cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError>;

    fn render_code(
        &mut self,
        cell: &CodeCell,
        cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError>;

    fn render_markdown(
        &mut self,
        cell: &TextCell,
        cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError>;

    fn render_raw(
        &mut self,
        cell: &TextCell,
        cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError>;

    /// Stream text; rendered like a `text` representation by default.
    fn render_stream(
        &mut self,
        output: &StreamOutput,
        cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        let _ = cx;
        self.render_display_format_text(&output.text)
    }

    fn render_pyout(
        &mut self,
        output: &RichOutput,
        cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        let _ = (output, cx);
        Err(RenderError::unimplemented(self.name(), "pyout"))
    }

    fn render_pyerr(
        &mut self,
        output: &ErrorOutput,
        cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        let _ = (output, cx);
        Err(RenderError::unimplemented(self.name(), "pyerr"))
    }

    /// Display data; every carried representation is rendered by default.
    fn render_display_data(
        &mut self,
        output: &RichOutput,
        cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        dispatch::render_all_formats(self, &output.data, cx)
    }

    /// Wrap the lines rendered for one output in container markup.
    fn wrap_output(&self, output: &Output, lines: Lines) -> Lines {
        let _ = output;
        lines
    }

    fn render_display_format_text(&mut self, data: &str) -> Result<Lines, RenderError> {
        let _ = data;
        Err(RenderError::unimplemented(self.name(), "text"))
    }

    fn render_display_format_html(&mut self, data: &str) -> Result<Lines, RenderError> {
        let _ = data;
        Err(RenderError::unimplemented(self.name(), "html"))
    }

    fn render_display_format_latex(&mut self, data: &str) -> Result<Lines, RenderError> {
        let _ = data;
        Err(RenderError::unimplemented(self.name(), "latex"))
    }

    fn render_display_format_json(&mut self, data: &str) -> Result<Lines, RenderError> {
        let _ = data;
        Err(RenderError::unimplemented(self.name(), "json"))
    }

    fn render_display_format_javascript(&mut self, data: &str) -> Result<Lines, RenderError> {
        let _ = data;
        Err(RenderError::unimplemented(self.name(), "javascript"))
    }

    /// Lines that embed an extracted figure.
    fn img_lines(&mut self, figure: &Figure) -> Result<Lines, RenderError> {
        let _ = figure;
        Err(RenderError::unimplemented(self.name(), "images"))
    }

    /// Visible placeholder for content the backend cannot render.
    ///
    /// `what` names the content (e.g. `cell widget`), `dump` is its raw
    /// structure.
    fn unknown_lines(&self, what: &str, dump: &str) -> Lines {
        vec![format!("Warning: Unknown {what}"), dump.to_owned()]
    }
}
