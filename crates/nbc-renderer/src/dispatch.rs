//! Two-level dispatch from document structure to backend routines.
//!
//! Cells are dispatched on [`CellKind`], outputs on [`OutputKind`] and
//! representations on [`DisplayFormat`]. Each mapping is total: kinds and
//! formats without a routine go to an unknown handler that logs a warning and
//! renders a placeholder instead of failing.

use nbc_notebook::transform::coalesce_streams;
use nbc_notebook::{Cell, CellKind, DisplayFormat, MimeBundle, Output, OutputKind};
use serde::Serialize;

use crate::backend::{Backend, Lines, RenderContext};
use crate::error::RenderError;

/// Routine rendering one cell.
pub type CellRoutine<B> = fn(&mut B, &Cell, &mut RenderContext<'_>) -> Result<Lines, RenderError>;

/// Routine rendering one output.
pub type OutputRoutine<B> =
    fn(&mut B, &Output, &mut RenderContext<'_>) -> Result<Lines, RenderError>;

/// Routine rendering one representation of an output.
pub type DisplayRoutine<B> =
    fn(&mut B, &DisplayFormat, &str, &mut RenderContext<'_>) -> Result<Lines, RenderError>;

/// Select the routine for a cell kind.
///
/// Unknown kinds, and kinds the backend opts out of through
/// [`Backend::renders_cell`], map to [`render_unknown`].
pub fn dispatch<B: Backend>(backend: &B, kind: &CellKind) -> CellRoutine<B> {
    if !backend.renders_cell(kind) {
        return render_unknown::<B>;
    }
    match kind {
        CellKind::Heading => heading_cell::<B>,
        CellKind::Markdown => markdown_cell::<B>,
        CellKind::Code => code_cell::<B>,
        CellKind::Raw => raw_cell::<B>,
        CellKind::Other(_) => render_unknown::<B>,
    }
}

/// Render a cell through [`dispatch`].
pub fn render_cell<B: Backend>(
    backend: &mut B,
    cell: &Cell,
    cx: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    let routine = dispatch(backend, &cell.kind());
    routine(backend, cell, cx)
}

/// Placeholder for a cell without a routine. Never fails.
pub fn render_unknown<B: Backend>(
    backend: &mut B,
    cell: &Cell,
    cx: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    let kind = cell.kind();
    tracing::warn!(kind = %kind, backend = backend.name(), "Unknown cell");
    cx.warn(format!("Unknown cell: {kind}"));
    let dump = dump(cell);
    Ok(backend.unknown_lines(&format!("cell {kind}"), &dump))
}

fn heading_cell<B: Backend>(
    b: &mut B,
    cell: &Cell,
    cx: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    match cell {
        Cell::Heading(heading) => b.render_heading(heading, cx),
        other => render_unknown(b, other, cx),
    }
}

fn markdown_cell<B: Backend>(
    b: &mut B,
    cell: &Cell,
    cx: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    match cell {
        Cell::Markdown(text) => b.render_markdown(text, cx),
        other => render_unknown(b, other, cx),
    }
}

fn code_cell<B: Backend>(
    b: &mut B,
    cell: &Cell,
    cx: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    match cell {
        Cell::Code(code) => b.render_code(code, cx),
        other => render_unknown(b, other, cx),
    }
}

fn raw_cell<B: Backend>(
    b: &mut B,
    cell: &Cell,
    cx: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    match cell {
        Cell::Raw(text) => b.render_raw(text, cx),
        other => render_unknown(b, other, cx),
    }
}

/// Select the routine for an output kind.
#[must_use]
pub fn dispatch_output<B: Backend>(kind: &OutputKind) -> OutputRoutine<B> {
    match kind {
        OutputKind::Stream => stream_output::<B>,
        OutputKind::Pyout => pyout_output::<B>,
        OutputKind::Pyerr => pyerr_output::<B>,
        OutputKind::DisplayData => display_data_output::<B>,
        OutputKind::Other(_) => render_unknown_output::<B>,
    }
}

/// Render one output and wrap it with [`Backend::wrap_output`].
///
/// Outputs that render to nothing are not wrapped.
pub fn render_output<B: Backend>(
    backend: &mut B,
    output: &Output,
    cx: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    let routine = dispatch_output::<B>(&output.kind());
    let lines = routine(backend, output, cx)?;
    if lines.is_empty() {
        return Ok(lines);
    }
    Ok(backend.wrap_output(output, lines))
}

/// Render a code cell's outputs in order, after merging adjacent streams.
pub fn render_outputs<B: Backend>(
    backend: &mut B,
    outputs: &[Output],
    cx: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    let mut lines = Vec::new();
    for output in coalesce_streams(outputs) {
        lines.extend(render_output(backend, &output, cx)?);
    }
    Ok(lines)
}

/// Placeholder for an output without a routine. Never fails.
pub fn render_unknown_output<B: Backend>(
    backend: &mut B,
    output: &Output,
    cx: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    let kind = output.kind();
    tracing::warn!(kind = %kind, backend = backend.name(), "Unknown output");
    cx.warn(format!("Unknown output: {kind}"));
    let dump = dump(output);
    Ok(backend.unknown_lines(&format!("output {kind}"), &dump))
}

fn stream_output<B: Backend>(
    b: &mut B,
    output: &Output,
    cx: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    match output {
        Output::Stream(stream) => b.render_stream(stream, cx),
        other => render_unknown_output(b, other, cx),
    }
}

fn pyout_output<B: Backend>(
    b: &mut B,
    output: &Output,
    cx: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    match output {
        Output::Pyout(result) => b.render_pyout(result, cx),
        other => render_unknown_output(b, other, cx),
    }
}

fn pyerr_output<B: Backend>(
    b: &mut B,
    output: &Output,
    cx: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    match output {
        Output::Pyerr(error) => b.render_pyerr(error, cx),
        other => render_unknown_output(b, other, cx),
    }
}

fn display_data_output<B: Backend>(
    b: &mut B,
    output: &Output,
    cx: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    match output {
        Output::DisplayData(data) => b.render_display_data(data, cx),
        other => render_unknown_output(b, other, cx),
    }
}

/// Select the routine for a representation.
///
/// Image-like formats always go to the figure store, whatever the backend.
#[must_use]
pub fn dispatch_display_format<B: Backend>(format: &DisplayFormat) -> DisplayRoutine<B> {
    match format {
        format if format.is_figure() => render_figure::<B>,
        DisplayFormat::Text => display_text::<B>,
        DisplayFormat::Html => display_html::<B>,
        DisplayFormat::Latex => display_latex::<B>,
        DisplayFormat::Json => display_json::<B>,
        DisplayFormat::Javascript => display_javascript::<B>,
        _ => render_unknown_display::<B>,
    }
}

/// Render one representation through [`dispatch_display_format`].
pub fn render_display_format<B: Backend>(
    backend: &mut B,
    format: &DisplayFormat,
    data: &str,
    cx: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    let routine = dispatch_display_format::<B>(format);
    routine(backend, format, data, cx)
}

/// Render every representation in the bundle, in [`DisplayFormat`] order.
pub fn render_all_formats<B: Backend>(
    backend: &mut B,
    bundle: &MimeBundle,
    cx: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    let mut lines = Vec::new();
    for (format, data) in bundle.iter() {
        lines.extend(render_display_format(backend, format, data, cx)?);
    }
    Ok(lines)
}

/// Render only the first representation of `preference` the bundle carries.
///
/// Returns no lines when none is present.
pub fn render_preferred<B: Backend>(
    backend: &mut B,
    bundle: &MimeBundle,
    preference: &[DisplayFormat],
    cx: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    match bundle.first_of(preference) {
        Some(format) => {
            let data = bundle.get(format).unwrap_or_default();
            render_display_format(backend, format, data, cx)
        }
        None => Ok(Vec::new()),
    }
}

/// Placeholder for a representation without a routine. Never fails.
pub fn render_unknown_display<B: Backend>(
    backend: &mut B,
    format: &DisplayFormat,
    data: &str,
    cx: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    tracing::warn!(format = %format, backend = backend.name(), "Unknown display format");
    cx.warn(format!("Unknown display format: {format}"));
    Ok(backend.unknown_lines(&format!("display format {format}"), data))
}

fn render_figure<B: Backend>(
    b: &mut B,
    format: &DisplayFormat,
    data: &str,
    cx: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    let figure = cx.figures().new_figure(data, format)?;
    b.img_lines(&figure)
}

fn display_text<B: Backend>(
    b: &mut B,
    _: &DisplayFormat,
    data: &str,
    _: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    b.render_display_format_text(data)
}

fn display_html<B: Backend>(
    b: &mut B,
    _: &DisplayFormat,
    data: &str,
    _: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    b.render_display_format_html(data)
}

fn display_latex<B: Backend>(
    b: &mut B,
    _: &DisplayFormat,
    data: &str,
    _: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    b.render_display_format_latex(data)
}

fn display_json<B: Backend>(
    b: &mut B,
    _: &DisplayFormat,
    data: &str,
    _: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    b.render_display_format_json(data)
}

fn display_javascript<B: Backend>(
    b: &mut B,
    _: &DisplayFormat,
    data: &str,
    _: &mut RenderContext<'_>,
) -> Result<Lines, RenderError> {
    b.render_display_format_javascript(data)
}

/// Pretty-printed JSON of a cell or output, for unknown placeholders.
/// Pretty JSON with sorted keys.
fn dump(item: &impl Serialize) -> String {
    serde_json::to_value(item)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|e| format!("<{e}>"))
}
