//! reStructuredText backend.

use nbc_notebook::{CodeCell, DisplayFormat, ErrorOutput, HeadingCell, RichOutput, TextCell};

use super::{language, plain_traceback, prompt, rst_directive};
use crate::backend::{Backend, Lines, RenderContext};
use crate::dispatch::render_outputs;
use crate::error::RenderError;
use crate::figure::Figure;
use crate::text::indent;
use crate::text::markup::{to_rst, underline_heading};

/// Renders notebooks as reStructuredText (`.rst`).
///
/// Code goes into `.. code::` directives, results into `.. parsed-literal::`
/// and `.. math::`, figures into `.. image::`.
#[derive(Debug, Clone, Default)]
pub struct RstBackend {
    raw_as_verbatim: bool,
}

impl RstBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render raw cells as literal blocks instead of passing them through.
    #[must_use]
    pub fn with_raw_as_verbatim(mut self, enabled: bool) -> Self {
        self.raw_as_verbatim = enabled;
        self
    }
}

impl Backend for RstBackend {
    fn name(&self) -> &'static str {
        "rst"
    }

    fn extension(&self) -> &'static str {
        "rst"
    }

    fn render_heading(
        &mut self,
        cell: &HeadingCell,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        Ok(vec![format!(
            "{}\n",
            underline_heading(cell.level, &cell.source)
        )])
    }

    fn render_code(
        &mut self,
        cell: &CodeCell,
        cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        if cell.input.is_empty() {
            return Ok(Vec::new());
        }
        let mut lines = vec![format!("In[{}]:", prompt(cell.prompt_number)), String::new()];
        lines.extend(rst_directive(
            &format!(".. code:: {}", language(cell)),
            &cell.input,
        ));
        lines.extend(render_outputs(self, &cell.outputs, cx)?);
        Ok(lines)
    }

    fn render_markdown(
        &mut self,
        cell: &TextCell,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        Ok(vec![to_rst(&cell.source)])
    }

    fn render_raw(
        &mut self,
        cell: &TextCell,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        if self.raw_as_verbatim {
            Ok(vec![
                "::".to_owned(),
                String::new(),
                indent(&cell.source, 4),
                String::new(),
            ])
        } else {
            Ok(vec![cell.source.clone()])
        }
    }

    fn render_pyout(
        &mut self,
        output: &RichOutput,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        let mut lines = vec![format!("Out[{}]:", prompt(output.prompt_number)), String::new()];
        if let Some(latex) = output.data.get(&DisplayFormat::Latex) {
            lines.extend(rst_directive(".. math::", latex));
        }
        if let Some(text) = output.data.text() {
            lines.extend(rst_directive(".. parsed-literal::", text));
        }
        Ok(lines)
    }

    fn render_pyerr(
        &mut self,
        output: &ErrorOutput,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        Ok(vec![
            "::".to_owned(),
            String::new(),
            indent(&plain_traceback(output), 4),
            String::new(),
        ])
    }

    fn img_lines(&mut self, figure: &Figure) -> Result<Lines, RenderError> {
        Ok(vec![format!(".. image:: {}", figure.link), String::new()])
    }

    fn render_display_format_text(&mut self, data: &str) -> Result<Lines, RenderError> {
        Ok(rst_directive(".. parsed-literal::", data))
    }

    fn render_display_format_html(&mut self, data: &str) -> Result<Lines, RenderError> {
        Ok(rst_directive(".. raw:: html", data))
    }

    fn render_display_format_latex(&mut self, data: &str) -> Result<Lines, RenderError> {
        Ok(rst_directive(".. math::", data))
    }

    fn render_display_format_json(&mut self, data: &str) -> Result<Lines, RenderError> {
        Ok(rst_directive(".. raw:: json", data))
    }

    fn render_display_format_javascript(&mut self, data: &str) -> Result<Lines, RenderError> {
        Ok(rst_directive(".. raw:: javascript", data))
    }

    fn unknown_lines(&self, what: &str, dump: &str) -> Lines {
        let mut lines = rst_directive(&format!(".. warning:: Unknown {what}"), "");
        lines.extend(["::".to_owned(), String::new(), indent(dump, 4), String::new()]);
        lines
    }
}
