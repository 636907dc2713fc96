//! Python script backend.
//!
//! Code cells become script statements; everything else becomes comments, so
//! the output stays runnable.

use nbc_notebook::{CodeCell, ErrorOutput, HeadingCell, RichOutput, TextCell};

use super::{plain_traceback, prompt};
use crate::backend::{Backend, Lines, RenderContext};
use crate::dispatch::render_outputs;
use crate::error::RenderError;
use crate::figure::Figure;
use crate::text::{comment, indent};

/// Presentation switches for [`PyBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PyOptions {
    /// Emit `# In[n]:`/`# Out[n]:` labels.
    pub show_prompts: bool,
    /// Include outputs as comments.
    pub show_output: bool,
}

impl Default for PyOptions {
    fn default() -> Self {
        Self {
            show_prompts: true,
            show_output: true,
        }
    }
}

/// Renders notebooks as a Python script (`.py`).
#[derive(Debug, Clone, Default)]
pub struct PyBackend {
    options: PyOptions,
    raw_as_verbatim: bool,
}

impl PyBackend {
    #[must_use]
    pub fn new(options: PyOptions) -> Self {
        Self {
            options,
            raw_as_verbatim: false,
        }
    }

    /// Indent raw cells inside their comment block.
    #[must_use]
    pub fn with_raw_as_verbatim(mut self, enabled: bool) -> Self {
        self.raw_as_verbatim = enabled;
        self
    }
}

impl Backend for PyBackend {
    fn name(&self) -> &'static str {
        "py"
    }

    fn extension(&self) -> &'static str {
        "py"
    }

    fn render_heading(
        &mut self,
        cell: &HeadingCell,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        let marker = "#".repeat(usize::from(cell.level));
        Ok(vec![format!("#{marker} {}", cell.source), String::new()])
    }

    fn render_code(
        &mut self,
        cell: &CodeCell,
        cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        if cell.input.is_empty() {
            return Ok(Vec::new());
        }
        let mut lines = Vec::new();
        if self.options.show_prompts {
            lines.push(format!("# In[{}]:", prompt(cell.prompt_number)));
        }
        lines.push(cell.input.clone());
        lines.push(String::new());

        if self.options.show_output {
            if self.options.show_prompts && !cell.outputs.is_empty() {
                lines.push(format!("# Out[{}]:", prompt(cell.prompt_number)));
            }
            lines.extend(render_outputs(self, &cell.outputs, cx)?);
        }
        Ok(lines)
    }

    fn render_markdown(
        &mut self,
        cell: &TextCell,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        Ok(vec![comment(&cell.source), String::new()])
    }

    fn render_raw(
        &mut self,
        cell: &TextCell,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        let source = if self.raw_as_verbatim {
            comment(&indent(&cell.source, 4))
        } else {
            comment(&cell.source)
        };
        Ok(vec![source, String::new()])
    }

    fn render_pyout(
        &mut self,
        output: &RichOutput,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        let mut lines = Vec::new();
        if let Some(text) = output.data.text() {
            lines.push(comment(&indent(text, 4)));
            lines.push(String::new());
        }
        lines.push(String::new());
        Ok(lines)
    }

    fn render_pyerr(
        &mut self,
        output: &ErrorOutput,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        Ok(vec![
            comment(&indent(&plain_traceback(output), 4)),
            String::new(),
        ])
    }

    fn img_lines(&mut self, figure: &Figure) -> Result<Lines, RenderError> {
        Ok(vec![
            comment(&format!("image file: {}", figure.link)),
            String::new(),
        ])
    }

    fn render_display_format_text(&mut self, data: &str) -> Result<Lines, RenderError> {
        Ok(vec![comment(&indent(data, 4))])
    }

    fn render_display_format_html(&mut self, data: &str) -> Result<Lines, RenderError> {
        Ok(vec![comment(data)])
    }

    fn render_display_format_latex(&mut self, _data: &str) -> Result<Lines, RenderError> {
        Ok(Vec::new())
    }

    fn render_display_format_json(&mut self, _data: &str) -> Result<Lines, RenderError> {
        Ok(Vec::new())
    }

    fn render_display_format_javascript(&mut self, _data: &str) -> Result<Lines, RenderError> {
        Ok(Vec::new())
    }

    fn unknown_lines(&self, what: &str, dump: &str) -> Lines {
        vec![comment(&format!("Warning: Unknown {what}\n{dump}"))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::FigureStore;
    use nbc_notebook::{DisplayFormat, MimeBundle, Output};
    use pretty_assertions::assert_eq;
    use serde_json::Map;

    const PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

    fn plot_cell() -> CodeCell {
        CodeCell::new("plot()")
            .with_prompt_number(5)
            .with_output(Output::DisplayData(RichOutput {
                prompt_number: None,
                data: MimeBundle::new()
                    .with(DisplayFormat::Text, "<Figure>")
                    .with(DisplayFormat::Png, PNG),
                extra: Map::new(),
            }))
    }

    fn code(backend: &mut PyBackend, cell: &CodeCell) -> (String, usize) {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut figures = FigureStore::new("nb", temp_dir.path().join("nb_files"));
        let mut warnings = Vec::new();
        let mut cx = RenderContext::new(&mut figures, &mut warnings);
        let text = backend.render_code(cell, &mut cx).unwrap().join("\n");
        (text, figures.count())
    }

    #[test]
    fn test_heading_is_comment() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut figures = FigureStore::new("nb", temp_dir.path().join("nb_files"));
        let mut warnings = Vec::new();
        let mut cx = RenderContext::new(&mut figures, &mut warnings);
        let lines = PyBackend::default()
            .render_heading(&HeadingCell::new(1, "Intro"), &mut cx)
            .unwrap();
        assert_eq!(lines, vec!["## Intro", ""]);
    }

    #[test]
    fn test_display_data_as_comments() {
        let (text, figures) = code(&mut PyBackend::default(), &plot_cell());
        assert_eq!(
            text,
            "# In[5]:\nplot()\n\n# Out[5]:\n#     <Figure>\n# image file: nb_files/nb_fig_00.png\n"
        );
        assert_eq!(figures, 1);
    }

    #[test]
    fn test_outputs_hidden() {
        let options = PyOptions {
            show_output: false,
            ..PyOptions::default()
        };
        let (text, figures) = code(&mut PyBackend::new(options), &plot_cell());
        assert_eq!(text, "# In[5]:\nplot()\n");
        assert_eq!(figures, 0);
    }

    #[test]
    fn test_traceback_commented() {
        let error = ErrorOutput {
            ename: "NameError".to_owned(),
            evalue: "x".to_owned(),
            traceback: vec!["\x1b[31mNameError\x1b[0m".to_owned(), "x".to_owned()],
            extra: Map::new(),
        };
        let temp_dir = tempfile::tempdir().unwrap();
        let mut figures = FigureStore::new("nb", temp_dir.path().join("nb_files"));
        let mut warnings = Vec::new();
        let mut cx = RenderContext::new(&mut figures, &mut warnings);
        let lines = PyBackend::default().render_pyerr(&error, &mut cx).unwrap();
        assert_eq!(lines, vec!["#     NameError\n#     x", ""]);
    }

    #[test]
    fn test_unknown_lines_commented() {
        let lines = PyBackend::default().unknown_lines("cell widget", "{\n \"a\": 1\n}");
        assert_eq!(lines, vec!["# Warning: Unknown cell widget\n# {\n#  \"a\": 1\n# }"]);
    }
}
