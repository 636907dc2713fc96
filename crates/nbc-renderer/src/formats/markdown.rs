//! Markdown backend.

use nbc_notebook::{CodeCell, ErrorOutput, HeadingCell, RichOutput, TextCell};

use super::{language, plain_traceback, prompt};
use crate::backend::{Backend, Lines, RenderContext};
use crate::dispatch::render_outputs;
use crate::error::RenderError;
use crate::figure::Figure;
use crate::text::indent;

/// Presentation switches for [`MarkdownBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Fence code with a language tag instead of indenting it.
    pub highlight_source: bool,
    /// Emit `*In[n]:*`/`*Out[n]:*` labels.
    pub show_prompts: bool,
    /// Put the input prompt on the first source line.
    pub inline_prompt: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            highlight_source: true,
            show_prompts: false,
            inline_prompt: false,
        }
    }
}

/// Renders notebooks as Markdown (`.md`).
#[derive(Debug, Clone, Default)]
pub struct MarkdownBackend {
    options: MarkdownOptions,
    raw_as_verbatim: bool,
}

impl MarkdownBackend {
    #[must_use]
    pub fn new(options: MarkdownOptions) -> Self {
        Self {
            options,
            raw_as_verbatim: false,
        }
    }

    /// Indent raw cells as code instead of passing them through.
    #[must_use]
    pub fn with_raw_as_verbatim(mut self, enabled: bool) -> Self {
        self.raw_as_verbatim = enabled;
        self
    }

    fn source_block(&self, cell: &CodeCell) -> String {
        if self.options.inline_prompt {
            let label = format!("In[{}]: ", prompt(cell.prompt_number));
            let (first, rest) = cell
                .input
                .split_once('\n')
                .unwrap_or((cell.input.as_str(), ""));
            let mut block = format!("{label}{first}");
            if !rest.is_empty() {
                block.push('\n');
                block.push_str(&indent(rest, label.len()));
            }
            indent(&block, 4)
        } else if self.options.highlight_source {
            format!("```{}\n{}\n```", language(cell), cell.input)
        } else {
            indent(&cell.input, 4)
        }
    }
}

impl Backend for MarkdownBackend {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn extension(&self) -> &'static str {
        "md"
    }

    fn render_heading(
        &mut self,
        cell: &HeadingCell,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        let marker = "#".repeat(usize::from(cell.level));
        Ok(vec![format!("{marker} {}", cell.source), String::new()])
    }

    fn render_code(
        &mut self,
        cell: &CodeCell,
        cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        if cell.input.is_empty() {
            return Ok(Vec::new());
        }
        let labeled = self.options.show_prompts && !self.options.inline_prompt;

        let mut lines = Vec::new();
        if labeled {
            lines.push(format!("*In[{}]:*", prompt(cell.prompt_number)));
            lines.push(String::new());
        }
        lines.push(self.source_block(cell));
        lines.push(String::new());

        if labeled && !cell.outputs.is_empty() {
            lines.push(format!("*Out[{}]:*", prompt(cell.prompt_number)));
            lines.push(String::new());
        }
        lines.extend(render_outputs(self, &cell.outputs, cx)?);
        lines.push(String::new());
        Ok(lines)
    }

    fn render_markdown(
        &mut self,
        cell: &TextCell,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        Ok(vec![cell.source.clone(), String::new()])
    }

    fn render_raw(
        &mut self,
        cell: &TextCell,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        let source = if self.raw_as_verbatim {
            indent(&cell.source, 4)
        } else {
            cell.source.clone()
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
            lines.extend(["<pre>".to_owned(), indent(text, 4), "</pre>".to_owned()]);
        }
        lines.push(String::new());
        Ok(lines)
    }

    fn render_pyerr(
        &mut self,
        output: &ErrorOutput,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        Ok(vec![indent(&plain_traceback(output), 4), String::new()])
    }

    fn img_lines(&mut self, figure: &Figure) -> Result<Lines, RenderError> {
        Ok(vec![
            String::new(),
            format!("![]({})", figure.link),
            String::new(),
        ])
    }

    fn render_display_format_text(&mut self, data: &str) -> Result<Lines, RenderError> {
        Ok(vec![indent(data, 4)])
    }

    fn render_display_format_html(&mut self, data: &str) -> Result<Lines, RenderError> {
        Ok(vec![data.to_owned()])
    }

    fn render_display_format_latex(&mut self, data: &str) -> Result<Lines, RenderError> {
        Ok(vec!["LaTeX::".to_owned(), indent(data, 4)])
    }

    fn render_display_format_json(&mut self, data: &str) -> Result<Lines, RenderError> {
        Ok(vec!["JSON:".to_owned(), indent(data, 4)])
    }

    fn render_display_format_javascript(&mut self, data: &str) -> Result<Lines, RenderError> {
        Ok(vec!["JavaScript:".to_owned(), indent(data, 4)])
    }
}
