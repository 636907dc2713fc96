//! LaTeX backend.

use nbc_notebook::{CodeCell, DisplayFormat, ErrorOutput, HeadingCell, RichOutput, TextCell};

use super::plain_traceback;
use crate::backend::{Backend, DocumentInfo, Lines, RenderContext};
use crate::dispatch::{render_outputs, render_preferred};
use crate::error::RenderError;
use crate::figure::Figure;
use crate::text::markup::{escape_latex, section_command, to_latex};

const PREAMBLE: &[&str] = &[
    r"\documentclass[11pt]{article}",
    r"\usepackage[T1]{fontenc}",
    r"\usepackage[utf8]{inputenc}",
    r"\usepackage{amsmath}",
    r"\usepackage{graphicx}",
    r"\usepackage{svg}",
    r"\usepackage{hyperref}",
];

/// Representations tried for results and display data, best first.
const PREFERENCE: [DisplayFormat; 6] = [
    DisplayFormat::Latex,
    DisplayFormat::Pdf,
    DisplayFormat::Png,
    DisplayFormat::Jpeg,
    DisplayFormat::Svg,
    DisplayFormat::Text,
];

/// Renders notebooks as a LaTeX article (`.tex`).
#[derive(Debug, Clone, Default)]
pub struct LatexBackend {
    raw_as_verbatim: bool,
}

impl LatexBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put raw cells in `verbatim` instead of passing them through as LaTeX.
    #[must_use]
    pub fn with_raw_as_verbatim(mut self, enabled: bool) -> Self {
        self.raw_as_verbatim = enabled;
        self
    }
}

fn verbatim(text: &str) -> Lines {
    vec![
        r"\begin{verbatim}".to_owned(),
        text.trim_end_matches('\n').to_owned(),
        r"\end{verbatim}".to_owned(),
    ]
}

impl Backend for LatexBackend {
    fn name(&self) -> &'static str {
        "latex"
    }

    fn extension(&self) -> &'static str {
        "tex"
    }

    fn optional_header(&self, info: &DocumentInfo<'_>) -> Lines {
        let title = info.notebook.name().unwrap_or(info.name);
        let mut lines: Lines = PREAMBLE.iter().map(|&line| line.to_owned()).collect();
        lines.extend([
            String::new(),
            format!(r"\title{{{}}}", escape_latex(title)),
            String::new(),
            r"\begin{document}".to_owned(),
            r"\maketitle".to_owned(),
            String::new(),
        ]);
        lines
    }

    fn optional_footer(&self, _info: &DocumentInfo<'_>) -> Lines {
        vec![String::new(), r"\end{document}".to_owned()]
    }

    fn render_heading(
        &mut self,
        cell: &HeadingCell,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        Ok(vec![
            format!(
                r"\{}{{{}}}",
                section_command(cell.level),
                escape_latex(&cell.source)
            ),
            String::new(),
        ])
    }

    fn render_code(
        &mut self,
        cell: &CodeCell,
        cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        if cell.input.is_empty() {
            return Ok(Vec::new());
        }
        let mut lines = verbatim(&cell.input);
        lines.extend(render_outputs(self, &cell.outputs, cx)?);
        lines.push(String::new());
        Ok(lines)
    }

    fn render_markdown(
        &mut self,
        cell: &TextCell,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        Ok(vec![to_latex(&cell.source), String::new()])
    }

    fn render_raw(
        &mut self,
        cell: &TextCell,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        let mut lines = if self.raw_as_verbatim {
            verbatim(&cell.source)
        } else {
            vec![cell.source.clone()]
        };
        lines.push(String::new());
        Ok(lines)
    }

    fn render_pyout(
        &mut self,
        output: &RichOutput,
        cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        render_preferred(self, &output.data, &PREFERENCE, cx)
    }

    fn render_pyerr(
        &mut self,
        output: &ErrorOutput,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        Ok(verbatim(&plain_traceback(output)))
    }

    fn render_display_data(
        &mut self,
        output: &RichOutput,
        cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        render_preferred(self, &output.data, &PREFERENCE, cx)
    }

    fn render_display_format_text(&mut self, data: &str) -> Result<Lines, RenderError> {
        Ok(verbatim(data))
    }

    fn render_display_format_html(&mut self, _data: &str) -> Result<Lines, RenderError> {
        Ok(Vec::new())
    }

    fn render_display_format_latex(&mut self, data: &str) -> Result<Lines, RenderError> {
        Ok(vec![data.to_owned()])
    }

    fn render_display_format_json(&mut self, _data: &str) -> Result<Lines, RenderError> {
        Ok(Vec::new())
    }

    fn render_display_format_javascript(&mut self, _data: &str) -> Result<Lines, RenderError> {
        Ok(Vec::new())
    }

    fn img_lines(&mut self, figure: &Figure) -> Result<Lines, RenderError> {
        let include = if figure.format == DisplayFormat::Svg {
            format!(r"\includesvg[width=0.7\linewidth]{{{}}}", figure.link)
        } else {
            format!(r"\includegraphics[width=0.7\linewidth]{{{}}}", figure.link)
        };
        Ok(vec![
            r"\begin{center}".to_owned(),
            include,
            r"\end{center}".to_owned(),
        ])
    }

    fn unknown_lines(&self, what: &str, dump: &str) -> Lines {
        let mut lines = vec![format!("% Warning: Unknown {what}")];
        lines.extend(verbatim(dump));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::FigureStore;
    use nbc_notebook::{MimeBundle, Notebook, Output};
    use pretty_assertions::assert_eq;
    use serde_json::Map;

    fn code(cell: &CodeCell) -> String {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut figures = FigureStore::new("nb", temp_dir.path().join("nb_files"));
        let mut warnings = Vec::new();
        let mut cx = RenderContext::new(&mut figures, &mut warnings);
        LatexBackend::new()
            .render_code(cell, &mut cx)
            .unwrap()
            .join("\n")
    }

    #[test]
    fn test_header_uses_notebook_name() {
        let mut notebook = Notebook::from_cells(Vec::new());
        notebook
            .metadata
            .insert("name".to_owned(), "Q&A".into());
        let header = LatexBackend::new().optional_header(&DocumentInfo {
            name: "file",
            notebook: &notebook,
        });
        assert!(header.contains(&r"\title{Q\&A}".to_owned()));
        assert_eq!(header.first().map(String::as_str), Some(r"\documentclass[11pt]{article}"));
    }

    #[test]
    fn test_heading_section_command() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut figures = FigureStore::new("nb", temp_dir.path().join("nb_files"));
        let mut warnings = Vec::new();
        let mut cx = RenderContext::new(&mut figures, &mut warnings);
        let lines = LatexBackend::new()
            .render_heading(&HeadingCell::new(2, "Costs in $"), &mut cx)
            .unwrap();
        assert_eq!(lines, vec![r"\subsection{Costs in \$}", ""]);
    }

    #[test]
    fn test_result_prefers_latex() {
        let cell = CodeCell::new("x**2").with_output(Output::Pyout(RichOutput {
            prompt_number: Some(1),
            data: MimeBundle::new()
                .with(DisplayFormat::Text, "x**2")
                .with(DisplayFormat::Latex, "$x^2$"),
            extra: Map::new(),
        }));
        assert_eq!(
            code(&cell),
            "\\begin{verbatim}\nx**2\n\\end{verbatim}\n$x^2$\n"
        );
    }

    #[test]
    fn test_svg_uses_includesvg() {
        let figure = Figure {
            path: "nb_files/nb_fig_00.svg".into(),
            link: "nb_files/nb_fig_00.svg".to_owned(),
            format: DisplayFormat::Svg,
        };
        let lines = LatexBackend::new().img_lines(&figure).unwrap();
        assert_eq!(lines[1], r"\includesvg[width=0.7\linewidth]{nb_files/nb_fig_00.svg}");
    }
}
