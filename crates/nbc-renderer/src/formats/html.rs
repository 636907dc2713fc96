//! Standalone HTML backend.

use nbc_notebook::{
    CodeCell, DisplayFormat, ErrorOutput, HeadingCell, Output, RichOutput, StreamOutput, TextCell,
};

use super::language;
use crate::backend::{Backend, DocumentInfo, Lines, RenderContext};
use crate::dispatch::{render_outputs, render_preferred};
use crate::error::RenderError;
use crate::figure::Figure;
use crate::text::ansi::ansi_to_html;
use crate::text::escape_html;
use crate::text::highlight::{Highlighter, PlainHighlighter};
use crate::text::markup::to_html;

/// MathJax build loaded by generated pages.
pub const DEFAULT_MATHJAX_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/mathjax/2.7.9/MathJax.js?config=TeX-AMS_HTML";

const MATHJAX_CONFIG: &str = r"MathJax.Hub.Config({
    tex2jax: {
        inlineMath: [['$','$'], ['\\(','\\)']],
        displayMath: [['$$','$$'], ['\\[','\\]']],
        processEscapes: true
    },
    displayAlign: 'left'
});";

/// Representations tried for results and display data, best first.
const PREFERENCE: [DisplayFormat; 6] = [
    DisplayFormat::Html,
    DisplayFormat::Latex,
    DisplayFormat::Png,
    DisplayFormat::Jpeg,
    DisplayFormat::Svg,
    DisplayFormat::Text,
];

/// Renders notebooks as a standalone HTML page (`.html`).
///
/// The page embeds the configured stylesheets, the highlighter's CSS and a
/// MathJax loader. Each output sits in an `output_area` container with a
/// type-specific class.
pub struct HtmlBackend {
    highlighter: Box<dyn Highlighter>,
    stylesheets: Vec<String>,
    mathjax_url: Option<String>,
    raw_as_verbatim: bool,
}

impl HtmlBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            highlighter: Box::new(PlainHighlighter),
            stylesheets: Vec::new(),
            mathjax_url: Some(DEFAULT_MATHJAX_URL.to_owned()),
            raw_as_verbatim: false,
        }
    }

    #[must_use]
    pub fn with_highlighter(mut self, highlighter: impl Highlighter + 'static) -> Self {
        self.highlighter = Box::new(highlighter);
        self
    }

    /// Embed `css` in the page header. Stylesheets keep the order they are
    /// added in.
    #[must_use]
    pub fn with_stylesheet(mut self, css: impl Into<String>) -> Self {
        self.stylesheets.push(css.into());
        self
    }

    /// MathJax script URL; `None` leaves math unrendered.
    #[must_use]
    pub fn with_mathjax_url(mut self, url: Option<String>) -> Self {
        self.mathjax_url = url;
        self
    }

    /// Render raw cells inside `<pre>` instead of passing them through.
    #[must_use]
    pub fn with_raw_as_verbatim(mut self, enabled: bool) -> Self {
        self.raw_as_verbatim = enabled;
        self
    }
}

impl Default for HtmlBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn in_tag(tag: &str, content: &str, attrs: &str) -> Lines {
    let open = if attrs.is_empty() {
        format!("<{tag}>")
    } else {
        format!("<{tag} {attrs}>")
    };
    vec![open, content.to_owned(), format!("</{tag}>")]
}

fn text_cell(content: Lines) -> Lines {
    let mut lines =
        vec![r#"<div class="text_cell_render border-box-sizing rendered_html">"#.to_owned()];
    lines.extend(content);
    lines.push("</div>".to_owned());
    lines
}

fn ansi_colored(text: &str) -> Lines {
    vec![format!("<pre>{}</pre>", ansi_to_html(text))]
}

fn html_prompt(number: Option<i64>) -> String {
    match number {
        Some(n) => n.to_string(),
        None => "&nbsp;".to_owned(),
    }
}

impl Backend for HtmlBackend {
    fn name(&self) -> &'static str {
        "html"
    }

    fn extension(&self) -> &'static str {
        "html"
    }

    fn optional_header(&self, info: &DocumentInfo<'_>) -> Lines {
        let mut lines = vec![
            "<!DOCTYPE html>".to_owned(),
            "<html>".to_owned(),
            "<head>".to_owned(),
            r#"<meta charset="UTF-8">"#.to_owned(),
            format!("<title>{}</title>", escape_html(info.name)),
        ];
        for css in &self.stylesheets {
            lines.extend(in_tag("style", css, r#"type="text/css""#));
        }
        lines.extend(in_tag(
            "style",
            &self.highlighter.stylesheet(),
            r#"type="text/css""#,
        ));
        if let Some(url) = &self.mathjax_url {
            lines.push(format!(
                r#"<script src="{}" type="text/javascript"></script>"#,
                escape_html(url)
            ));
            lines.extend(in_tag("script", MATHJAX_CONFIG, r#"type="text/javascript""#));
        }
        lines.extend(["</head>".to_owned(), "<body>".to_owned()]);
        lines
    }

    fn optional_footer(&self, _info: &DocumentInfo<'_>) -> Lines {
        vec!["</body>".to_owned(), "</html>".to_owned()]
    }

    fn render_heading(
        &mut self,
        cell: &HeadingCell,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        let level = cell.level;
        Ok(text_cell(vec![format!(
            "<h{level}>\n  {}\n</h{level}>",
            cell.source
        )]))
    }

    fn render_code(
        &mut self,
        cell: &CodeCell,
        cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        if cell.input.is_empty() {
            return Ok(Vec::new());
        }
        let mut lines = vec![
            r#"<div class="cell border-box-sizing code_cell vbox">"#.to_owned(),
            r#"<div class="input hbox">"#.to_owned(),
            format!(
                r#"<div class="prompt input_prompt">In [{}]:</div>"#,
                html_prompt(cell.prompt_number)
            ),
            r#"<div class="input_area box-flex1">"#.to_owned(),
            self.highlighter
                .highlight(&cell.input, Some(language(cell))),
            "</div>".to_owned(),
            "</div>".to_owned(),
        ];
        if !cell.outputs.is_empty() {
            lines.push(r#"<div class="vbox output_wrapper">"#.to_owned());
            lines.push(r#"<div class="output vbox">"#.to_owned());
            lines.extend(render_outputs(self, &cell.outputs, cx)?);
            lines.push("</div>".to_owned());
            lines.push("</div>".to_owned());
        }
        lines.push("</div>".to_owned());
        Ok(lines)
    }

    fn render_markdown(
        &mut self,
        cell: &TextCell,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        Ok(text_cell(vec![to_html(&cell.source)]))
    }

    fn render_raw(
        &mut self,
        cell: &TextCell,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        if self.raw_as_verbatim {
            Ok(in_tag("pre", &escape_html(&cell.source), ""))
        } else {
            Ok(vec![cell.source.clone()])
        }
    }

    fn render_stream(
        &mut self,
        output: &StreamOutput,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        Ok(ansi_colored(&output.text))
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
        Ok(ansi_colored(&output.traceback.join("\n")))
    }

    fn render_display_data(
        &mut self,
        output: &RichOutput,
        cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        render_preferred(self, &output.data, &PREFERENCE, cx)
    }

    fn wrap_output(&self, output: &Output, lines: Lines) -> Lines {
        let out_prompt = match output {
            Output::Pyout(result) => format!(
                r#"<div class="prompt output_prompt">Out [{}]:</div>"#,
                html_prompt(result.prompt_number)
            ),
            _ => r#"<div class="prompt output_prompt"></div>"#.to_owned(),
        };
        let mut classes = format!("output_subarea output_{}", output.kind());
        if let Output::Stream(stream) = output {
            classes.push_str(" output_");
            classes.push_str(&stream.stream);
        }

        let mut wrapped = vec![
            r#"<div class="hbox output_area">"#.to_owned(),
            out_prompt,
            format!(r#"<div class="{classes}">"#),
        ];
        wrapped.extend(lines);
        wrapped.extend(["</div>".to_owned(), "</div>".to_owned()]);
        wrapped
    }

    fn render_display_format_text(&mut self, data: &str) -> Result<Lines, RenderError> {
        Ok(ansi_colored(data))
    }

    fn render_display_format_html(&mut self, data: &str) -> Result<Lines, RenderError> {
        Ok(vec![data.to_owned()])
    }

    fn render_display_format_latex(&mut self, data: &str) -> Result<Lines, RenderError> {
        Ok(vec![data.to_owned()])
    }

    fn render_display_format_json(&mut self, _data: &str) -> Result<Lines, RenderError> {
        Ok(Vec::new())
    }

    fn render_display_format_javascript(&mut self, data: &str) -> Result<Lines, RenderError> {
        Ok(in_tag("script", data, r#"type="text/javascript""#))
    }

    fn img_lines(&mut self, figure: &Figure) -> Result<Lines, RenderError> {
        Ok(vec![format!(r#"<img src="{}">"#, escape_html(&figure.link))])
    }

    fn unknown_lines(&self, what: &str, dump: &str) -> Lines {
        let mut lines = vec![format!("<h2>Warning:: Unknown {}</h2>", escape_html(what))];
        lines.extend(in_tag("pre", &escape_html(dump), ""));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::FigureStore;
    use nbc_notebook::{MimeBundle, Notebook};
    use serde_json::Map;

    const PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

    fn stream(name: &str, text: &str) -> Output {
        Output::Stream(StreamOutput {
            stream: name.to_owned(),
            text: text.to_owned(),
            extra: Map::new(),
        })
    }

    fn render_cell_lines(backend: &mut HtmlBackend, cell: &CodeCell) -> (String, usize) {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut figures = FigureStore::new("nb", temp_dir.path().join("nb_files"));
        let mut warnings = Vec::new();
        let mut cx = RenderContext::new(&mut figures, &mut warnings);
        let lines = backend.render_code(cell, &mut cx).unwrap();
        (lines.join("\n"), figures.count())
    }

    #[test]
    fn test_header_embeds_stylesheets_in_order() {
        let backend = HtmlBackend::new()
            .with_stylesheet("body { margin: 0; }")
            .with_stylesheet("p { color: red; }")
            .with_mathjax_url(None);
        let notebook = Notebook::from_cells(Vec::new());
        let header = backend
            .optional_header(&DocumentInfo {
                name: "a<b",
                notebook: &notebook,
            })
            .join("\n");

        assert!(header.contains("<title>a&lt;b</title>"));
        let first = header.find("body { margin: 0; }").unwrap();
        let second = header.find("p { color: red; }").unwrap();
        assert!(first < second);
        assert!(!header.contains("MathJax"));
        assert!(header.ends_with("</head>\n<body>"));
    }

    #[test]
    fn test_code_cell_structure() {
        let cell = CodeCell::new("x < 1").with_prompt_number(4);
        let (html, _) = render_cell_lines(&mut HtmlBackend::new(), &cell);
        assert!(html.contains(r#"<div class="prompt input_prompt">In [4]:</div>"#));
        assert!(html.contains("x &lt; 1"));
        assert!(!html.contains("output_wrapper"));
    }

    #[test]
    fn test_missing_prompt_number() {
        let (html, _) = render_cell_lines(&mut HtmlBackend::new(), &CodeCell::new("pass"));
        assert!(html.contains("In [&nbsp;]:"));
    }

    #[test]
    fn test_stream_container_classes_after_coalescing() {
        let cell = CodeCell::new("print(1); print(2)")
            .with_output(stream("stdout", "1\n"))
            .with_output(stream("stdout", "2\n"));
        let (html, _) = render_cell_lines(&mut HtmlBackend::new(), &cell);
        assert_eq!(html.matches("output_subarea output_stream output_stdout").count(), 1);
        assert!(html.contains("<pre>1\n2\n</pre>"));
    }

    #[test]
    fn test_pyout_prefers_html_over_text() {
        let cell = CodeCell::new("df").with_prompt_number(2).with_output(Output::Pyout(RichOutput {
            prompt_number: Some(2),
            data: MimeBundle::new()
                .with(DisplayFormat::Text, "frame")
                .with(DisplayFormat::Html, "<table></table>"),
            extra: Map::new(),
        }));
        let (html, figures) = render_cell_lines(&mut HtmlBackend::new(), &cell);
        assert!(html.contains(r#"<div class="prompt output_prompt">Out [2]:</div>"#));
        assert!(html.contains("<table></table>"));
        assert!(!html.contains("<pre>frame</pre>"));
        assert_eq!(figures, 0);
    }

    #[test]
    fn test_display_data_image_goes_to_figures() {
        let cell = CodeCell::new("plot()").with_output(Output::DisplayData(RichOutput {
            prompt_number: None,
            data: MimeBundle::new()
                .with(DisplayFormat::Text, "<Figure>")
                .with(DisplayFormat::Png, PNG),
            extra: Map::new(),
        }));
        let (html, figures) = render_cell_lines(&mut HtmlBackend::new(), &cell);
        assert!(html.contains(r#"<img src="nb_files/nb_fig_00.png">"#));
        assert!(!html.contains("&lt;Figure&gt;"));
        assert_eq!(figures, 1);
    }

    #[test]
    fn test_traceback_colored() {
        let cell = CodeCell::new("1/0").with_output(Output::Pyerr(ErrorOutput {
            ename: "ZeroDivisionError".to_owned(),
            evalue: "division by zero".to_owned(),
            traceback: vec!["\x1b[0;31mZeroDivisionError\x1b[0m".to_owned()],
            extra: Map::new(),
        }));
        let (html, _) = render_cell_lines(&mut HtmlBackend::new(), &cell);
        assert!(html.contains("output_subarea output_pyerr"));
        assert!(html.contains(r#"<span class="ansired">ZeroDivisionError</span>"#));
    }

    #[test]
    fn test_unknown_lines_escaped() {
        let lines = HtmlBackend::new().unknown_lines("cell widget", r#"{"a": "<b>"}"#);
        assert_eq!(lines[0], "<h2>Warning:: Unknown cell widget</h2>");
        assert_eq!(lines[2], "{&quot;a&quot;: &quot;&lt;b&gt;&quot;}");
    }
}
