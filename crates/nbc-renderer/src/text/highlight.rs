//! Source code highlighting for the HTML backend.

use super::escape_html;

/// Turns source code into marked-up HTML.
///
/// Implementations return a self-contained fragment; the stylesheet they need
/// is emitted once in the document header.
pub trait Highlighter {
    /// Render `source` written in `language`.
    fn highlight(&self, source: &str, language: Option<&str>) -> String;

    /// CSS rules for the markup produced by [`highlight`](Self::highlight).
    fn stylesheet(&self) -> String;
}

/// Highlighter that escapes the code into a `highlight` block without
/// tokenizing it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, source: &str, _language: Option<&str>) -> String {
        format!(
            r#"<div class="highlight"><pre>{}</pre></div>"#,
            escape_html(source)
        )
    }

    fn stylesheet(&self) -> String {
        concat!(
            ".highlight { background: #f8f8f8; }\n",
            ".highlight pre { margin: 0; padding: 0.4em; overflow-x: auto; }",
        )
        .to_owned()
    }
}
