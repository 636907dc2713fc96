//! Output format backends.

mod html;
mod latex;
mod markdown;
mod notebook;
mod py;
mod rst;

pub use html::{DEFAULT_MATHJAX_URL, HtmlBackend};
pub use latex::LatexBackend;
pub use markdown::{MarkdownBackend, MarkdownOptions};
pub use notebook::NotebookBackend;
pub use py::{PyBackend, PyOptions};
pub use rst::RstBackend;

use nbc_notebook::{CodeCell, ErrorOutput};

use crate::backend::Lines;
use crate::text::ansi::strip_ansi;
use crate::text::indent;

/// Prompt number as shown in `In[..]`/`Out[..]` labels.
fn prompt(number: Option<i64>) -> String {
    number.map_or_else(|| " ".to_owned(), |n| n.to_string())
}

fn language(cell: &CodeCell) -> &str {
    cell.language.as_deref().unwrap_or("python")
}

/// Traceback frames joined and stripped of color codes.
fn plain_traceback(output: &ErrorOutput) -> String {
    strip_ansi(&output.traceback.join("\n"))
}

/// An RST directive followed by its indented body.
fn rst_directive(directive: &str, body: &str) -> Lines {
    let mut lines = vec![directive.to_owned(), String::new()];
    if !body.is_empty() {
        lines.push(indent(body, 4));
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt() {
        assert_eq!(prompt(Some(3)), "3");
        assert_eq!(prompt(None), " ");
    }

    #[test]
    fn test_rst_directive() {
        assert_eq!(
            rst_directive(".. math::", "x^2"),
            vec![".. math::", "", "    x^2", ""]
        );
        assert_eq!(rst_directive(".. warning::", ""), vec![".. warning::", ""]);
    }
}
