//! reStructuredText markup target.

use std::fmt::Write;

use super::MarkupTarget;
use crate::text::indent;

/// Underline characters for heading levels 1 to 6.
const HEADING_MARKERS: [char; 6] = ['=', '-', '`', '\'', '.', '~'];

/// Heading text followed by its level's underline.
pub(crate) fn underline_heading(level: u8, text: &str) -> String {
    let index = usize::from(level.clamp(1, 6)) - 1;
    let marker = HEADING_MARKERS[index];
    let width = text.chars().count().max(1);
    format!("{text}\n{}", marker.to_string().repeat(width))
}

/// Prefix the first line with `marker` and align the rest under it.
fn hang(marker: &str, body: &str) -> String {
    let pad = " ".repeat(marker.len());
    let mut out = String::with_capacity(body.len() + marker.len());
    for (i, line) in body.lines().enumerate() {
        if i == 0 {
            out.push_str(marker);
        } else {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&pad);
            }
        }
        out.push_str(line);
    }
    if out.is_empty() {
        out.push_str(marker.trim_end());
    }
    out
}

pub struct RstMarkup;

impl MarkupTarget for RstMarkup {
    const BLOCK_SEPARATOR: &'static str = "\n\n";

    fn text(text: &str, out: &mut String) {
        for c in text.chars() {
            if matches!(c, '\\' | '*' | '`' | '_' | '|') {
                out.push('\\');
            }
            out.push(c);
        }
    }

    fn inline_code(code: &str, out: &mut String) {
        write!(out, "``{code}``").unwrap();
    }

    fn inline_math(tex: &str, out: &mut String) {
        write!(out, ":math:`{tex}`").unwrap();
    }

    fn display_math(tex: &str, out: &mut String) {
        write!(out, "\n\n.. math::\n\n{}\n\n", indent(tex.trim(), 4)).unwrap();
    }

    fn inline_html(html: &str, out: &mut String) {
        out.push_str(html);
    }

    fn emphasis(content: &str, out: &mut String) {
        write!(out, "*{content}*").unwrap();
    }

    fn strong(content: &str, out: &mut String) {
        write!(out, "**{content}**").unwrap();
    }

    fn link(dest: &str, content: &str, out: &mut String) {
        if content.is_empty() || content == dest {
            out.push_str(dest);
        } else {
            write!(out, "`{content} <{dest}>`__").unwrap();
        }
    }

    fn image(src: &str, alt: &str, _title: &str, out: &mut String) {
        write!(out, "\n\n.. image:: {src}").unwrap();
        if !alt.is_empty() {
            write!(out, "\n   :alt: {alt}").unwrap();
        }
        out.push_str("\n\n");
    }

    fn hard_break(out: &mut String) {
        out.push('\n');
    }

    fn paragraph(content: &str, out: &mut String) {
        out.push_str(content);
    }

    fn heading(level: u8, content: &str, out: &mut String) {
        out.push_str(&underline_heading(level, content));
    }

    fn code_block(lang: Option<&str>, code: &str, out: &mut String) {
        match lang {
            Some(lang) => write!(out, ".. code:: {lang}\n\n").unwrap(),
            None => out.push_str("::\n\n"),
        }
        out.push_str(&indent(code.trim_end_matches('\n'), 4));
    }

    fn block_quote(content: &str, out: &mut String) {
        out.push_str(&indent(content, 4));
    }

    fn list(start: Option<u64>, items: &[String], out: &mut String) {
        let mut number = start.unwrap_or(1);
        let mut rendered = Vec::with_capacity(items.len());
        for item in items {
            let marker = if start.is_some() {
                number += 1;
                format!("{}. ", number - 1)
            } else {
                "- ".to_owned()
            };
            rendered.push(hang(&marker, item));
        }
        let separator = if items.iter().any(|item| item.contains('\n')) {
            "\n\n"
        } else {
            "\n"
        };
        out.push_str(&rendered.join(separator));
    }

    fn rule(out: &mut String) {
        out.push_str("----------");
    }

    fn html_block(html: &str, out: &mut String) {
        write!(out, ".. raw:: html\n\n{}", indent(html, 4)).unwrap();
    }

    fn table(head: &[String], rows: &[Vec<String>], out: &mut String) {
        out.push_str(".. list-table::\n");
        if !head.is_empty() {
            out.push_str("   :header-rows: 1\n");
        }
        let all_rows = std::iter::once(head)
            .filter(|row| !row.is_empty())
            .chain(rows.iter().map(Vec::as_slice));
        for row in all_rows {
            out.push('\n');
            for (i, cell) in row.iter().enumerate() {
                let bullet = if i == 0 { "   * - " } else { "     - " };
                write!(out, "{bullet}{cell}").unwrap();
                out.push('\n');
            }
        }
        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::markup::to_rst;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_underline_levels() {
        assert_eq!(underline_heading(1, "Title"), "Title\n=====");
        assert_eq!(underline_heading(3, "Sub"), "Sub\n```");
        assert_eq!(underline_heading(6, "x"), "x\n~");
    }

    #[test]
    fn test_underline_counts_characters() {
        assert_eq!(underline_heading(2, "Über"), "Über\n----");
    }

    #[test]
    fn test_escapes_markup_characters() {
        assert_eq!(to_rst(r"snake_case and a|b"), r"snake\_case and a\|b");
    }

    #[test]
    fn test_inline_markup() {
        assert_eq!(
            to_rst("*a* **b** `c` [d](http://e)"),
            "*a* **b** ``c`` `d <http://e>`__"
        );
    }

    #[test]
    fn test_code_block() {
        assert_eq!(
            to_rst("```python\nx = 1\ny = 2\n```"),
            ".. code:: python\n\n    x = 1\n    y = 2"
        );
    }

    #[test]
    fn test_nested_list() {
        assert_eq!(
            to_rst("- one\n  - inner\n- two"),
            "- one\n\n  - inner\n\n- two"
        );
    }

    #[test]
    fn test_ordered_list_numbers() {
        assert_eq!(to_rst("3. c\n4. d"), "3. c\n4. d");
    }

    #[test]
    fn test_math() {
        assert_eq!(to_rst("Let $x$ be"), "Let :math:`x` be");
    }

    #[test]
    fn test_table() {
        assert_eq!(
            to_rst("| a | b |\n|---|---|\n| 1 | 2 |"),
            ".. list-table::\n   :header-rows: 1\n\n   * - a\n     - b\n\n   * - 1\n     - 2"
        );
    }
}
