//! HTML markup target.

use std::fmt::Write;

use super::MarkupTarget;
use crate::text::escape_html;

/// Semantic HTML fragment; math is left in MathJax delimiters.
pub struct HtmlMarkup;

impl MarkupTarget for HtmlMarkup {
    const BLOCK_SEPARATOR: &'static str = "\n";

    fn text(text: &str, out: &mut String) {
        out.push_str(&escape_html(text));
    }

    fn inline_code(code: &str, out: &mut String) {
        write!(out, "<code>{}</code>", escape_html(code)).unwrap();
    }

    fn inline_math(tex: &str, out: &mut String) {
        write!(out, r"\({}\)", escape_html(tex)).unwrap();
    }

    fn display_math(tex: &str, out: &mut String) {
        write!(out, r"\[{}\]", escape_html(tex)).unwrap();
    }

    fn inline_html(html: &str, out: &mut String) {
        out.push_str(html);
    }

    fn emphasis(content: &str, out: &mut String) {
        write!(out, "<em>{content}</em>").unwrap();
    }

    fn strong(content: &str, out: &mut String) {
        write!(out, "<strong>{content}</strong>").unwrap();
    }

    fn strikethrough(content: &str, out: &mut String) {
        write!(out, "<s>{content}</s>").unwrap();
    }

    fn link(dest: &str, content: &str, out: &mut String) {
        write!(out, r#"<a href="{}">{content}</a>"#, escape_html(dest)).unwrap();
    }

    fn image(src: &str, alt: &str, title: &str, out: &mut String) {
        let title_attr = if title.is_empty() {
            String::new()
        } else {
            format!(r#" title="{}""#, escape_html(title))
        };
        write!(
            out,
            r#"<img src="{}"{title_attr} alt="{}">"#,
            escape_html(src),
            escape_html(alt)
        )
        .unwrap();
    }

    fn hard_break(out: &mut String) {
        out.push_str("<br>\n");
    }

    fn task_list_marker(checked: bool, out: &mut String) {
        if checked {
            out.push_str(r#"<input type="checkbox" checked disabled> "#);
        } else {
            out.push_str(r#"<input type="checkbox" disabled> "#);
        }
    }

    fn paragraph(content: &str, out: &mut String) {
        write!(out, "<p>{content}</p>").unwrap();
    }

    fn heading(level: u8, content: &str, out: &mut String) {
        write!(out, "<h{level}>{content}</h{level}>").unwrap();
    }

    fn code_block(lang: Option<&str>, code: &str, out: &mut String) {
        if let Some(lang) = lang {
            write!(
                out,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(code)
            )
            .unwrap();
        } else {
            write!(out, "<pre><code>{}</code></pre>", escape_html(code)).unwrap();
        }
    }

    fn block_quote(content: &str, out: &mut String) {
        write!(out, "<blockquote>\n{content}\n</blockquote>").unwrap();
    }

    fn list(start: Option<u64>, items: &[String], out: &mut String) {
        let tag = match start {
            Some(1) => {
                out.push_str("<ol>\n");
                "ol"
            }
            Some(n) => {
                writeln!(out, "<ol start=\"{n}\">").unwrap();
                "ol"
            }
            None => {
                out.push_str("<ul>\n");
                "ul"
            }
        };
        for item in items {
            writeln!(out, "<li>{item}</li>").unwrap();
        }
        write!(out, "</{tag}>").unwrap();
    }

    fn rule(out: &mut String) {
        out.push_str("<hr>");
    }

    fn html_block(html: &str, out: &mut String) {
        out.push_str(html);
    }

    fn table(head: &[String], rows: &[Vec<String>], out: &mut String) {
        out.push_str("<table>\n");
        if !head.is_empty() {
            out.push_str("<thead><tr>");
            for cell in head {
                write!(out, "<th>{cell}</th>").unwrap();
            }
            out.push_str("</tr></thead>\n");
        }
        out.push_str("<tbody>\n");
        for row in rows {
            out.push_str("<tr>");
            for cell in row {
                write!(out, "<td>{cell}</td>").unwrap();
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</tbody>\n</table>");
    }
}
