//! LaTeX markup target.

use std::fmt::Write;

use super::MarkupTarget;

/// Sectioning command for a heading level.
pub(crate) fn section_command(level: u8) -> &'static str {
    match level {
        0 | 1 => "section",
        2 => "subsection",
        3 => "subsubsection",
        4 => "paragraph",
        _ => "subparagraph",
    }
}

/// Escape LaTeX special characters in running text.
///
/// # Examples
///
/// ```
/// use nbc_renderer::text::markup::escape_latex;
///
/// assert_eq!(escape_latex("a_b & 100%"), r"a\_b \& 100\%");
/// ```
#[must_use]
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '{' | '}' | '$' | '&' | '#' | '_' | '%' => {
                out.push('\\');
                out.push(c);
            }
            '^' => out.push_str(r"\textasciicircum{}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            _ => out.push(c),
        }
    }
    out
}

/// Body fragment for the `article` class; links need `hyperref`, images
/// `graphicx`.
pub struct LatexMarkup;

impl MarkupTarget for LatexMarkup {
    const BLOCK_SEPARATOR: &'static str = "\n\n";

    fn text(text: &str, out: &mut String) {
        out.push_str(&escape_latex(text));
    }

    fn inline_code(code: &str, out: &mut String) {
        write!(out, r"\texttt{{{}}}", escape_latex(code)).unwrap();
    }

    fn inline_math(tex: &str, out: &mut String) {
        write!(out, "${tex}$").unwrap();
    }

    fn display_math(tex: &str, out: &mut String) {
        write!(out, "\\[{}\\]", tex.trim()).unwrap();
    }

    fn inline_html(_html: &str, _out: &mut String) {}

    fn emphasis(content: &str, out: &mut String) {
        write!(out, r"\emph{{{content}}}").unwrap();
    }

    fn strong(content: &str, out: &mut String) {
        write!(out, r"\textbf{{{content}}}").unwrap();
    }

    fn link(dest: &str, content: &str, out: &mut String) {
        let url = dest.replace('%', r"\%").replace('#', r"\#");
        if content.is_empty() {
            write!(out, r"\url{{{url}}}").unwrap();
        } else {
            write!(out, r"\href{{{url}}}{{{content}}}").unwrap();
        }
    }

    fn image(src: &str, _alt: &str, _title: &str, out: &mut String) {
        write!(out, r"\includegraphics{{{src}}}").unwrap();
    }

    fn hard_break(out: &mut String) {
        out.push_str("\\\\\n");
    }

    fn paragraph(content: &str, out: &mut String) {
        out.push_str(content);
    }

    fn heading(level: u8, content: &str, out: &mut String) {
        write!(out, r"\{}{{{content}}}", section_command(level)).unwrap();
    }

    fn code_block(_lang: Option<&str>, code: &str, out: &mut String) {
        write!(
            out,
            "\\begin{{verbatim}}\n{}\n\\end{{verbatim}}",
            code.trim_end_matches('\n')
        )
        .unwrap();
    }

    fn block_quote(content: &str, out: &mut String) {
        write!(out, "\\begin{{quote}}\n{content}\n\\end{{quote}}").unwrap();
    }

    fn list(start: Option<u64>, items: &[String], out: &mut String) {
        let env = if start.is_some() { "enumerate" } else { "itemize" };
        writeln!(out, "\\begin{{{env}}}").unwrap();
        if let Some(n) = start.filter(|&n| n != 1) {
            writeln!(out, "\\setcounter{{enumi}}{{{}}}", n.saturating_sub(1)).unwrap();
        }
        for item in items {
            writeln!(out, "\\item {item}").unwrap();
        }
        write!(out, "\\end{{{env}}}").unwrap();
    }

    fn rule(out: &mut String) {
        out.push_str(r"\noindent\rule{\linewidth}{0.4pt}");
    }

    fn html_block(_html: &str, _out: &mut String) {}

    fn table(head: &[String], rows: &[Vec<String>], out: &mut String) {
        let columns = rows.iter().map(Vec::len).chain([head.len()]).max().unwrap_or(0);
        writeln!(out, "\\begin{{tabular}}{{{}}}", "l".repeat(columns)).unwrap();
        if !head.is_empty() {
            writeln!(out, "{} \\\\ \\hline", head.join(" & ")).unwrap();
        }
        for row in rows {
            writeln!(out, "{} \\\\", row.join(" & ")).unwrap();
        }
        out.push_str("\\end{tabular}");
    }
}
