//! Text helpers shared by the backends.
//!
//! These are the narrow collaborators the backends call for anything that is
//! not a plain template: ANSI escape handling, source highlighting and markup
//! conversion.

pub mod ansi;
pub mod highlight;
pub mod markup;

/// Indent every line of `text` by `spaces` spaces.
///
/// A trailing newline stays unindented so the result can be followed by more
/// text without a dangling indent.
///
/// # Examples
///
/// ```
/// use nbc_renderer::text::indent;
///
/// assert_eq!(indent("a\nb", 4), "    a\n    b");
/// assert_eq!(indent("a\n", 2), "  a\n");
/// ```
#[must_use]
pub fn indent(text: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    let mut out = String::with_capacity(text.len() + spaces);
    out.push_str(&pad);
    out.push_str(&text.replace('\n', &format!("\n{pad}")));
    if out.ends_with(&format!("\n{pad}")) {
        out.truncate(out.len() - spaces);
    }
    out
}

/// Prefix every line of `text` with `# `.
#[must_use]
pub fn comment(text: &str) -> String {
    format!("# {}", text.replace('\n', "\n# "))
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
