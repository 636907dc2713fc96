//! ANSI escape sequences in stream text and tracebacks.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use super::escape_html;

/// SGR sequence (`ESC [ params m`), capturing the parameters.
static SGR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[([0-9A-Fa-f;]*?)m").unwrap());

/// Any CSI escape sequence.
static CSI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").unwrap());

/// Remove ANSI escape sequences.
///
/// # Examples
///
/// ```
/// use nbc_renderer::text::ansi::strip_ansi;
///
/// assert_eq!(strip_ansi("\x1b[0;31mError\x1b[0m"), "Error");
/// ```
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    CSI_RE.replace_all(text, "").into_owned()
}

fn color_class(code: &str) -> Option<&'static str> {
    match code {
        "30" => Some("ansiblack"),
        "31" => Some("ansired"),
        "32" => Some("ansigreen"),
        "33" => Some("ansiyellow"),
        "34" => Some("ansiblue"),
        "35" => Some("ansipurple"),
        "36" => Some("ansicyan"),
        "37" => Some("ansigrey"),
        "01" | "1" => Some("ansibold"),
        _ => None,
    }
}

/// Escape `text` for HTML and turn color sequences into `<span>` elements.
///
/// Each sequence closes the span opened by the previous one. Unsupported
/// codes are dropped.
///
/// # Examples
///
/// ```
/// use nbc_renderer::text::ansi::ansi_to_html;
///
/// assert_eq!(
///     ansi_to_html("\x1b[31mred\x1b[0m <b>"),
///     r#"<span class="ansired">red</span> &lt;b&gt;"#
/// );
/// ```
#[must_use]
pub fn ansi_to_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut open = false;
    let mut last = 0;

    for caps in SGR_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&escape_html(&text[last..whole.start()]));
        last = whole.end();

        if open {
            out.push_str("</span>");
            open = false;
        }

        let classes: Vec<&str> = caps[1].split(';').filter_map(color_class).collect();
        if !classes.is_empty() {
            write!(out, r#"<span class="{}">"#, classes.join(" ")).unwrap();
            open = true;
        }
    }

    out.push_str(&escape_html(&text[last..]));
    if open {
        out.push_str("</span>");
    }
    out
}
