//! Pure transforms applied to cells and outputs before rendering.
//!
//! None of these functions modify their input; they borrow when nothing
//! changes and allocate only when they have to.

use std::borrow::Cow;

use crate::cell::Cell;
use crate::output::Output;

/// Pseudo-path the notebook frontend prefixes to locally stored files.
const FAKE_FILES_URL: &str = "/files/";

/// Remove the `/files/` pseudo-path from text cell sources.
///
/// # Examples
///
/// ```
/// use nbc_notebook::transform::remove_fake_files_url;
///
/// assert_eq!(remove_fake_files_url("![](/files/plot.png)"), "![](plot.png)");
/// assert_eq!(remove_fake_files_url("plain"), "plain");
/// ```
#[must_use]
pub fn remove_fake_files_url(source: &str) -> Cow<'_, str> {
    if source.contains(FAKE_FILES_URL) {
        Cow::Owned(source.replace(FAKE_FILES_URL, ""))
    } else {
        Cow::Borrowed(source)
    }
}

/// Normalize a cell before it is rendered.
///
/// Markdown and raw cells get [`remove_fake_files_url`] applied to their
/// source; every other cell is returned as is.
#[must_use]
pub fn normalize_cell(cell: &Cell) -> Cow<'_, Cell> {
    match cell {
        Cell::Markdown(text) | Cell::Raw(text) => match remove_fake_files_url(&text.source) {
            Cow::Borrowed(_) => Cow::Borrowed(cell),
            Cow::Owned(source) => {
                let mut text = text.clone();
                text.source = source;
                Cow::Owned(if matches!(cell, Cell::Markdown(_)) {
                    Cell::Markdown(text)
                } else {
                    Cell::Raw(text)
                })
            }
        },
        _ => Cow::Borrowed(cell),
    }
}

/// Merge adjacent stream outputs that write to the same stream.
///
/// Order is preserved. Runs of stream outputs with the same stream name become
/// a single stream whose text is the concatenation of the run.
#[must_use]
pub fn coalesce_streams(outputs: &[Output]) -> Vec<Cow<'_, Output>> {
    let mut merged: Vec<Cow<'_, Output>> = Vec::with_capacity(outputs.len());

    for output in outputs {
        if let (Some(last), Output::Stream(next)) = (merged.last_mut(), output)
            && let Output::Stream(prev) = &**last
            && prev.stream == next.stream
        {
            if let Output::Stream(prev) = last.to_mut() {
                prev.text.push_str(&next.text);
            }
            continue;
        }
        merged.push(Cow::Borrowed(output));
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::TextCell;
    use crate::mime::MimeBundle;
    use crate::output::{RichOutput, StreamOutput};
    use pretty_assertions::assert_eq;
    use serde_json::Map;

    fn stream(name: &str, text: &str) -> Output {
        Output::Stream(StreamOutput {
            stream: name.to_owned(),
            text: text.to_owned(),
            extra: Map::new(),
        })
    }

    fn texts(outputs: &[Cow<'_, Output>]) -> Vec<String> {
        outputs
            .iter()
            .map(|o| match &**o {
                Output::Stream(s) => format!("{}:{}", s.stream, s.text),
                other => other.kind().to_string(),
            })
            .collect()
    }

    #[test]
    fn test_adjacent_same_stream_merged() {
        let outputs = vec![stream("stdout", "a\n"), stream("stdout", "b\n")];
        let merged = coalesce_streams(&outputs);
        assert_eq!(texts(&merged), vec!["stdout:a\nb\n"]);
    }

    #[test]
    fn test_different_streams_kept_apart() {
        let outputs = vec![
            stream("stdout", "a"),
            stream("stderr", "b"),
            stream("stderr", "c"),
            stream("stdout", "d"),
        ];
        let merged = coalesce_streams(&outputs);
        assert_eq!(texts(&merged), vec!["stdout:a", "stderr:bc", "stdout:d"]);
    }

    #[test]
    fn test_non_stream_breaks_run() {
        let pyout = Output::Pyout(RichOutput {
            prompt_number: Some(1),
            data: MimeBundle::new(),
            extra: Map::new(),
        });
        let outputs = vec![stream("stdout", "a"), pyout, stream("stdout", "b")];
        let merged = coalesce_streams(&outputs);
        assert_eq!(texts(&merged), vec!["stdout:a", "pyout", "stdout:b"]);
    }

    #[test]
    fn test_input_not_modified() {
        let outputs = vec![stream("stdout", "a"), stream("stdout", "b")];
        let _ = coalesce_streams(&outputs);
        assert_eq!(outputs[0], stream("stdout", "a"));
    }

    #[test]
    fn test_empty_outputs() {
        assert!(coalesce_streams(&[]).is_empty());
    }

    #[test]
    fn test_normalize_markdown_cell() {
        let cell = Cell::Markdown(TextCell::new("![x](/files/img.png)"));
        let normalized = normalize_cell(&cell);
        assert!(matches!(normalized, Cow::Owned(_)));
        assert_eq!(*normalized, Cell::Markdown(TextCell::new("![x](img.png)")));
    }

    #[test]
    fn test_normalize_leaves_code_alone() {
        let cell = Cell::Code(crate::cell::CodeCell::new("open('/files/x')"));
        assert!(matches!(normalize_cell(&cell), Cow::Borrowed(_)));
    }
}
