//! Notebook backend: writes the cells back out as an nbformat 3 document.
//!
//! Cells are serialized as JSON objects and the assembled document is
//! re-parsed and pretty-printed, so the result is canonical: one-space
//! indentation, keys sorted.

use nbc_notebook::{Cell, CodeCell, HeadingCell, TextCell};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::backend::{Backend, DocumentInfo, Lines, RenderContext};
use crate::error::RenderError;

/// Re-emits notebooks as `.ipynb` JSON.
///
/// No figures are extracted and empty code cells are kept, so the output
/// describes the same cells as the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotebookBackend;

impl NotebookBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn cell_lines(cell: Cell) -> Result<Lines, RenderError> {
    let json = serde_json::to_string_pretty(&cell)?;
    Ok(vec![json])
}

impl Backend for NotebookBackend {
    fn name(&self) -> &'static str {
        "notebook"
    }

    fn extension(&self) -> &'static str {
        "ipynb"
    }

    fn cell_separator(&self) -> &'static str {
        ","
    }

    fn uses_figures(&self) -> bool {
        false
    }

    fn optional_header(&self, info: &DocumentInfo<'_>) -> Lines {
        let notebook = info.notebook;
        let mut metadata = notebook.metadata.clone();
        if notebook.name().is_none() {
            metadata.insert("name".to_owned(), Value::from(info.name));
        }
        vec![
            "{".to_owned(),
            format!(r#""metadata": {},"#, Value::Object(metadata)),
            format!(r#""nbformat": {},"#, notebook.nbformat),
            format!(r#""nbformat_minor": {},"#, notebook.nbformat_minor),
            r#""worksheets": ["#.to_owned(),
            "{".to_owned(),
            r#""cells": ["#.to_owned(),
        ]
    }

    fn optional_footer(&self, _info: &DocumentInfo<'_>) -> Lines {
        ["]", "}", "]", "}"].map(str::to_owned).to_vec()
    }

    fn finish(&self, document: String) -> Result<String, RenderError> {
        let value: Value = serde_json::from_str(&document)?;
        let mut buf = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
        value.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn render_heading(
        &mut self,
        cell: &HeadingCell,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        cell_lines(Cell::Heading(cell.clone()))
    }

    fn render_code(
        &mut self,
        cell: &CodeCell,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        cell_lines(Cell::Code(cell.clone()))
    }

    fn render_markdown(
        &mut self,
        cell: &TextCell,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        cell_lines(Cell::Markdown(cell.clone()))
    }

    fn render_raw(
        &mut self,
        cell: &TextCell,
        _cx: &mut RenderContext<'_>,
    ) -> Result<Lines, RenderError> {
        cell_lines(Cell::Raw(cell.clone()))
    }

    /// Unknown cells are passed through unchanged.
    fn unknown_lines(&self, _what: &str, dump: &str) -> Lines {
        vec![dump.to_owned()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::Converter;
    use nbc_notebook::{Notebook, parse_notebook};
    use pretty_assertions::assert_eq;

    fn convert(notebook: Notebook) -> (String, std::path::PathBuf) {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut converter = Converter::new(NotebookBackend::new(), temp_dir.path().join("nb.ipynb"))
            .with_notebook(notebook);
        let text = converter.convert(",").unwrap();
        (text, converter.figures_dir().to_path_buf())
    }

    #[test]
    fn test_canonical_output() {
        let notebook = Notebook::from_cells(vec![Cell::Heading(HeadingCell::new(1, "Title"))]);
        let (text, _) = convert(notebook);
        assert_eq!(
            text,
            r#"{
 "metadata": {
  "name": "nb"
 },
 "nbformat": 3,
 "nbformat_minor": 0,
 "worksheets": [
  {
   "cells": [
    {
     "cell_type": "heading",
     "level": 1,
     "source": "Title"
    }
   ]
  }
 ]
}"#
        );
    }

    #[test]
    fn test_round_trip_keeps_cells() {
        let notebook = Notebook::from_cells(vec![
            Cell::Markdown(TextCell::new("Some *text*")),
            Cell::Code(CodeCell::new("")),
            Cell::Code(CodeCell::new("1+1").with_prompt_number(1)),
        ]);
        let (text, figures_dir) = convert(notebook.clone());
        let reparsed = parse_notebook(&text).unwrap();

        assert_eq!(reparsed.cells().count(), 3);
        assert_eq!(
            reparsed.cells().cloned().collect::<Vec<_>>(),
            notebook.cells().cloned().collect::<Vec<_>>()
        );
        assert!(!figures_dir.exists());
    }

    #[test]
    fn test_unknown_cell_preserved() {
        let json = r#"{"metadata": {"name": "w"}, "nbformat": 3, "nbformat_minor": 0,
            "worksheets": [{"cells": [{"cell_type": "widget", "state": {"x": 1}}]}]}"#;
        let (text, _) = convert(parse_notebook(json).unwrap());
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value["worksheets"][0]["cells"][0]["state"]["x"],
            Value::from(1)
        );
        assert_eq!(value["metadata"]["name"], Value::from("w"));
    }
}
