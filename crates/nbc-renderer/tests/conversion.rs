//! End-to-end conversions of notebook files.

use std::fs;
use std::path::{Path, PathBuf};

use nbc_renderer::{
    ConvertOptions, Converter, MarkdownBackend, MarkdownOptions, OutputFormat, PyBackend,
    PyOptions, RstBackend, convert_file,
};
use pretty_assertions::assert_eq;

// 1x1 transparent PNG
const PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

fn write_notebook(dir: &Path, name: &str, cells: &str) -> PathBuf {
    let path = dir.join(name);
    let json = format!(
        r#"{{
  "metadata": {{"name": ""}},
  "nbformat": 3,
  "nbformat_minor": 0,
  "worksheets": [{{"cells": [{cells}]}}]
}}"#
    );
    fs::write(&path, json).unwrap();
    path
}

fn analysis_cells() -> String {
    format!(
        r#"
    {{"cell_type": "heading", "level": 2, "source": "Title"}},
    {{"cell_type": "markdown", "source": ["hello"]}},
    {{"cell_type": "code", "language": "python", "input": "1+1", "prompt_number": 1,
      "outputs": [{{"output_type": "pyout", "prompt_number": 1, "text": ["2"]}}]}},
    {{"cell_type": "code", "language": "python", "input": "plot()", "prompt_number": 2,
      "outputs": [{{"output_type": "display_data", "png": "{PNG}",
                    "svg": "<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>"}}]}}
"#
    )
}

#[test]
fn test_markdown_keeps_document_order() {
    let temp_dir = tempfile::tempdir().unwrap();
    let infile = write_notebook(temp_dir.path(), "analysis.ipynb", &analysis_cells());

    let summary = convert_file(&infile, OutputFormat::Markdown, &ConvertOptions::default()).unwrap();
    let text = fs::read_to_string(&summary.output_path).unwrap();

    let positions: Vec<usize> = ["## Title", "hello", "1+1", "2"]
        .iter()
        .map(|needle| text.find(needle).unwrap())
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(summary.output_path.ends_with("analysis.md"));
}

#[test]
fn test_figures_numbered_per_document() {
    let temp_dir = tempfile::tempdir().unwrap();
    let infile = write_notebook(temp_dir.path(), "analysis.ipynb", &analysis_cells());

    let summary = convert_file(&infile, OutputFormat::Rst, &ConvertOptions::default()).unwrap();
    let text = fs::read_to_string(&summary.output_path).unwrap();

    let files_dir = temp_dir.path().join("analysis_files");
    assert_eq!(summary.figures, 2);
    assert!(files_dir.join("analysis_fig_00.png").is_file());
    assert!(files_dir.join("analysis_fig_01.svg").is_file());
    assert!(text.contains(".. image:: analysis_files/analysis_fig_00.png"));
    assert!(text.contains(".. image:: analysis_files/analysis_fig_01.svg"));
}

#[test]
fn test_stale_figures_removed() {
    let temp_dir = tempfile::tempdir().unwrap();
    let infile = write_notebook(temp_dir.path(), "nb.ipynb", &analysis_cells());
    let files_dir = temp_dir.path().join("nb_files");
    fs::create_dir_all(&files_dir).unwrap();
    fs::write(files_dir.join("nb_fig_07.png"), b"old").unwrap();

    convert_file(&infile, OutputFormat::Rst, &ConvertOptions::default()).unwrap();
    assert!(!files_dir.join("nb_fig_07.png").exists());

    fs::write(files_dir.join("nb_fig_07.png"), b"old").unwrap();
    let keep = ConvertOptions {
        clear_figures: false,
        ..ConvertOptions::default()
    };
    convert_file(&infile, OutputFormat::Rst, &keep).unwrap();
    assert!(files_dir.join("nb_fig_07.png").exists());
}

#[test]
fn test_figure_links_resolve_from_output_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    let infile = write_notebook(temp_dir.path(), "nb.ipynb", &analysis_cells());
    let out_dir = temp_dir.path().join("out");
    fs::create_dir(&out_dir).unwrap();
    let options = ConvertOptions {
        outfile: Some(out_dir.join("nb.md")),
        ..ConvertOptions::default()
    };

    let summary = convert_file(&infile, OutputFormat::Markdown, &options).unwrap();
    let text = fs::read_to_string(&summary.output_path).unwrap();

    for link in ["../nb_files/nb_fig_00.png", "../nb_files/nb_fig_01.svg"] {
        assert!(text.contains(&format!("![]({link})")), "{text}");
        assert!(out_dir.join(link).is_file(), "{link}");
    }
}

#[test]
fn test_conversion_is_deterministic() {
    let temp_dir = tempfile::tempdir().unwrap();
    let infile = write_notebook(temp_dir.path(), "nb.ipynb", &analysis_cells());
    let mut converter = Converter::new(RstBackend::new(), &infile);

    let first = converter.convert("\n").unwrap();
    let second = converter.convert("\n").unwrap();
    assert_eq!(first, second);
    assert_eq!(converter.figure_count(), 2);
}

#[test]
fn test_render_twice_reuses_parsed_notebook() {
    let temp_dir = tempfile::tempdir().unwrap();
    let infile = write_notebook(temp_dir.path(), "nb.ipynb", &analysis_cells());
    let mut converter = Converter::new(PyBackend::new(PyOptions::default()), &infile);

    let first_path = converter.render().unwrap();
    let first = fs::read_to_string(&first_path).unwrap();
    fs::remove_file(&infile).unwrap();

    let second_path = converter.render().unwrap();
    assert_eq!(first_path, second_path);
    assert_eq!(fs::read_to_string(&second_path).unwrap(), first);
}

#[test]
fn test_empty_code_cell_renders_empty_block() {
    let temp_dir = tempfile::tempdir().unwrap();
    let infile = write_notebook(
        temp_dir.path(),
        "nb.ipynb",
        r#"
    {"cell_type": "markdown", "source": "before"},
    {"cell_type": "code", "input": "", "outputs": []},
    {"cell_type": "markdown", "source": "after"}
"#,
    );
    let mut converter = Converter::new(RstBackend::new(), &infile);
    assert_eq!(converter.convert("\n").unwrap(), "before\n\nafter");
}

#[test]
fn test_unknown_cell_kind_is_a_warning() {
    let temp_dir = tempfile::tempdir().unwrap();
    let infile = write_notebook(
        temp_dir.path(),
        "nb.ipynb",
        r#"
    {"cell_type": "widget", "model_id": "abc123"},
    {"cell_type": "markdown", "source": "still here"}
"#,
    );

    let summary = convert_file(&infile, OutputFormat::Markdown, &ConvertOptions::default()).unwrap();
    let text = fs::read_to_string(&summary.output_path).unwrap();

    assert_eq!(summary.warnings, vec!["Unknown cell: widget"]);
    assert!(text.contains("Warning: Unknown cell widget"));
    assert!(text.contains("\"model_id\": \"abc123\""));
    assert!(text.contains("still here"));
}

#[test]
fn test_adjacent_streams_render_as_one() {
    let temp_dir = tempfile::tempdir().unwrap();
    let split = write_notebook(
        temp_dir.path(),
        "split.ipynb",
        r#"
    {"cell_type": "code", "input": "run()", "outputs": [
        {"output_type": "stream", "stream": "stdout", "text": "a\n"},
        {"output_type": "stream", "stream": "stdout", "text": "b\n"}
    ]}
"#,
    );
    let joined = write_notebook(
        temp_dir.path(),
        "joined.ipynb",
        r#"
    {"cell_type": "code", "input": "run()", "outputs": [
        {"output_type": "stream", "stream": "stdout", "text": "a\nb\n"}
    ]}
"#,
    );

    let backend = || MarkdownBackend::new(MarkdownOptions::default());
    let split_text = Converter::new(backend(), &split).convert("\n").unwrap();
    let joined_text = Converter::new(backend(), &joined).convert("\n").unwrap();
    assert_eq!(split_text, joined_text);
}

#[test]
fn test_malformed_input_writes_nothing() {
    let temp_dir = tempfile::tempdir().unwrap();
    let infile = temp_dir.path().join("broken.ipynb");
    fs::write(&infile, "{ not json").unwrap();

    let err = convert_file(&infile, OutputFormat::Html, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, nbc_renderer::ConvertError::Read(_)));
    assert!(!temp_dir.path().join("broken.html").exists());
    assert!(!temp_dir.path().join("broken_files").exists());
}

#[test]
fn test_html_page_with_stylesheet() {
    let temp_dir = tempfile::tempdir().unwrap();
    let infile = write_notebook(temp_dir.path(), "page.ipynb", &analysis_cells());
    let css = temp_dir.path().join("custom.css");
    fs::write(&css, ".custom { color: teal; }").unwrap();

    let options = ConvertOptions {
        stylesheets: vec![css],
        ..ConvertOptions::default()
    };
    let summary = convert_file(&infile, OutputFormat::Html, &options).unwrap();
    let html = fs::read_to_string(&summary.output_path).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains(".custom { color: teal; }"));
    assert!(html.contains(r#"<img src="page_files/page_fig_00.png">"#));
    assert!(html.trim_end().ends_with("</html>"));
}
