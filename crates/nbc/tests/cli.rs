//! Command-line behavior of the `nbc` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const NOTEBOOK: &str = r#"{
  "metadata": {"name": "demo"},
  "nbformat": 3,
  "nbformat_minor": 0,
  "worksheets": [{"cells": [
    {"cell_type": "heading", "level": 1, "source": "Demo"},
    {"cell_type": "code", "input": "1+1", "prompt_number": 1,
     "outputs": [{"output_type": "pyout", "prompt_number": 1, "text": "2"}]}
  ]}]
}"#;

fn nbc(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nbc"))
        .args(args)
        .current_dir(dir)
        .env_remove("NBC_FORMAT")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_bogus_format_lists_known_formats() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("demo.ipynb"), NOTEBOOK).unwrap();

    let result = nbc(temp_dir.path(), &["demo.ipynb", "--format", "bogus"]);

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("rst, html, latex, markdown, py"), "{stderr}");
    assert!(!temp_dir.path().join("demo.bogus").exists());
}

#[test]
fn test_default_format_is_rst() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("demo.ipynb"), NOTEBOOK).unwrap();

    let result = nbc(temp_dir.path(), &["demo.ipynb"]);

    assert!(result.status.success());
    let rst = fs::read_to_string(temp_dir.path().join("demo.rst")).unwrap();
    assert!(rst.starts_with("Demo\n====\n"));
    assert!(rst.contains(".. code:: python"));
}

#[test]
fn test_markdown_with_output_path() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("demo.ipynb"), NOTEBOOK).unwrap();

    let result = nbc(
        temp_dir.path(),
        &["demo.ipynb", "-f", "markdown", "-o", "notes.md"],
    );

    assert!(result.status.success());
    let markdown = fs::read_to_string(temp_dir.path().join("notes.md")).unwrap();
    assert!(markdown.starts_with("# Demo"));
}

#[test]
fn test_config_file_sets_format() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("demo.ipynb"), NOTEBOOK).unwrap();
    fs::write(
        temp_dir.path().join("nbc.toml"),
        "[convert]\nformat = \"py\"\n",
    )
    .unwrap();

    let result = nbc(temp_dir.path(), &["demo.ipynb"]);

    assert!(result.status.success());
    let script = fs::read_to_string(temp_dir.path().join("demo.py")).unwrap();
    assert!(script.contains("# In[1]:\n1+1"));
}

#[test]
fn test_missing_input_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    let result = nbc(temp_dir.path(), &["absent.ipynb"]);

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Error:"), "{stderr}");
}
