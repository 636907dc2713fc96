//! Benchmarks for notebook conversion throughput.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use std::fs;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use nbc_renderer::{Backend, Converter, HtmlBackend, MarkdownBackend, MarkdownOptions, RstBackend};

/// Generate a notebook with `sections` headings, each followed by prose and a
/// code cell with a result and some stream output.
fn generate_notebook(sections: usize) -> String {
    let mut cells = Vec::with_capacity(sections * 3);
    for i in 0..sections {
        cells.push(format!(
            r#"{{"cell_type": "heading", "level": 2, "source": "Section {i}"}}"#
        ));
        cells.push(format!(
            r#"{{"cell_type": "markdown", "source": ["Paragraph {i} with **bold** and *italic* text.\n", "\n", "- item\n", "- item"]}}"#
        ));
        cells.push(format!(
            r#"{{"cell_type": "code", "language": "python", "input": "x = {i}\nprint(x)\nx * 2", "prompt_number": {i},
               "outputs": [
                 {{"output_type": "stream", "stream": "stdout", "text": "{i}\n"}},
                 {{"output_type": "pyout", "prompt_number": {i}, "text": "{}"}}
               ]}}"#,
            i * 2
        ));
    }
    let mut json = String::from(r#"{"metadata": {"name": "bench"}, "nbformat": 3, "nbformat_minor": 0, "worksheets": [{"cells": ["#);
    json.push_str(&cells.join(","));
    json.push_str("]}]}");
    json
}

fn bench_backend<B: Backend>(
    c: &mut Criterion,
    name: &str,
    make_backend: impl Fn() -> B,
) {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut group = c.benchmark_group(format!("convert_{name}"));

    for sections in [10, 100] {
        let json = generate_notebook(sections);
        let path = temp_dir.path().join(format!("nb_{sections}.ipynb"));
        fs::write(&path, &json).unwrap();

        let mut converter = Converter::new(make_backend(), &path);
        converter.read().unwrap();

        group.throughput(Throughput::Bytes(json.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sections), &sections, |b, _| {
            b.iter(|| converter.convert("\n").unwrap());
        });
    }

    group.finish();
}

fn bench_rst(c: &mut Criterion) {
    bench_backend(c, "rst", RstBackend::new);
}

fn bench_markdown(c: &mut Criterion) {
    bench_backend(c, "markdown", || MarkdownBackend::new(MarkdownOptions::default()));
}

fn bench_html(c: &mut Criterion) {
    bench_backend(c, "html", HtmlBackend::new);
}

criterion_group!(benches, bench_rst, bench_markdown, bench_html);
criterion_main!(benches);
