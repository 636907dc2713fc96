//! nbc CLI - Notebook converter.
//!
//! Converts an IPython notebook into reStructuredText, HTML, LaTeX, Markdown
//! or a Python script, extracting figures next to the output.

mod convert;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use convert::ConvertArgs;
use output::Output;

/// nbc - Notebook converter.
#[derive(Parser)]
#[command(name = "nbc", version, about)]
struct Cli {
    #[command(flatten)]
    convert: ConvertArgs,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // Initialize tracing with appropriate log level
    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.convert.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.convert.execute(&output) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
