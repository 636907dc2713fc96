//! Notebook conversion command.

use std::path::PathBuf;

use clap::Args;
use nbc_config::{CliSettings, Config};
use nbc_renderer::{
    ConvertOptions, DEFAULT_MATHJAX_URL, MarkdownOptions, OutputFormat, PyOptions, TextEncoding,
    convert_file,
};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for converting a notebook.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Notebook file to convert.
    input: PathBuf,

    /// Output format: rst, html, latex, markdown or py (default: rst).
    #[arg(short, long, env = "NBC_FORMAT")]
    format: Option<String>,

    /// Path to configuration file (default: auto-discover nbc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file (default: input path with the format's extension).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output encoding: utf-8, latin-1 or ascii (overrides config).
    #[arg(long)]
    encoding: Option<String>,

    /// Keep figure files from previous runs.
    #[arg(long)]
    keep_figures: bool,

    /// Render raw cells as literal blocks.
    #[arg(long)]
    raw_as_verbatim: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ConvertArgs {
    /// Execute the conversion.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the format or encoding is
    /// unknown, or the conversion fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            format: self.format,
            encoding: self.encoding,
            clear_figures: self.keep_figures.then_some(false),
            raw_as_verbatim: self.raw_as_verbatim.then_some(true),
            output: self.output,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let format: OutputFormat = config.convert.format.parse()?;
        let options = convert_options(&config)?;

        tracing::info!(input = %self.input.display(), format = %format, "Converting notebook");
        let summary = convert_file(&self.input, format, &options)?;

        for warning in &summary.warnings {
            output.warning(&format!("Warning: {warning}"));
        }
        if summary.figures > 0 {
            output.info(&format!("Extracted {} figure(s)", summary.figures));
        }
        output.success(&format!("Wrote {}", summary.output_path.display()));
        Ok(())
    }
}

/// Map loaded configuration onto renderer options.
fn convert_options(config: &Config) -> Result<ConvertOptions, CliError> {
    let encoding: TextEncoding = config.convert.encoding.parse()?;
    let html = &config.html_resolved;
    let mathjax_url = html.mathjax.then(|| {
        html.mathjax_url
            .clone()
            .unwrap_or_else(|| DEFAULT_MATHJAX_URL.to_owned())
    });

    Ok(ConvertOptions {
        outfile: config.output.clone(),
        encoding,
        clear_figures: config.convert.clear_figures,
        raw_as_verbatim: config.convert.raw_as_verbatim,
        markdown: MarkdownOptions {
            highlight_source: config.markdown.highlight_source,
            show_prompts: config.markdown.show_prompts,
            inline_prompt: config.markdown.inline_prompt,
        },
        py: PyOptions {
            show_prompts: config.py.show_prompts,
            show_output: config.py.show_output,
        },
        stylesheets: html.stylesheets.clone(),
        mathjax_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbc_renderer::ConvertError;

    #[test]
    fn test_default_config_maps_to_default_options() {
        let options = convert_options(&Config::default()).unwrap();
        let defaults = ConvertOptions::default();

        assert_eq!(options.encoding, defaults.encoding);
        assert_eq!(options.clear_figures, defaults.clear_figures);
        assert_eq!(options.markdown, defaults.markdown);
        assert_eq!(options.py, defaults.py);
        assert_eq!(options.mathjax_url, defaults.mathjax_url);
        assert!(options.outfile.is_none());
    }

    #[test]
    fn test_mathjax_disabled() {
        let mut config = Config::default();
        config.html_resolved.mathjax = false;
        let options = convert_options(&config).unwrap();
        assert!(options.mathjax_url.is_none());
    }

    #[test]
    fn test_unsupported_encoding() {
        let mut config = Config::default();
        config.convert.encoding = "ebcdic".to_owned();
        let err = convert_options(&config).unwrap_err();
        assert!(matches!(
            err,
            CliError::Convert(ConvertError::UnsupportedEncoding(_))
        ));
    }
}
