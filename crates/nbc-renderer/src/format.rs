//! Output format selection and one-call file conversion.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::backend::Backend;
use crate::converter::Converter;
use crate::encoding::TextEncoding;
use crate::error::ConvertError;
use crate::formats::{
    DEFAULT_MATHJAX_URL, HtmlBackend, LatexBackend, MarkdownBackend, MarkdownOptions, PyBackend,
    PyOptions, RstBackend,
};

/// Output format selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Rst,
    Html,
    Latex,
    Markdown,
    Py,
}

impl OutputFormat {
    /// Every selectable format, in the order they are listed to users.
    pub const ALL: [Self; 5] = [
        Self::Rst,
        Self::Html,
        Self::Latex,
        Self::Markdown,
        Self::Py,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rst => "rst",
            Self::Html => "html",
            Self::Latex => "latex",
            Self::Markdown => "markdown",
            Self::Py => "py",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConvertError;

    /// # Examples
    ///
    /// ```
    /// use nbc_renderer::OutputFormat;
    ///
    /// assert_eq!("markdown".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
    /// assert!("bogus".parse::<OutputFormat>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| ConvertError::UnknownFormat(s.to_owned()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for [`convert_file`].
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Output path; defaults to `{input_base}.{extension}`.
    pub outfile: Option<PathBuf>,
    pub encoding: TextEncoding,
    /// Remove figures left by a previous run before converting.
    pub clear_figures: bool,
    pub raw_as_verbatim: bool,
    pub markdown: MarkdownOptions,
    pub py: PyOptions,
    /// CSS files embedded in HTML output, in order.
    pub stylesheets: Vec<PathBuf>,
    /// MathJax script for HTML output; `None` omits it.
    pub mathjax_url: Option<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            outfile: None,
            encoding: TextEncoding::default(),
            clear_figures: true,
            raw_as_verbatim: false,
            markdown: MarkdownOptions::default(),
            py: PyOptions::default(),
            stylesheets: Vec::new(),
            mathjax_url: Some(DEFAULT_MATHJAX_URL.to_owned()),
        }
    }
}

/// Result of a successful [`convert_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    /// Absolute path of the written document.
    pub output_path: PathBuf,
    /// Number of figure files written.
    pub figures: usize,
    /// Unknown-structure warnings raised while converting.
    pub warnings: Vec<String>,
}

/// Convert `infile` to `format` and write the result.
pub fn convert_file(
    infile: &Path,
    format: OutputFormat,
    options: &ConvertOptions,
) -> Result<ConvertSummary, ConvertError> {
    let raw = options.raw_as_verbatim;
    match format {
        OutputFormat::Rst => run(RstBackend::new().with_raw_as_verbatim(raw), infile, options),
        OutputFormat::Html => {
            let mut backend = HtmlBackend::new()
                .with_mathjax_url(options.mathjax_url.clone())
                .with_raw_as_verbatim(raw);
            for path in &options.stylesheets {
                let css = fs::read_to_string(path).map_err(|source| ConvertError::Stylesheet {
                    path: path.clone(),
                    source,
                })?;
                backend = backend.with_stylesheet(css);
            }
            run(backend, infile, options)
        }
        OutputFormat::Latex => run(LatexBackend::new().with_raw_as_verbatim(raw), infile, options),
        OutputFormat::Markdown => run(
            MarkdownBackend::new(options.markdown).with_raw_as_verbatim(raw),
            infile,
            options,
        ),
        OutputFormat::Py => run(
            PyBackend::new(options.py).with_raw_as_verbatim(raw),
            infile,
            options,
        ),
    }
}

fn run<B: Backend>(
    backend: B,
    infile: &Path,
    options: &ConvertOptions,
) -> Result<ConvertSummary, ConvertError> {
    let mut converter = Converter::new(backend, infile)
        .with_clear_figures(options.clear_figures)
        .with_encoding(options.encoding);
    if let Some(outfile) = &options.outfile {
        converter = converter.with_outfile(outfile);
    }

    let output_path = converter.render()?;
    Ok(ConvertSummary {
        output_path,
        figures: converter.figure_count(),
        warnings: converter.warnings().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_formats() {
        for format in OutputFormat::ALL {
            assert_eq!(format.as_str().parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_unknown_format_lists_known() {
        let err = "bogus".parse::<OutputFormat>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown format 'bogus', known formats are: rst, html, latex, markdown, py"
        );
    }

    #[test]
    fn test_default_options() {
        let options = ConvertOptions::default();
        assert!(options.clear_figures);
        assert_eq!(options.encoding, TextEncoding::Utf8);
        assert_eq!(options.mathjax_url.as_deref(), Some(DEFAULT_MATHJAX_URL));
    }

    #[test]
    fn test_missing_stylesheet() {
        let temp_dir = tempfile::tempdir().unwrap();
        let options = ConvertOptions {
            stylesheets: vec![temp_dir.path().join("missing.css")],
            ..ConvertOptions::default()
        };
        let err = convert_file(
            &temp_dir.path().join("nb.ipynb"),
            OutputFormat::Html,
            &options,
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::Stylesheet { .. }));
    }
}
