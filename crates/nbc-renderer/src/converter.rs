//! Conversion engine.
//!
//! [`Converter`] owns one conversion: the input path, the parsed notebook, the
//! figure store and the backend. It walks worksheets and cells in document
//! order, dispatches each cell, and assembles the document text.

use std::fs;
use std::path::{Path, PathBuf};

use nbc_notebook::transform::normalize_cell;
use nbc_notebook::{Notebook, read_notebook};

use crate::backend::{Backend, DocumentInfo, RenderContext};
use crate::dispatch::render_cell;
use crate::encoding::TextEncoding;
use crate::error::ConvertError;
use crate::figure::{FigureStore, file_root};

/// Converts one notebook file with a backend.
///
/// # Example
///
/// ```no_run
/// use nbc_renderer::{Converter, RstBackend};
///
/// let mut converter = Converter::new(RstBackend::new(), "analysis.ipynb");
/// let written = converter.render()?;
/// assert!(written.ends_with("analysis.rst"));
/// # Ok::<(), nbc_renderer::ConvertError>(())
/// ```
pub struct Converter<B: Backend> {
    backend: B,
    infile: PathBuf,
    infile_root: String,
    outbase: PathBuf,
    outfile: Option<PathBuf>,
    encoding: TextEncoding,
    figures: FigureStore,
    notebook: Option<Notebook>,
    output: String,
    warnings: Vec<String>,
}

impl<B: Backend> Converter<B> {
    /// Create a converter for `infile`.
    ///
    /// Nothing is read until [`read`](Self::read), [`convert`](Self::convert)
    /// or [`render`](Self::render) is called.
    pub fn new(backend: B, infile: impl Into<PathBuf>) -> Self {
        let infile = infile.into();
        let infile_root = file_root(&infile);
        let outbase = infile
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&infile_root);
        Self {
            figures: FigureStore::for_input(&infile),
            backend,
            infile,
            infile_root,
            outbase,
            outfile: None,
            encoding: TextEncoding::default(),
            notebook: None,
            output: String::new(),
            warnings: Vec::new(),
        }
    }

    /// Use an already parsed notebook instead of reading `infile`.
    #[must_use]
    pub fn with_notebook(mut self, notebook: Notebook) -> Self {
        self.notebook = Some(notebook);
        self
    }

    /// Whether figures from a previous run are removed before converting.
    /// Enabled by default.
    #[must_use]
    pub fn with_clear_figures(mut self, enabled: bool) -> Self {
        self.figures.set_clear_stale(enabled);
        self
    }

    /// Encoding of the document and of SVG figures. The document encoding can
    /// still be overridden per [`save`](Self::save).
    #[must_use]
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self.figures.set_encoding(encoding);
        self
    }

    /// Write to `outfile` instead of `{input_base}.{extension}`.
    ///
    /// Figures stay in `{input_base}_files/` next to the input; their links
    /// are made relative to the directory of `outfile`.
    #[must_use]
    pub fn with_outfile(mut self, outfile: impl Into<PathBuf>) -> Self {
        let outfile = outfile.into();
        self.figures
            .set_link_base(outfile.parent().unwrap_or_else(|| Path::new("")));
        self.outfile = Some(outfile);
        self
    }

    /// Parse the input file, replacing any notebook already held.
    pub fn read(&mut self) -> Result<&Notebook, ConvertError> {
        let notebook = read_notebook(&self.infile)?;
        Ok(&*self.notebook.insert(notebook))
    }

    /// Convert the notebook, joining cell blocks with `cell_separator`.
    ///
    /// Reads the input first if no notebook is held yet. Each call is a new
    /// run: the figure counter restarts and stale figures are cleared.
    pub fn convert(&mut self, cell_separator: &str) -> Result<String, ConvertError> {
        let notebook = match self.notebook.take() {
            Some(notebook) => notebook,
            None => read_notebook(&self.infile)?,
        };
        let result = self.convert_notebook(&notebook, cell_separator);
        self.notebook = Some(notebook);
        result
    }

    fn convert_notebook(
        &mut self,
        notebook: &Notebook,
        cell_separator: &str,
    ) -> Result<String, ConvertError> {
        self.warnings.clear();
        self.figures.begin_run()?;

        let info = DocumentInfo {
            name: &self.infile_root,
            notebook,
        };
        let mut lines = self.backend.optional_header(&info);

        let mut cx = RenderContext::new(&mut self.figures, &mut self.warnings);
        let mut blocks = Vec::new();
        for cell in notebook.cells() {
            let cell = normalize_cell(cell);
            let cell_lines = render_cell(&mut self.backend, &cell, &mut cx)?;
            blocks.push(cell_lines.join("\n"));
        }

        lines.extend(blocks.join(cell_separator).split('\n').map(str::to_owned));
        lines.extend(self.backend.optional_footer(&info));
        let document = self.backend.finish(lines.join("\n"))?;

        if !self.backend.uses_figures() {
            self.figures.remove_dir()?;
        }

        tracing::info!(
            input = %self.infile.display(),
            backend = self.backend.name(),
            cells = blocks.len(),
            figures = self.figures.count(),
            warnings = self.warnings.len(),
            "Converted notebook"
        );
        Ok(document)
    }

    /// Read if needed, convert with the backend's separator, and save.
    ///
    /// Returns the absolute path of the written file.
    pub fn render(&mut self) -> Result<PathBuf, ConvertError> {
        let separator = self.backend.cell_separator();
        self.output = self.convert(separator)?;
        self.save(self.outfile.as_deref(), None)
    }

    /// Write the last converted output.
    ///
    /// `outfile` defaults to the configured output file, then to
    /// `{input_base}.{extension}`; `encoding` defaults to the converter's.
    pub fn save(
        &self,
        outfile: Option<&Path>,
        encoding: Option<TextEncoding>,
    ) -> Result<PathBuf, ConvertError> {
        let path = outfile
            .or(self.outfile.as_deref())
            .map_or_else(|| self.default_output_path(), Path::to_path_buf);
        let bytes = encoding.unwrap_or(self.encoding).encode(&self.output)?;

        fs::write(&path, bytes).map_err(|source| ConvertError::Write {
            path: path.clone(),
            source,
        })?;

        let path = std::path::absolute(&path).unwrap_or(path);
        tracing::info!(path = %path.display(), "Wrote output");
        Ok(path)
    }

    /// `{input_base}.{extension}` next to the input file.
    #[must_use]
    pub fn default_output_path(&self) -> PathBuf {
        let mut path = self.outbase.clone().into_os_string();
        path.push(".");
        path.push(self.backend.extension());
        PathBuf::from(path)
    }

    /// Text produced by the last [`render`](Self::render).
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Warnings recorded during the last conversion.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Number of figures written during the last conversion.
    #[must_use]
    pub fn figure_count(&self) -> usize {
        self.figures.count()
    }

    /// Directory figures are written to.
    #[must_use]
    pub fn figures_dir(&self) -> &Path {
        self.figures.files_dir()
    }
}
