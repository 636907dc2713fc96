//! Figure extraction.
//!
//! [`FigureStore`] writes image payloads carried by outputs to files next to
//! the converted document:
//!
//! ```text
//! {dir}/
//! +-- report.ipynb
//! +-- report.rst
//! +-- report_files/
//!     +-- report_fig_00.png
//!     +-- report_fig_01.svg
//! ```
//!
//! Names are `{root}_fig_{NN}.{ext}` with a counter that starts at zero for
//! every run and increases by one per extracted payload, so regenerating a
//! document overwrites the previous figures instead of accumulating new names.
//! Links embedded in the document are relative to the directory the document
//! is written to.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use nbc_notebook::DisplayFormat;

use crate::encoding::TextEncoding;

/// Error raised while extracting a figure.
#[derive(Debug, thiserror::Error)]
pub enum FigureError {
    #[error("Failed to create figure directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to clear figure directory {}: {source}", path.display())]
    ClearDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to decode {format} figure payload: {source}")]
    Decode {
        format: DisplayFormat,
        #[source]
        source: base64::DecodeError,
    },

    #[error("Cannot encode SVG figure as {encoding}: character {ch:?} is not representable")]
    Encode { encoding: &'static str, ch: char },

    #[error("Failed to write figure {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{0}' is not a figure format")]
    NotAFigure(DisplayFormat),
}

/// A figure file written by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    /// Location on disk.
    pub path: PathBuf,
    /// Path relative to the converted document, for embedding in output.
    pub link: String,
    /// Format of the payload.
    pub format: DisplayFormat,
}

/// Extracts figure payloads into a per-document directory.
///
/// A store belongs to one conversion engine; the counter is plain instance
/// state.
#[derive(Debug)]
pub struct FigureStore {
    root_name: String,
    files_dir: PathBuf,
    link_base: PathBuf,
    encoding: TextEncoding,
    counter: usize,
    clear_stale: bool,
    dir_ready: bool,
}

impl FigureStore {
    /// Create a store writing `{root_name}_fig_NN.ext` files into `files_dir`.
    ///
    /// Links are relative to the parent of `files_dir` until
    /// [`set_link_base`](Self::set_link_base) says otherwise.
    #[must_use]
    pub fn new(root_name: impl Into<String>, files_dir: impl Into<PathBuf>) -> Self {
        let files_dir = files_dir.into();
        let link_base = files_dir.parent().map(Path::to_path_buf).unwrap_or_default();
        Self {
            root_name: root_name.into(),
            files_dir,
            link_base,
            encoding: TextEncoding::default(),
            counter: 0,
            clear_stale: true,
            dir_ready: false,
        }
    }

    /// Create a store for an input document: figures go to `{stem}_files/`
    /// next to the input.
    #[must_use]
    pub fn for_input(infile: &Path) -> Self {
        let root = file_root(infile);
        let dir = infile.parent().unwrap_or_else(|| Path::new(""));
        Self::new(root.clone(), dir.join(format!("{root}_files")))
    }

    /// Control whether [`begin_run`](Self::begin_run) removes figures left by
    /// a previous run. Enabled by default.
    pub fn set_clear_stale(&mut self, enabled: bool) {
        self.clear_stale = enabled;
    }

    /// Encoding for SVG figures. UTF-8 by default.
    pub fn set_encoding(&mut self, encoding: TextEncoding) {
        self.encoding = encoding;
    }

    /// Directory the converted document is written to; figure links are
    /// relative to it.
    pub fn set_link_base(&mut self, dir: impl Into<PathBuf>) {
        self.link_base = dir.into();
    }

    #[must_use]
    pub fn files_dir(&self) -> &Path {
        &self.files_dir
    }

    /// Number of figures written in the current run.
    #[must_use]
    pub fn count(&self) -> usize {
        self.counter
    }

    /// Start a new run: reset the counter and clear stale figures.
    pub fn begin_run(&mut self) -> Result<(), FigureError> {
        self.counter = 0;
        self.dir_ready = false;
        if self.clear_stale {
            self.remove_dir()?;
        }
        Ok(())
    }

    /// Remove the figure directory and everything in it, if it exists.
    pub fn remove_dir(&mut self) -> Result<(), FigureError> {
        self.dir_ready = false;
        match fs::remove_dir_all(&self.files_dir) {
            Ok(()) => {
                tracing::debug!(dir = %self.files_dir.display(), "Removed figure directory");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(FigureError::ClearDir {
                path: self.files_dir.clone(),
                source,
            }),
        }
    }

    /// Write `payload` as the next figure.
    ///
    /// PNG, JPEG and PDF payloads are base64 and are decoded first (embedded
    /// whitespace is ignored); SVG is markup and is written as text in the
    /// store's encoding.
    pub fn new_figure(
        &mut self,
        payload: &str,
        format: &DisplayFormat,
    ) -> Result<Figure, FigureError> {
        let extension = format
            .figure_extension()
            .ok_or_else(|| FigureError::NotAFigure(format.clone()))?;

        let name = format!("{}_fig_{:02}.{extension}", self.root_name, self.counter);
        self.counter += 1;

        let bytes = if matches!(format, DisplayFormat::Svg) {
            self.encoding
                .encode_text(payload)
                .map_err(|ch| FigureError::Encode {
                    encoding: self.encoding.as_str(),
                    ch,
                })?
        } else {
            let compact: String = payload
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            STANDARD
                .decode(compact)
                .map_err(|source| FigureError::Decode {
                    format: format.clone(),
                    source,
                })?
        };

        self.ensure_dir()?;
        let path = self.files_dir.join(&name);
        fs::write(&path, &bytes).map_err(|source| FigureError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Wrote figure");

        let link = relative_link(&self.link_base, &path);

        Ok(Figure {
            path,
            link,
            format: format.clone(),
        })
    }

    fn ensure_dir(&mut self) -> Result<(), FigureError> {
        if !self.dir_ready {
            fs::create_dir_all(&self.files_dir).map_err(|source| FigureError::CreateDir {
                path: self.files_dir.clone(),
                source,
            })?;
            self.dir_ready = true;
        }
        Ok(())
    }
}

/// Path from directory `base` to `target`, joined with `/`.
///
/// Both sides are made absolute against the current directory first, so a
/// relative input and an absolute output still share their common prefix.
pub(crate) fn relative_link(base: &Path, target: &Path) -> String {
    let base = absolute_or_same(base);
    let target = absolute_or_same(target);
    let base_segs: Vec<Component<'_>> = base
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let target_segs: Vec<Component<'_>> = target
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let common = base_segs
        .iter()
        .zip(&target_segs)
        .take_while(|(a, b)| a == b)
        .count();

    let ups = std::iter::repeat_n("..".to_owned(), base_segs.len() - common);
    let downs = target_segs[common..]
        .iter()
        .map(|c| c.as_os_str().to_string_lossy().into_owned());
    ups.chain(downs).collect::<Vec<_>>().join("/")
}

fn absolute_or_same(path: &Path) -> PathBuf {
    let path = if path.as_os_str().is_empty() {
        Path::new(".")
    } else {
        path
    };
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// File name of `path` without its last extension.
pub(crate) fn file_root(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
