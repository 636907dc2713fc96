//! Notebook document model for nbc.
//!
//! A [`Notebook`] is an ordered sequence of [`Worksheet`]s, each holding an
//! ordered sequence of [`Cell`]s. Code cells carry [`Output`]s, and rich
//! outputs carry a [`MimeBundle`] of representations keyed by
//! [`DisplayFormat`].
//!
//! The model is read-only once parsed: conversion walks it immutably, and the
//! helpers in [`transform`] return new values instead of editing cells in place.
//!
//! # Example
//!
//! ```
//! use nbc_notebook::{Cell, parse_notebook};
//!
//! let json = r##"{
//!   "metadata": {"name": "demo"},
//!   "nbformat": 3,
//!   "nbformat_minor": 0,
//!   "worksheets": [{"cells": [
//!     {"cell_type": "heading", "level": 1, "source": "Demo"}
//!   ]}]
//! }"##;
//!
//! let notebook = parse_notebook(json).unwrap();
//! assert_eq!(notebook.name(), Some("demo"));
//! assert!(matches!(notebook.cells().next(), Some(Cell::Heading(_))));
//! ```

mod cell;
mod error;
mod mime;
mod multiline;
mod notebook;
mod output;
mod reader;
pub mod transform;

pub use cell::{Cell, CellKind, CodeCell, HeadingCell, TextCell, UnknownCell};
pub use error::{NotebookError, Result};
pub use mime::{DisplayFormat, MimeBundle};
pub use notebook::{Notebook, Worksheet};
pub use output::{ErrorOutput, Output, OutputKind, RichOutput, StreamOutput, UnknownOutput};
pub use reader::{parse_notebook, read_notebook};
