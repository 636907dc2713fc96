//! Notebook cells.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::multiline;
use crate::output::{Output, from_fields};

/// Cell kind, as named by the `cell_type` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKind {
    Heading,
    Markdown,
    Code,
    Raw,
    /// Any other `cell_type` string.
    Other(String),
}

impl CellKind {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "heading" => Self::Heading,
            "markdown" => Self::Markdown,
            "code" => Self::Code,
            "raw" => Self::Raw,
            other => Self::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Heading => "heading",
            Self::Markdown => "markdown",
            Self::Code => "code",
            Self::Raw => "raw",
            Self::Other(kind) => kind,
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One document unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Heading(HeadingCell),
    Markdown(TextCell),
    Code(CodeCell),
    Raw(TextCell),
    Unknown(UnknownCell),
}

/// Heading cell with a level between 1 and 6.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingCell {
    #[serde(deserialize_with = "heading_level")]
    pub level: u8,
    #[serde(default, deserialize_with = "multiline::deserialize")]
    pub source: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Markdown or raw text cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCell {
    #[serde(default, deserialize_with = "multiline::deserialize")]
    pub source: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Code cell with its input and outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeCell {
    /// Source code; empty for cells that were executed without input.
    #[serde(default, deserialize_with = "multiline::deserialize")]
    pub input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub prompt_number: Option<i64>,
    #[serde(default, deserialize_with = "outputs")]
    pub outputs: Vec<Output>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Cell with an unrecognized `cell_type`, kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownCell {
    pub cell_type: String,
    pub fields: Map<String, Value>,
}

impl TextCell {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            extra: Map::new(),
        }
    }
}

impl HeadingCell {
    #[must_use]
    pub fn new(level: u8, source: impl Into<String>) -> Self {
        Self {
            level,
            source: source.into(),
            extra: Map::new(),
        }
    }
}

impl CodeCell {
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            language: Some("python".to_owned()),
            prompt_number: None,
            outputs: Vec::new(),
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_prompt_number(mut self, n: i64) -> Self {
        self.prompt_number = Some(n);
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: Output) -> Self {
        self.outputs.push(output);
        self
    }
}

impl Cell {
    #[must_use]
    pub fn kind(&self) -> CellKind {
        match self {
            Self::Heading(_) => CellKind::Heading,
            Self::Markdown(_) => CellKind::Markdown,
            Self::Code(_) => CellKind::Code,
            Self::Raw(_) => CellKind::Raw,
            Self::Unknown(cell) => CellKind::Other(cell.cell_type.clone()),
        }
    }

    /// Build a cell from its JSON object.
    ///
    /// `cell_type` picks the struct; a type this model does not know keeps
    /// its remaining fields as an [`UnknownCell`].
    pub(crate) fn from_value(value: Value) -> Result<Self, String> {
        let Value::Object(mut fields) = value else {
            return Err("cell is not an object".to_owned());
        };
        let cell_type = match fields.remove("cell_type") {
            Some(Value::String(kind)) => kind,
            Some(_) => return Err("cell_type is not a string".to_owned()),
            None => return Err("cell has no cell_type".to_owned()),
        };

        match CellKind::parse(&cell_type) {
            CellKind::Heading => from_fields(fields).map(Self::Heading),
            CellKind::Markdown => from_fields(fields).map(Self::Markdown),
            CellKind::Raw => from_fields(fields).map(Self::Raw),
            CellKind::Code => from_fields(fields).map(Self::Code),
            CellKind::Other(_) => Ok(Self::Unknown(UnknownCell { cell_type, fields })),
        }
    }
}

/// Serializes to the notebook's JSON shape, `cell_type` included.
impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.kind();
        let cell_type = kind.as_str();
        match self {
            Self::Heading(cell) => Tagged { cell_type, body: cell }.serialize(serializer),
            Self::Markdown(cell) | Self::Raw(cell) => {
                Tagged { cell_type, body: cell }.serialize(serializer)
            }
            Self::Code(cell) => Tagged { cell_type, body: cell }.serialize(serializer),
            Self::Unknown(cell) => Tagged {
                cell_type,
                body: &cell.fields,
            }
            .serialize(serializer),
        }
    }
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    cell_type: &'a str,
    #[serde(flatten)]
    body: &'a T,
}

fn heading_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let level = u64::deserialize(deserializer)?;
    u8::try_from(level)
        .ok()
        .filter(|level| (1..=6).contains(level))
        .ok_or_else(|| D::Error::custom(format!("heading level {level} is outside 1-6")))
}

/// Outputs list; `null` reads as empty and errors name the output's position.
fn outputs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Output>, D::Error> {
    Option::<Vec<Value>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, output)| {
            Output::from_value(output).map_err(|e| D::Error::custom(format!("output {i}: {e}")))
        })
        .collect()
}
