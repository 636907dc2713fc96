//! Code cell outputs.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::mime::{DisplayFormat, MimeBundle};
use crate::multiline;

/// Output kind, as named by the `output_type` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Stream,
    Pyout,
    Pyerr,
    DisplayData,
    Other(String),
}

impl OutputKind {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "stream" => Self::Stream,
            "pyout" => Self::Pyout,
            "pyerr" => Self::Pyerr,
            "display_data" => Self::DisplayData,
            other => Self::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Stream => "stream",
            Self::Pyout => "pyout",
            Self::Pyerr => "pyerr",
            Self::DisplayData => "display_data",
            Self::Other(kind) => kind,
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One result record attached to a code cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Text written to a named stream (stdout, stderr).
    Stream(StreamOutput),
    /// Value of the last expression in the cell.
    Pyout(RichOutput),
    /// Exception raised while executing the cell.
    Pyerr(ErrorOutput),
    /// Rich data published explicitly by the code.
    DisplayData(RichOutput),
    /// Output with an unrecognized `output_type`.
    Unknown(UnknownOutput),
}

/// Stream output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamOutput {
    /// Stream name, e.g. `stdout` or `stderr`.
    pub stream: String,
    #[serde(default, deserialize_with = "multiline::deserialize")]
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Expression result or display data: a bundle of alternative representations.
#[derive(Debug, Clone, PartialEq)]
pub struct RichOutput {
    /// Execution count; always `None` for display data.
    pub prompt_number: Option<i64>,
    pub data: MimeBundle,
    pub extra: Map<String, Value>,
}

/// Error output with its traceback frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorOutput {
    #[serde(default, deserialize_with = "multiline::deserialize")]
    pub ename: String,
    #[serde(default, deserialize_with = "multiline::deserialize")]
    pub evalue: String,
    #[serde(default, deserialize_with = "nullable")]
    pub traceback: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Output whose kind this model does not know.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownOutput {
    pub output_type: String,
    pub fields: Map<String, Value>,
}

impl Output {
    #[must_use]
    pub fn kind(&self) -> OutputKind {
        match self {
            Self::Stream(_) => OutputKind::Stream,
            Self::Pyout(_) => OutputKind::Pyout,
            Self::Pyerr(_) => OutputKind::Pyerr,
            Self::DisplayData(_) => OutputKind::DisplayData,
            Self::Unknown(output) => OutputKind::Other(output.output_type.clone()),
        }
    }

    /// Build an output from its JSON object.
    pub(crate) fn from_value(value: Value) -> Result<Self, String> {
        let Value::Object(mut fields) = value else {
            return Err("output is not an object".to_owned());
        };
        let output_type = match fields.remove("output_type") {
            Some(Value::String(kind)) => kind,
            Some(_) => return Err("output_type is not a string".to_owned()),
            None => return Err("output has no output_type".to_owned()),
        };

        match OutputKind::parse(&output_type) {
            OutputKind::Stream => from_fields(fields).map(Self::Stream),
            OutputKind::Pyout => Ok(Self::Pyout(RichOutput::from_fields(fields)?)),
            OutputKind::DisplayData => Ok(Self::DisplayData(RichOutput::from_fields(fields)?)),
            OutputKind::Pyerr => from_fields(fields).map(Self::Pyerr),
            OutputKind::Other(_) => Ok(Self::Unknown(UnknownOutput {
                output_type,
                fields,
            })),
        }
    }
}

/// Serializes to the notebook's JSON shape, `output_type` included.
impl Serialize for Output {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.kind();
        let output_type = kind.as_str();
        match self {
            Self::Stream(output) => Tagged { output_type, body: output }.serialize(serializer),
            Self::Pyout(output) | Self::DisplayData(output) => {
                Tagged { output_type, body: output }.serialize(serializer)
            }
            Self::Pyerr(output) => Tagged { output_type, body: output }.serialize(serializer),
            Self::Unknown(output) => Tagged {
                output_type,
                body: &output.fields,
            }
            .serialize(serializer),
        }
    }
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    output_type: &'a str,
    #[serde(flatten)]
    body: &'a T,
}

impl RichOutput {
    /// Split fields into the prompt number, `metadata`, and one representation
    /// per remaining key.
    fn from_fields(fields: Map<String, Value>) -> Result<Self, String> {
        let mut prompt_number = None;
        let mut data = MimeBundle::new();
        let mut extra = Map::new();

        for (key, value) in fields {
            match key.as_str() {
                "prompt_number" => {
                    prompt_number = Option::<i64>::deserialize(value)
                        .map_err(|e| format!("prompt_number: {e}"))?;
                }
                "metadata" => {
                    extra.insert(key, value);
                }
                tag => data.insert(DisplayFormat::parse(tag), multiline::join_lossy(&value)),
            }
        }

        Ok(Self {
            prompt_number,
            data,
            extra,
        })
    }
}

impl Serialize for RichOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(n) = self.prompt_number {
            map.serialize_entry("prompt_number", &n)?;
        }
        for (format, data) in self.data.iter() {
            map.serialize_entry(format.as_str(), data)?;
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Deserialize the fields of a known cell or output kind.
pub(crate) fn from_fields<T: DeserializeOwned>(fields: Map<String, Value>) -> Result<T, String> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| e.to_string())
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
