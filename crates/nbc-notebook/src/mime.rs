//! Display formats and representation bundles.

use std::collections::BTreeMap;
use std::fmt;

/// Tag identifying one representation carried by an output.
///
/// Variant order is the order in which a bundle's representations are visited.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DisplayFormat {
    Text,
    Html,
    Latex,
    Json,
    Javascript,
    Png,
    Jpeg,
    Svg,
    Pdf,
    /// Any tag without a dedicated variant.
    Other(String),
}

impl DisplayFormat {
    /// Parse a representation key as it appears in the notebook file.
    ///
    /// Both `jpeg` and `jpg` map to [`DisplayFormat::Jpeg`].
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag {
            "text" => Self::Text,
            "html" => Self::Html,
            "latex" => Self::Latex,
            "json" => Self::Json,
            "javascript" => Self::Javascript,
            "png" => Self::Png,
            "jpeg" | "jpg" => Self::Jpeg,
            "svg" => Self::Svg,
            "pdf" => Self::Pdf,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Key used when writing this representation back to a notebook.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::Latex => "latex",
            Self::Json => "json",
            Self::Javascript => "javascript",
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
            Self::Other(tag) => tag,
        }
    }

    /// File extension for image-like formats, `None` for everything else.
    #[must_use]
    pub fn figure_extension(&self) -> Option<&'static str> {
        match self {
            Self::Png => Some("png"),
            Self::Jpeg => Some("jpg"),
            Self::Svg => Some("svg"),
            Self::Pdf => Some("pdf"),
            _ => None,
        }
    }

    /// Whether this format is extracted to a figure file.
    #[must_use]
    pub fn is_figure(&self) -> bool {
        self.figure_extension().is_some()
    }
}

impl fmt::Display for DisplayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representations carried by a single output, keyed by format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MimeBundle {
    entries: BTreeMap<DisplayFormat, String>,
}

impl MimeBundle {
    /// Create an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a representation.
    pub fn insert(&mut self, format: DisplayFormat, data: impl Into<String>) {
        self.entries.insert(format, data.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, format: DisplayFormat, data: impl Into<String>) -> Self {
        self.insert(format, data);
        self
    }

    /// Payload for `format`, if present.
    #[must_use]
    pub fn get(&self, format: &DisplayFormat) -> Option<&str> {
        self.entries.get(format).map(String::as_str)
    }

    /// Whether the bundle carries `format`.
    #[must_use]
    pub fn contains(&self, format: &DisplayFormat) -> bool {
        self.entries.contains_key(format)
    }

    /// Shorthand for the `text` representation.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.get(&DisplayFormat::Text)
    }

    /// Iterate representations in [`DisplayFormat`] order.
    pub fn iter(&self) -> impl Iterator<Item = (&DisplayFormat, &str)> {
        self.entries.iter().map(|(format, data)| (format, data.as_str()))
    }

    /// First format in `preference` that the bundle carries.
    #[must_use]
    pub fn first_of<'a>(&self, preference: &'a [DisplayFormat]) -> Option<&'a DisplayFormat> {
        preference.iter().find(|format| self.contains(format))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tags() {
        assert_eq!(DisplayFormat::parse("html"), DisplayFormat::Html);
        assert_eq!(DisplayFormat::parse("jpg"), DisplayFormat::Jpeg);
        assert_eq!(DisplayFormat::parse("jpeg"), DisplayFormat::Jpeg);
        assert_eq!(
            DisplayFormat::parse("widget"),
            DisplayFormat::Other("widget".to_owned())
        );
    }

    #[test]
    fn test_figure_extension() {
        assert_eq!(DisplayFormat::Jpeg.figure_extension(), Some("jpg"));
        assert_eq!(DisplayFormat::Svg.figure_extension(), Some("svg"));
        assert_eq!(DisplayFormat::Text.figure_extension(), None);
        assert!(!DisplayFormat::Other("png2".to_owned()).is_figure());
    }

    #[test]
    fn test_bundle_iterates_in_format_order() {
        let bundle = MimeBundle::new()
            .with(DisplayFormat::Png, "iVBO")
            .with(DisplayFormat::Other("zzz".to_owned()), "?")
            .with(DisplayFormat::Text, "<Figure>");

        let formats: Vec<_> = bundle.iter().map(|(f, _)| f.as_str().to_owned()).collect();
        assert_eq!(formats, vec!["text", "png", "zzz"]);
    }

    #[test]
    fn test_first_of_preference() {
        let bundle = MimeBundle::new()
            .with(DisplayFormat::Text, "2")
            .with(DisplayFormat::Latex, "$2$");
        let preference = [DisplayFormat::Html, DisplayFormat::Latex, DisplayFormat::Text];
        assert_eq!(bundle.first_of(&preference), Some(&DisplayFormat::Latex));
        assert_eq!(bundle.first_of(&[DisplayFormat::Png]), None);
    }
}
