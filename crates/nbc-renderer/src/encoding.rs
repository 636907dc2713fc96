//! Output text encodings.

use std::fmt;
use std::str::FromStr;

use crate::error::ConvertError;

/// Encoding used when writing the converted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// ISO-8859-1: code points up to U+00FF, one byte each.
    Latin1,
    Ascii,
}

impl TextEncoding {
    /// Parse an encoding name, ignoring case and `-`/`_` separators.
    ///
    /// # Examples
    ///
    /// ```
    /// use nbc_renderer::TextEncoding;
    ///
    /// assert_eq!(TextEncoding::parse("UTF-8"), Some(TextEncoding::Utf8));
    /// assert_eq!(TextEncoding::parse("iso-8859-1"), Some(TextEncoding::Latin1));
    /// assert_eq!(TextEncoding::parse("koi8-r"), None);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "utf8" => Some(Self::Utf8),
            "latin1" | "iso88591" | "l1" => Some(Self::Latin1),
            "ascii" | "usascii" => Some(Self::Ascii),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
            Self::Ascii => "ascii",
        }
    }

    /// Encode `text`, failing on the first character the encoding cannot
    /// represent.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, ConvertError> {
        self.encode_text(text).map_err(|ch| ConvertError::Encode {
            encoding: self.as_str(),
            ch,
        })
    }

    /// Encode `text`, returning the first unrepresentable character on failure.
    pub(crate) fn encode_text(self, text: &str) -> Result<Vec<u8>, char> {
        let limit = match self {
            Self::Utf8 => return Ok(text.as_bytes().to_vec()),
            Self::Latin1 => 0xFF,
            Self::Ascii => 0x7F,
        };
        text.chars()
            .map(|ch| {
                u8::try_from(u32::from(ch))
                    .ok()
                    .filter(|&b| u32::from(b) <= limit)
                    .ok_or(ch)
            })
            .collect()
    }
}

impl FromStr for TextEncoding {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ConvertError::UnsupportedEncoding(s.to_owned()))
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_passthrough() {
        assert_eq!(TextEncoding::Utf8.encode("é").unwrap(), "é".as_bytes());
    }

    #[test]
    fn test_latin1_single_bytes() {
        assert_eq!(TextEncoding::Latin1.encode("café").unwrap(), b"caf\xe9");
    }

    #[test]
    fn test_latin1_rejects_wide_characters() {
        let err = TextEncoding::Latin1.encode("€").unwrap_err();
        assert!(matches!(err, ConvertError::Encode { ch: '€', .. }));
    }

    #[test]
    fn test_ascii_rejects_accents() {
        let err = TextEncoding::Ascii.encode("é").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot encode output as ascii: character 'é' is not representable"
        );
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "ebcdic".parse::<TextEncoding>().unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedEncoding(name) if name == "ebcdic"));
    }
}
