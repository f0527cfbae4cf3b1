//! JSON pattern documents
//!
//! A document is a pattern tree. A bare `"#rrggbb"` string is a solid
//! color; an object names its pattern in `_type` and carries the pattern's
//! parameters, with nested documents for children:
//!
//! ```json
//! {"_type": "Loop", "show_ms": 2000, "patterns": ["#ff0000", {"_type": "Rainbow"}]}
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;

use crate::{
    color::{Rgb, parse_hex},
    error::StartupError,
    pattern::{PatternKind, PatternNode, StaticColor},
};

/// Deserialize a `#rrggbb` string into a color
pub(crate) fn de_color<'de, D>(deserializer: D) -> Result<Rgb, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_hex(&raw).map_err(D::Error::custom)
}

impl<'de> Deserialize<'de> for PatternNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(raw) => parse_hex(&raw)
                .map(|color| StaticColor::new(color).into())
                .map_err(D::Error::custom),
            value @ Value::Object(_) => PatternKind::deserialize(value)
                .map(PatternNode)
                .map_err(D::Error::custom),
            other => Err(D::Error::custom(format!(
                "expected a color string or a pattern object, found {other}"
            ))),
        }
    }
}

impl PatternNode {
    /// Parse a pattern document
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Where the pattern document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSource {
    /// Path to a file holding the document
    File(PathBuf),
    /// The document itself
    Inline(String),
}

impl PatternSource {
    /// Pick the source from mutually exclusive file and inline options
    pub fn from_options(file: Option<PathBuf>, inline: Option<String>) -> Result<Self, StartupError> {
        match (file, inline) {
            (Some(_), Some(_)) => Err(StartupError::PatternSource(
                "a pattern file and an inline pattern can't be used together",
            )),
            (Some(path), None) => Ok(Self::File(path)),
            (None, Some(raw)) => Ok(Self::Inline(raw)),
            (None, None) => Err(StartupError::PatternSource(
                "a pattern file or an inline pattern is required, e.g. -r '\"#0101ff\"'",
            )),
        }
    }

    /// Read and parse the document
    pub fn load(&self) -> Result<PatternNode, StartupError> {
        match self {
            Self::File(path) => {
                let raw = read(path)?;
                PatternNode::from_json(&raw).map_err(StartupError::Pattern)
            }
            Self::Inline(raw) => PatternNode::from_json(raw).map_err(StartupError::Pattern),
        }
    }
}

fn read(path: &Path) -> Result<String, StartupError> {
    std::fs::read_to_string(path).map_err(|source| StartupError::Io {
        path: path.to_path_buf(),
        source,
    })
}
