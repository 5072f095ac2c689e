//! JSON rendering of collected search results.

use std::str::FromStr;

use lingo_service_types::SearchResult;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::OutputError;

/// Indent unit used by `json-pretty`.
const PRETTY_INDENT: &[u8] = b" ";

/// Supported result encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultFormat {
    /// Compact JSON array.
    Json,
    /// Indented JSON array.
    JsonPretty,
}

impl FromStr for ResultFormat {
    type Err = OutputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "json" => Ok(Self::Json),
            "json-pretty" => Ok(Self::JsonPretty),
            other => Err(OutputError::UnknownFormat(other.to_owned())),
        }
    }
}

/// Rendered results and the number of records they hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResults {
    text: String,
    count: usize,
}

impl RenderedResults {
    /// Rendered document.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of results in the document.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }
}

/// Renders `results` in the format named by `selector`.
///
/// # Errors
///
/// Returns [`OutputError::UnknownFormat`] for an unrecognised selector and
/// [`OutputError::Serialise`] if encoding fails.
pub fn render(results: &[SearchResult], selector: &str) -> Result<RenderedResults, OutputError> {
    let format = selector.parse::<ResultFormat>()?;
    let text = match format {
        ResultFormat::Json => serde_json::to_string(results).map_err(serialise_error)?,
        ResultFormat::JsonPretty => to_pretty_string(results)?,
    };
    Ok(RenderedResults {
        text,
        count: results.len(),
    })
}

fn to_pretty_string(results: &[SearchResult]) -> Result<String, OutputError> {
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(PRETTY_INDENT));
    results
        .serialize(&mut serializer)
        .map_err(serialise_error)?;
    // serde_json only ever emits UTF-8.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn serialise_error(source: serde_json::Error) -> OutputError {
    OutputError::Serialise {
        subject: "results",
        source,
    }
}
