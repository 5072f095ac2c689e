//! Requests sent from the CLI to the flow service.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

/// Single request issued at the start of a service connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServiceRequest {
    /// Runs the query document and streams back matches.
    Search(SearchRequest),
    /// Requests documentation for one fact of a lexicon.
    DescribeFact(DescribeFactRequest),
}

impl ServiceRequest {
    /// Writes the request as one JSON line and flushes the writer.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] when serialisation or the underlying write
    /// fails. Serialisation failures are reported as
    /// [`io::ErrorKind::InvalidData`].
    pub fn write_jsonl<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        serde_json::to_writer(&mut *writer, self)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

/// Query payload forwarded verbatim to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Contents of the query document.
    pub dotlingo: String,
}

impl SearchRequest {
    /// Wraps a query document.
    #[must_use]
    pub fn new(dotlingo: impl Into<String>) -> Self {
        Self {
            dotlingo: dotlingo.into(),
        }
    }
}

/// Identifies a fact within a published lexicon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescribeFactRequest {
    /// Lexicon owner, for example `codelingo`.
    pub owner: String,
    /// Lexicon name, for example `go`.
    pub lexicon: String,
    /// Fact name, for example `func_decl`.
    pub fact: String,
    /// Lexicon version; the service picks the latest release when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}
