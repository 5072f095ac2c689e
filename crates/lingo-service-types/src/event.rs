//! Events streamed from the flow service back to the CLI.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One line of the service response stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServiceEvent {
    /// A match produced by a search.
    Result {
        /// The service-defined match record.
        result: SearchResult,
    },
    /// A non-fatal error raised while the service evaluated the request.
    Error {
        /// Human-readable description supplied by the service.
        message: String,
    },
    /// The service will send nothing further on the named channel.
    Close {
        /// Channel being closed.
        channel: EventChannel,
    },
    /// Documentation for a single fact.
    FactDescription {
        /// The fact documentation.
        description: FactDescription,
    },
}

/// Logical channels multiplexed over a search connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventChannel {
    /// Carries [`ServiceEvent::Result`] events.
    Results,
    /// Carries [`ServiceEvent::Error`] events.
    Errors,
}

/// Opaque match record.
///
/// The client never looks inside a result; it only collects and re-encodes
/// it, so the payload is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchResult(Value);

impl SearchResult {
    /// Wraps a JSON value.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrows the underlying JSON value.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for SearchResult {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Documentation published for a lexicon fact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactDescription {
    /// Prose description of the fact.
    #[serde(default)]
    pub description: String,
    /// Example query text using the fact.
    #[serde(default)]
    pub examples: String,
    /// Properties the fact exposes.
    #[serde(default)]
    pub properties: Vec<FactProperty>,
}

/// A named property of a fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactProperty {
    /// Property name.
    pub name: String,
    /// What the property holds.
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("{\"kind\":\"result\",\"result\":{\"id\":1}}", ServiceEvent::Result { result: SearchResult::new(json!({"id": 1})) })]
    #[case("{\"kind\":\"error\",\"message\":\"boom\"}", ServiceEvent::Error { message: String::from("boom") })]
    #[case("{\"kind\":\"close\",\"channel\":\"errors\"}", ServiceEvent::Close { channel: EventChannel::Errors })]
    fn decodes_stream_events(#[case] line: &str, #[case] expected: ServiceEvent) {
        let event: ServiceEvent = serde_json::from_str(line).expect("decode event");
        assert_eq!(event, expected);
    }

    #[test]
    fn fact_description_tolerates_missing_fields() {
        let line = "{\"kind\":\"fact_description\",\"description\":{\"description\":\"A function.\"}}";
        let event: ServiceEvent = serde_json::from_str(line).expect("decode event");
        let ServiceEvent::FactDescription { description } = event else {
            panic!("expected fact description, got {event:?}");
        };
        assert_eq!(description.description, "A function.");
        assert!(description.examples.is_empty());
        assert!(description.properties.is_empty());
    }

    #[test]
    fn search_results_encode_transparently() {
        let result = SearchResult::new(json!({"id": 2, "file": "main.go"}));
        let encoded = serde_json::to_string(&result).expect("encode result");
        assert_eq!(encoded, "{\"file\":\"main.go\",\"id\":2}");
    }
}
