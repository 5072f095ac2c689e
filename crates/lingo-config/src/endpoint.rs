use std::fmt;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Address of the flow service.
///
/// Configuration layers may spell an endpoint either as a URL string
/// (`tcp://host:port`, `unix:///path`) or as a table tagged by `transport`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(try_from = "EndpointRepr", into = "String")]
pub enum ServiceEndpoint {
    /// Unix domain socket endpoint.
    Unix {
        /// Filesystem path of the socket.
        path: Utf8PathBuf,
    },
    /// TCP endpoint.
    Tcp {
        /// Host name or address.
        host: String,
        /// TCP port.
        port: u16,
    },
}

impl ServiceEndpoint {
    /// Builds a Unix domain socket endpoint.
    #[must_use]
    pub fn unix(path: impl Into<Utf8PathBuf>) -> Self {
        Self::Unix { path: path.into() }
    }

    /// Builds a TCP endpoint.
    #[must_use]
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self::Tcp {
            host: host.into(),
            port,
        }
    }

    /// Returns the socket path when the endpoint uses the Unix transport.
    #[must_use]
    pub fn unix_path(&self) -> Option<&Utf8Path> {
        match self {
            Self::Unix { path } => Some(path.as_ref()),
            Self::Tcp { .. } => None,
        }
    }
}

impl fmt::Display for ServiceEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix { path } => write!(formatter, "unix://{path}"),
            Self::Tcp { host, port } => write!(formatter, "tcp://{host}:{port}"),
        }
    }
}

impl From<ServiceEndpoint> for String {
    fn from(endpoint: ServiceEndpoint) -> Self {
        endpoint.to_string()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EndpointRepr {
    Url(String),
    Table(EndpointTable),
}

#[derive(Deserialize)]
#[serde(tag = "transport", rename_all = "snake_case")]
enum EndpointTable {
    Unix { path: Utf8PathBuf },
    Tcp { host: String, port: u16 },
}

impl TryFrom<EndpointRepr> for ServiceEndpoint {
    type Error = EndpointParseError;

    fn try_from(repr: EndpointRepr) -> Result<Self, Self::Error> {
        match repr {
            EndpointRepr::Url(text) => text.parse(),
            EndpointRepr::Table(EndpointTable::Unix { path }) => Ok(Self::Unix { path }),
            EndpointRepr::Table(EndpointTable::Tcp { host, port }) => Ok(Self::Tcp { host, port }),
        }
    }
}

impl FromStr for ServiceEndpoint {
    type Err = EndpointParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(input)?;
        match url.scheme() {
            "unix" => {
                let path = url.path();
                if path.is_empty() {
                    return Err(EndpointParseError::MissingUnixPath(input.to_owned()));
                }
                Ok(Self::unix(path))
            }
            "tcp" => {
                let host = url
                    .host_str()
                    .ok_or_else(|| EndpointParseError::MissingHost(input.to_owned()))?;
                let port = url
                    .port()
                    .ok_or_else(|| EndpointParseError::MissingPort(input.to_owned()))?;
                Ok(Self::tcp(host, port))
            }
            other => Err(EndpointParseError::UnsupportedScheme(other.to_owned())),
        }
    }
}

/// Errors encountered while parsing a [`ServiceEndpoint`] from text.
#[derive(Debug, Error)]
pub enum EndpointParseError {
    /// Scheme was neither `tcp` nor `unix`.
    #[error("unsupported service endpoint scheme '{0}'")]
    UnsupportedScheme(String),
    /// TCP host name was missing.
    #[error("missing TCP host in '{0}'")]
    MissingHost(String),
    /// TCP port was missing from the address.
    #[error("missing TCP port in '{0}'")]
    MissingPort(String),
    /// Unix socket path was absent.
    #[error("missing Unix socket path in '{0}'")]
    MissingUnixPath(String),
    /// Text was not a URL.
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn displays_unix_endpoint() {
        let endpoint = ServiceEndpoint::unix("/run/lingo/flow.sock");
        assert_eq!(endpoint.to_string(), "unix:///run/lingo/flow.sock");
    }

    #[rstest]
    #[case("tcp://127.0.0.1:8001", ServiceEndpoint::tcp("127.0.0.1", 8001))]
    #[case("tcp://flow.internal:9000", ServiceEndpoint::tcp("flow.internal", 9000))]
    #[case("unix:///tmp/flow.sock", ServiceEndpoint::unix("/tmp/flow.sock"))]
    fn parses_endpoints(#[case] input: &str, #[case] expected: ServiceEndpoint) {
        let parsed: ServiceEndpoint = input.parse().expect("endpoint should parse");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case("tcp://127.0.0.1")]
    #[case("http://127.0.0.1:8001")]
    #[case("not a url")]
    fn rejects_malformed_endpoints(#[case] input: &str) {
        assert!(input.parse::<ServiceEndpoint>().is_err());
    }

    #[derive(Debug, Deserialize)]
    struct Holder {
        endpoint: ServiceEndpoint,
    }

    #[rstest]
    #[case(r#"{"endpoint":"tcp://10.0.0.5:9100"}"#)]
    #[case(r#"{"endpoint":{"transport":"tcp","host":"10.0.0.5","port":9100}}"#)]
    fn deserialises_url_and_table_forms(#[case] json: &str) {
        let holder: Holder = serde_json::from_str(json).expect("endpoint should decode");
        assert_eq!(holder.endpoint, ServiceEndpoint::tcp("10.0.0.5", 9100));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let endpoint = ServiceEndpoint::tcp("localhost", 8123);
        let reparsed: ServiceEndpoint = endpoint.to_string().parse().expect("reparse endpoint");
        assert_eq!(reparsed, endpoint);
    }
}
