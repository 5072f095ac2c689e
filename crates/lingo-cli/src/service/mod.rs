//! Client side of the flow service protocol.
//!
//! Each request opens its own connection: a search keeps the connection alive
//! while results stream back, a fact description reads a single reply.

mod stream;

use std::io::{self, BufRead, BufReader};

use lingo_config::ServiceEndpoint;
use lingo_service_types::{
    DescribeFactRequest, FactDescription, SearchRequest, ServiceEvent, ServiceRequest,
};

use crate::errors::AppError;
use crate::transport::{Connection, connect};

pub(crate) use stream::SearchStream;
use stream::spawn_search_stream;

/// Operations offered by the remote flow service.
pub(crate) trait FlowService {
    /// Sends a search and returns the live result stream.
    fn search(&self, request: SearchRequest) -> Result<SearchStream, AppError>;

    /// Fetches the documentation for one fact.
    fn describe_fact(&self, request: DescribeFactRequest) -> Result<FactDescription, AppError>;
}

/// [`FlowService`] reached over the configured socket.
pub(crate) struct SocketFlowService<'a> {
    endpoint: &'a ServiceEndpoint,
}

impl<'a> SocketFlowService<'a> {
    pub(crate) const fn new(endpoint: &'a ServiceEndpoint) -> Self {
        Self { endpoint }
    }

    fn send(&self, request: &ServiceRequest) -> Result<Connection, AppError> {
        let mut connection = connect(self.endpoint)?;
        request
            .write_jsonl(&mut connection)
            .map_err(AppError::SendRequest)?;
        Ok(connection)
    }
}

impl FlowService for SocketFlowService<'_> {
    fn search(&self, request: SearchRequest) -> Result<SearchStream, AppError> {
        let connection = self.send(&ServiceRequest::Search(request))?;
        spawn_search_stream(connection).map_err(AppError::StartStream)
    }

    fn describe_fact(&self, request: DescribeFactRequest) -> Result<FactDescription, AppError> {
        let connection = self.send(&ServiceRequest::DescribeFact(request))?;
        read_fact_description(connection)
    }
}

/// Reads the first meaningful event of a describe-fact reply.
fn read_fact_description<R>(reader: R) -> Result<FactDescription, AppError>
where
    R: io::Read,
{
    let mut reader = BufReader::new(reader);
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).map_err(AppError::ReadResponse)? == 0 {
            return Err(AppError::MissingResponse);
        }
        if line.trim().is_empty() {
            continue;
        }
        let event: ServiceEvent = serde_json::from_str(&line).map_err(AppError::ParseMessage)?;
        return match event {
            ServiceEvent::FactDescription { description } => Ok(description),
            ServiceEvent::Error { message } => Err(AppError::Service(message)),
            ServiceEvent::Result { .. } => Err(AppError::UnexpectedEvent("result")),
            ServiceEvent::Close { .. } => Err(AppError::UnexpectedEvent("close")),
        };
    }
}
