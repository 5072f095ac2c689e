//! Wire types shared by the lingo CLI and the flow service.
//!
//! Every connection carries exactly one [`ServiceRequest`] from the client,
//! followed by a stream of [`ServiceEvent`] values from the service. Both are
//! encoded as JSON Lines with a `kind` tag.

mod event;
mod request;

pub use event::{EventChannel, FactDescription, FactProperty, SearchResult, ServiceEvent};
pub use request::{DescribeFactRequest, SearchRequest, ServiceRequest};
