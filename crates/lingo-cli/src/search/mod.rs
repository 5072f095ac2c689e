//! The `search` command: send a query, drain the stream, render once.

mod cancel;
mod collector;

use std::fs;

use lingo_config::Config;
use lingo_service_types::SearchRequest;

pub use cancel::CancellationToken;
pub use collector::{CollectError, ResultChannels, StreamError, collect_results};

use crate::cli::SearchArgs;
use crate::diagnostics::Diagnostics;
use crate::errors::AppError;
use crate::output::{OutputTarget, deliver, render};
use crate::service::FlowService;

/// Runs a search and returns the message to print.
pub(crate) fn run_search<S>(
    args: &SearchArgs,
    config: &Config,
    service: &S,
    diagnostics: &dyn Diagnostics,
) -> Result<String, AppError>
where
    S: FlowService,
{
    let cancellation = CancellationToken::with_timeout(config.request_timeout());
    run_search_with_token(args, config, service, diagnostics, &cancellation)
}

pub(crate) fn run_search_with_token<S>(
    args: &SearchArgs,
    config: &Config,
    service: &S,
    diagnostics: &dyn Diagnostics,
    cancellation: &CancellationToken,
) -> Result<String, AppError>
where
    S: FlowService,
{
    let dotlingo = fs::read_to_string(&args.query).map_err(|source| AppError::ReadQuery {
        path: args.query.clone(),
        source,
    })?;

    diagnostics.search_started(config.service_endpoint(), &args.query);
    let stream = service.search(SearchRequest::new(dotlingo))?;
    let results = collect_results(stream.channels(), cancellation, diagnostics)?;
    drop(stream);

    let rendered = render(&results, &args.format)?;
    let target = OutputTarget::from_destination(&args.output);
    Ok(deliver(&rendered, &target)?)
}
