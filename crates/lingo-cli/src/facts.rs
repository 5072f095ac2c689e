//! The `describe-fact` command.

use std::str::FromStr;

use lingo_service_types::DescribeFactRequest;

use crate::cli::DescribeFactArgs;
use crate::errors::AppError;
use crate::output::{OutputTarget, render_fact, write_output_file};
use crate::service::FlowService;

/// A fact named by owner, lexicon and fact name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FactPath {
    owner: String,
    lexicon: String,
    fact: String,
}

impl FromStr for FactPath {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::InvalidFactPath(value.to_owned());
        let mut segments = value.split('/');
        let (Some(owner), Some(lexicon), Some(fact), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(invalid());
        };
        if [owner, lexicon, fact].iter().any(|segment| segment.is_empty()) {
            return Err(invalid());
        }
        Ok(Self {
            owner: owner.to_owned(),
            lexicon: lexicon.to_owned(),
            fact: fact.to_owned(),
        })
    }
}

impl FactPath {
    fn into_request(self, version: Option<String>) -> DescribeFactRequest {
        DescribeFactRequest {
            owner: self.owner,
            lexicon: self.lexicon,
            fact: self.fact,
            version,
        }
    }
}

/// Fetches and renders a fact description, returning the message to print.
pub(crate) fn run_describe_fact<S>(args: &DescribeFactArgs, service: &S) -> Result<String, AppError>
where
    S: FlowService,
{
    let path: FactPath = args.fact.parse()?;
    let description = service.describe_fact(path.into_request(args.lexicon_version.clone()))?;
    let text = render_fact(&description, args.format)?;

    match OutputTarget::from_destination(&args.output) {
        OutputTarget::Console => Ok(text),
        OutputTarget::File(path) => {
            write_output_file(&path, text.as_bytes(), "fact description")?;
            Ok(format!("Fact description written to {}", path.display()))
        }
    }
}
