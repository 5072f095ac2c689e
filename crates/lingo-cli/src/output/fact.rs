//! Rendering of fact descriptions.

use std::fmt::Write as _;

use clap::ValueEnum;
use lingo_service_types::FactDescription;

use super::OutputError;

/// Presentation of a fact description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FactFormat {
    /// Indented sections for reading in a terminal.
    #[default]
    List,
    /// The description as a JSON object.
    Json,
}

/// Renders `description` in `format`, always ending with a newline.
///
/// # Errors
///
/// Returns [`OutputError::Serialise`] if JSON encoding fails.
pub fn render_fact(description: &FactDescription, format: FactFormat) -> Result<String, OutputError> {
    match format {
        FactFormat::Json => {
            let mut text =
                serde_json::to_string(description).map_err(|source| OutputError::Serialise {
                    subject: "fact description",
                    source,
                })?;
            text.push('\n');
            Ok(text)
        }
        FactFormat::List => Ok(render_list(description)),
    }
}

fn render_list(description: &FactDescription) -> String {
    let mut text = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(text, "Description:\n\t{}", description.description);
    let _ = writeln!(text, "Examples:\n\t{}", description.examples);
    text.push_str("Properties:\n");
    for property in &description.properties {
        let _ = writeln!(text, "\t{}: {}", property.name, property.description);
    }
    text
}
