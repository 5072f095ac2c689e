//! Rendering and delivery of command output.
//!
//! Search results and fact descriptions are rendered to text once, then
//! either handed back for the console or written to a file.

mod fact;
mod results;

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use fact::{FactFormat, render_fact};
pub use results::{RenderedResults, ResultFormat, render};

/// Permissions applied to files created for command output.
#[cfg(unix)]
pub const OUTPUT_FILE_MODE: u32 = 0o775;

/// Errors raised while rendering or delivering output.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The format selector named no known format.
    #[error("unknown format {0:?}")]
    UnknownFormat(String),
    /// Encoding the payload failed.
    #[error("failed to encode {subject}")]
    Serialise {
        /// What was being encoded.
        subject: &'static str,
        /// Encoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// Writing the output file failed.
    #[error("error writing {subject} to file {path}", path = path.display())]
    WriteFile {
        /// What was being written.
        subject: &'static str,
        /// Destination file.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
}

/// Where rendered output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Returned to the caller for printing.
    Console,
    /// Written to the named file, replacing its contents.
    File(PathBuf),
}

impl OutputTarget {
    /// Console for an empty destination, otherwise the named file.
    #[must_use]
    pub fn from_destination(destination: &str) -> Self {
        if destination.is_empty() {
            Self::Console
        } else {
            Self::File(PathBuf::from(destination))
        }
    }
}

/// Delivers rendered search results and returns the message for the user.
///
/// For [`OutputTarget::Console`] the message is the rendered text itself.
///
/// # Errors
///
/// Returns [`OutputError::WriteFile`] when the destination file cannot be
/// created or written.
pub fn deliver(rendered: &RenderedResults, target: &OutputTarget) -> Result<String, OutputError> {
    match target {
        OutputTarget::Console => Ok(rendered.text().to_owned()),
        OutputTarget::File(path) => {
            write_output_file(path, rendered.text().as_bytes(), "results")?;
            Ok(format!(
                "Done! {} results written to {}",
                rendered.count(),
                path.display()
            ))
        }
    }
}

/// Creates or truncates `path` and writes `bytes` to it.
pub(crate) fn write_output_file(
    path: &Path,
    bytes: &[u8],
    subject: &'static str,
) -> Result<(), OutputError> {
    let wrap = |source| OutputError::WriteFile {
        subject,
        path: path.to_path_buf(),
        source,
    };
    let mut file = open_truncated(path).map_err(wrap)?;
    file.write_all(bytes).map_err(wrap)?;
    file.flush().map_err(wrap)
}

fn open_truncated(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(OUTPUT_FILE_MODE);
    }
    options.open(path)
}
