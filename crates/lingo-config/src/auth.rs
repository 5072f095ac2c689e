//! Per-environment credentials store.
//!
//! `auth.yaml` lives in the configuration home and holds one section per
//! [`Environment`]. Lookups and updates always address the active
//! environment's section.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::environment::Environment;

/// File name of the auth store inside the configuration home.
pub const AUTH_FILE_NAME: &str = "auth.yaml";

/// Contents written by [`create_auth_file_in_dir`].
pub const AUTH_TEMPLATE: &str = "\
paas:
  gitserver:
    credentials_filename: git-credentials
    user:
      password: \"\"
      username: \"\"
dev:
  gitserver:
    credentials_filename: git-credentials-dev
onprem:
  gitserver:
    credentials_filename: git-credentials-onprem
test:
  gitserver:
    credentials_filename: git-credentials-test
staging:
  gitserver:
    credentials_filename: git-credentials-staging
";

/// Named values held by the auth store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum AuthKey {
    /// File the git credential helper reads.
    GitCredentialsFilename,
    /// Git server user name.
    GitUsername,
    /// Git server password.
    GitPassword,
    /// Perforce server user name.
    P4Username,
    /// Perforce server password.
    P4Password,
}

impl AuthKey {
    /// Every key, in dump order.
    pub const ALL: [Self; 5] = [
        Self::GitCredentialsFilename,
        Self::GitUsername,
        Self::GitPassword,
        Self::P4Username,
        Self::P4Password,
    ];

    /// Dotted path of the key within an environment section.
    #[must_use]
    pub const fn dotted_path(self) -> &'static str {
        match self {
            Self::GitCredentialsFilename => "gitserver.credentials_filename",
            Self::GitUsername => "gitserver.user.username",
            Self::GitPassword => "gitserver.user.password",
            Self::P4Username => "p4server.user.username",
            Self::P4Password => "p4server.user.password",
        }
    }

    /// Whether the value should be hidden when displayed.
    #[must_use]
    pub const fn is_secret(self) -> bool {
        matches!(self, Self::GitPassword | Self::P4Password)
    }
}

/// Errors raised by the auth store.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The store has not been created yet.
    #[error("auth store {path} does not exist; run 'lingo auth init' to create it")]
    Missing {
        /// Expected location of the store.
        path: Utf8PathBuf,
    },
    /// Reading the store failed.
    #[error("failed to read auth store {path}")]
    Read {
        /// Location of the store.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
    /// The store is not valid YAML of the expected shape.
    #[error("failed to parse auth store {path}: {message}")]
    Parse {
        /// Location of the store.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        message: String,
    },
    /// Encoding the store failed.
    #[error("failed to encode auth store: {message}")]
    Encode {
        /// Serialiser diagnostic.
        message: String,
    },
    /// Writing the store failed.
    #[error("failed to write auth store {path}")]
    Write {
        /// Location of the store.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
    /// The key has no value in the active environment.
    #[error("{key} is not set for the {environment} environment")]
    KeyNotSet {
        /// Dotted path of the key.
        key: &'static str,
        /// Environment that was consulted.
        environment: Environment,
    },
}

type AuthDocument = BTreeMap<String, EnvironmentSection>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
struct EnvironmentSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gitserver: Option<ServerSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    p4server: Option<ServerSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
struct ServerSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    credentials_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<UserSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
struct UserSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

/// Writes [`AUTH_TEMPLATE`] to `dir/auth.yaml`.
///
/// An existing store is left untouched unless `overwrite` is set. The
/// directory is created when missing. Returns the store path.
///
/// # Errors
///
/// Returns [`AuthError::Write`] when the directory or file cannot be written.
pub fn create_auth_file_in_dir(dir: &Utf8Path, overwrite: bool) -> Result<Utf8PathBuf, AuthError> {
    let path = dir.join(AUTH_FILE_NAME);
    if path.exists() && !overwrite {
        return Ok(path);
    }

    fs::create_dir_all(dir).map_err(|source| AuthError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    options
        .open(path.as_std_path())
        .and_then(|mut file| file.write_all(AUTH_TEMPLATE.as_bytes()))
        .map_err(|source| AuthError::Write {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

/// Credentials for one environment, backed by `auth.yaml`.
#[derive(Debug, Clone)]
pub struct AuthStore {
    path: Utf8PathBuf,
    environment: Environment,
    document: AuthDocument,
}

impl AuthStore {
    /// Opens the store in `dir`, scoped to `environment`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Missing`] when the file does not exist, and
    /// [`AuthError::Read`] or [`AuthError::Parse`] when it cannot be loaded.
    pub fn open_in_dir(dir: &Utf8Path, environment: Environment) -> Result<Self, AuthError> {
        let path = dir.join(AUTH_FILE_NAME);
        let text = match fs::read_to_string(path.as_std_path()) {
            Ok(text) => text,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                return Err(AuthError::Missing { path });
            }
            Err(source) => return Err(AuthError::Read { path, source }),
        };
        let document = parse_document(&path, &text)?;
        Ok(Self {
            path,
            environment,
            document,
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Environment whose section this store reads and writes.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Looks up `key` in the active environment.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::KeyNotSet`] when the key is absent.
    pub fn get(&self, key: AuthKey) -> Result<&str, AuthError> {
        self.lookup(key).ok_or(AuthError::KeyNotSet {
            key: key.dotted_path(),
            environment: self.environment,
        })
    }

    /// Sets `key` in the active environment. Call [`Self::save`] to persist.
    pub fn set(&mut self, key: AuthKey, value: impl Into<String>) {
        let value = Some(value.into());
        let section = self
            .document
            .entry(self.environment.as_key().to_owned())
            .or_default();
        match key {
            AuthKey::GitCredentialsFilename => {
                section.gitserver.get_or_insert_with(Default::default).credentials_filename = value;
            }
            AuthKey::GitUsername => user_mut(&mut section.gitserver).username = value,
            AuthKey::GitPassword => user_mut(&mut section.gitserver).password = value,
            AuthKey::P4Username => user_mut(&mut section.p4server).username = value,
            AuthKey::P4Password => user_mut(&mut section.p4server).password = value,
        }
    }

    /// Every key with a value in the active environment.
    #[must_use]
    pub fn dump(&self) -> BTreeMap<AuthKey, String> {
        AuthKey::ALL
            .into_iter()
            .filter_map(|key| self.lookup(key).map(|value| (key, value.to_owned())))
            .collect()
    }

    /// Writes the store back to disk.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Encode`] or [`AuthError::Write`] on failure.
    pub fn save(&self) -> Result<(), AuthError> {
        let text = serde_saphyr::to_string(&self.document).map_err(|error| AuthError::Encode {
            message: error.to_string(),
        })?;
        fs::write(self.path.as_std_path(), text).map_err(|source| AuthError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn lookup(&self, key: AuthKey) -> Option<&str> {
        let section = self.document.get(self.environment.as_key())?;
        let value = match key {
            AuthKey::GitCredentialsFilename => {
                section.gitserver.as_ref()?.credentials_filename.as_ref()
            }
            AuthKey::GitUsername => section.gitserver.as_ref()?.user.as_ref()?.username.as_ref(),
            AuthKey::GitPassword => section.gitserver.as_ref()?.user.as_ref()?.password.as_ref(),
            AuthKey::P4Username => section.p4server.as_ref()?.user.as_ref()?.username.as_ref(),
            AuthKey::P4Password => section.p4server.as_ref()?.user.as_ref()?.password.as_ref(),
        };
        value.map(String::as_str)
    }
}

fn user_mut(server: &mut Option<ServerSection>) -> &mut UserSection {
    server
        .get_or_insert_with(Default::default)
        .user
        .get_or_insert_with(Default::default)
}

fn parse_document(path: &Utf8Path, text: &str) -> Result<AuthDocument, AuthError> {
    if text.trim().is_empty() {
        return Ok(AuthDocument::new());
    }
    serde_saphyr::from_str(text).map_err(|error| AuthError::Parse {
        path: path.to_path_buf(),
        message: error.to_string(),
    })
}
