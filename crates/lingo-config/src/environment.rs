use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Deployment environment the CLI talks to.
///
/// The environment selects which section of the auth store supplies
/// credentials.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Deserialize,
    Serialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    EnumString,
    Display,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Environment {
    /// Hosted platform.
    #[default]
    Paas,
    /// Development deployment.
    Dev,
    /// Customer-operated installation.
    Onprem,
    /// Test deployment.
    Test,
    /// Staging deployment.
    Staging,
}

impl Environment {
    /// Every known environment, in template order.
    pub const ALL: [Self; 5] = [
        Self::Paas,
        Self::Dev,
        Self::Onprem,
        Self::Test,
        Self::Staging,
    ];

    /// Key naming this environment's section in the auth store.
    #[must_use]
    pub fn as_key(self) -> &'static str {
        self.into()
    }
}

/// Errors encountered while parsing an [`Environment`] from text.
pub type EnvironmentParseError = strum::ParseError;
