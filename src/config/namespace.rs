//! Component namespaces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the three top-level component categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    Processors,
    StreamProcessors,
    Gateways,
}

impl Namespace {
    pub const ALL: [Namespace; 3] = [
        Namespace::Processors,
        Namespace::StreamProcessors,
        Namespace::Gateways,
    ];

    /// The key used for this namespace in the persisted document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Processors => "processors",
            Namespace::StreamProcessors => "stream_processors",
            Namespace::Gateways => "gateways",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a namespace identifier outside the fixed set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown namespace: {0}")]
pub struct UnknownNamespace(pub String);

impl FromStr for Namespace {
    type Err = UnknownNamespace;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Namespace::ALL
            .into_iter()
            .find(|ns| ns.as_str() == s)
            .ok_or_else(|| UnknownNamespace(s.to_string()))
    }
}
