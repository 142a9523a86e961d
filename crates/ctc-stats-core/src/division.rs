//! League division tokens

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A league tier identifier such as `"1_2"`, `"3"` or `"4"`.
///
/// The token is opaque: it is handed to the data source unchanged, so
/// unknown tokens are kept as-is rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Division(String);

impl Division {
    /// Divisions the league currently runs
    pub const KNOWN: [&'static str; 3] = ["1_2", "3", "4"];

    /// Wrap a division token. Returns `None` for an empty or blank token.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return None;
        }
        if !Self::KNOWN.contains(&token.as_str()) {
            tracing::debug!("Passing through unknown division token {:?}", token);
        }
        Some(Self(token))
    }

    /// All known divisions, in league order
    pub fn known() -> Vec<Division> {
        Self::KNOWN.iter().map(|t| Division((*t).to_string())).collect()
    }

    /// Returns true if this is one of the league's current divisions
    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }

    /// The raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human readable label, e.g. `"Division 1–2"` for `"1_2"`
    pub fn label(&self) -> String {
        format!("Division {}", self.0.replace('_', "\u{2013}"))
    }
}

impl Default for Division {
    fn default() -> Self {
        Self(Self::KNOWN[0].to_string())
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Division {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Division::new(s).ok_or_else(|| Error::InvalidDivision(s.to_string()))
    }
}
