use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Audience a metrics request is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Recruiter,
    Candidate,
    Company,
    Platform,
}

impl Scope {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Recruiter => "recruiter",
            Self::Candidate => "candidate",
            Self::Company => "company",
            Self::Platform => "platform",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Scope {
    type Err = ScopeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        normalize_scope(value)
    }
}

/// Raised when a scope selector does not name a known audience.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("unknown scope '{0}'")]
    Unknown(String),
}

/// Map a free-text selector onto a [`Scope`].
///
/// Unlike range parsing there is no fallback here: guessing the wrong audience
/// could expose another organization's figures.
pub fn normalize_scope(token: &str) -> Result<Scope, ScopeError> {
    match token.trim().to_ascii_lowercase().as_str() {
        "recruiter" => Ok(Scope::Recruiter),
        "candidate" => Ok(Scope::Candidate),
        "company" => Ok(Scope::Company),
        "platform" | "admin" => Ok(Scope::Platform),
        _ => Err(ScopeError::Unknown(token.to_string())),
    }
}
