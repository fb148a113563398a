use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest principal accepted from outside the registry
pub const MAX_PRINCIPAL_LEN: usize = 128;

/// An opaque account identifier that can own equipment
///
/// The registry only ever compares principals for equality. Parsing rejects
/// values that could not have come from a well-formed caller identity:
/// empty strings, whitespace or control characters, and oversized input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

impl Principal {
    /// Parse a principal, validating its shape
    pub fn parse(s: &str) -> Result<Self, Error> {
        if s.is_empty() {
            return Err(Error::InvalidPrincipal("principal is empty".to_string()));
        }
        if s.len() > MAX_PRINCIPAL_LEN {
            return Err(Error::InvalidPrincipal(format!(
                "principal exceeds {} bytes",
                MAX_PRINCIPAL_LEN
            )));
        }
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(Error::InvalidPrincipal(format!(
                "principal contains whitespace or control characters: {:?}",
                s
            )));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Principal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Principal {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Principal> for String {
    fn from(p: Principal) -> Self {
        p.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
