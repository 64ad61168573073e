use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Session identifier handed out by the server and typed back in by users,
/// so it stays a plain string on the wire. Unknown strings simply fail lookup.
/// Surrounding whitespace is dropped however the id is built.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.trim().to_owned())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
