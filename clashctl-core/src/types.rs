//! Domain types shared by the controller and the CLI.
//!
//! Wire encodings follow the daemon's control API: modes travel as the fixed
//! strings `"DIRECT"` and `"Proxies"`, proxy names as opaque strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Name of an upstream route configured in the daemon.
///
/// The legal set is only known at runtime (the daemon's `all` list), so this
/// is deliberately an unchecked wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProxyName(pub String);

impl ProxyName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProxyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProxyName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProxyName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Traffic-handling strategy of the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mode {
    Direct,
    Proxies,
}

impl Mode {
    /// Every legal mode, in display order.
    pub const ALL: [Mode; 2] = [Mode::Direct, Mode::Proxies];

    /// The exact string the control API uses for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Direct => "DIRECT",
            Mode::Proxies => "Proxies",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CoreError;

    /// Exact, case-sensitive match against the wire strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| CoreError::InvalidMode {
                value: s.to_owned(),
            })
    }
}

impl TryFrom<String> for Mode {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.as_str().to_owned()
    }
}
