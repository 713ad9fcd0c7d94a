//! Domain types for the remote access (RAC) console.

pub mod endpoint;
pub mod flow;
pub mod provider;

pub use endpoint::*;
pub use flow::*;
pub use provider::*;

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Remote desktop protocol an endpoint or provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Rdp,
    Vnc,
    Ssh,
}

impl Protocol {
    /// Radio order used by the forms.
    pub const ALL: [Protocol; 3] = [Protocol::Rdp, Protocol::Ssh, Protocol::Vnc];

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Rdp => "rdp",
            Protocol::Vnc => "vnc",
            Protocol::Ssh => "ssh",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Protocol::Rdp => "RDP",
            Protocol::Vnc => "VNC",
            Protocol::Ssh => "SSH",
        }
    }
}

impl Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rdp" => Ok(Protocol::Rdp),
            "vnc" => Ok(Protocol::Vnc),
            "ssh" => Ok(Protocol::Ssh),
            other => Err(format!("\"{other}\" is not a valid choice.")),
        }
    }
}

/// How an endpoint obtains the credentials it connects with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Credentials are stored in the endpoint settings.
    Static,
    /// The user is asked when connecting.
    Prompt,
}

impl AuthMode {
    pub const ALL: [AuthMode; 2] = [AuthMode::Static, AuthMode::Prompt];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::Static => "static",
            AuthMode::Prompt => "prompt",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuthMode::Static => "Static",
            AuthMode::Prompt => "Prompt",
        }
    }
}

impl Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "static" => Ok(AuthMode::Static),
            "prompt" => Ok(AuthMode::Prompt),
            other => Err(format!("\"{other}\" is not a valid choice.")),
        }
    }
}
