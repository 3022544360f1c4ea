use std::fmt;

use crate::io::audio::LoadError;
use crate::scene::NodeId;

pub type Result<T> = std::result::Result<T, WorldsError>;

#[derive(Debug)]
pub enum WorldsError {
    /// A required asset or config file is missing, unreadable, or malformed.
    /// Always fatal: nothing past construction runs.
    Configuration(String),

    /// A layout or timing parameter that would produce a degenerate scene or
    /// a non-positive action duration.
    InvalidLayoutParameter { name: &'static str, reason: String },

    UnknownNode(NodeId),
}

impl WorldsError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidLayoutParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for WorldsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(message) => {
                write!(f, "Configuration error: {}", message)
            }
            Self::InvalidLayoutParameter { name, reason } => {
                write!(f, "Invalid parameter `{}`: {}", name, reason)
            }
            Self::UnknownNode(id) => {
                write!(f, "Node {:?} is not part of the scene", id)
            }
        }
    }
}

impl std::error::Error for WorldsError {}

impl From<LoadError> for WorldsError {
    fn from(err: LoadError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<serde_yml::Error> for WorldsError {
    fn from(err: serde_yml::Error) -> Self {
        Self::Configuration(format!("unable to parse config: {}", err))
    }
}

impl From<serde_json::Error> for WorldsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration(format!("unable to serialize: {}", err))
    }
}
