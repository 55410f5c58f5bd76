use thiserror::Error;

/// Failure to turn a package identifier into a package descriptor.
///
/// Every variant is fatal for the traversal that produced it.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("cannot find package \"{name}\"")]
    UnknownPackage { name: String },

    #[error("invalid package \"{name}\": {message}")]
    InvalidPackage { name: String, message: String },

    #[error("pattern \"{name}\" matched {count} packages, expected exactly one")]
    Ambiguous { name: String, count: usize },

    #[error("go list failed for \"{name}\": {message}")]
    Tool { name: String, message: String },

    #[error("failed to decode package metadata for \"{name}\": {message}")]
    Decode { name: String, message: String },

    #[error("cannot determine working directory: {source}")]
    WorkingDir { source: std::io::Error },
}

impl ResolveError {
    pub fn unknown_package(name: impl Into<String>) -> Self {
        Self::UnknownPackage { name: name.into() }
    }

    pub fn invalid_package(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPackage {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn ambiguous(name: impl Into<String>, count: usize) -> Self {
        Self::Ambiguous {
            name: name.into(),
            count,
        }
    }

    pub fn tool(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn decode(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn working_dir(source: std::io::Error) -> Self {
        Self::WorkingDir { source }
    }
}
