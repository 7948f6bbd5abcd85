//! Error taxonomy for the haze pipeline.
//!
//! - [`HazeError::InvalidArgument`]: malformed input (size, parity, range,
//!   count). Raised at the first violated precondition.
//! - [`HazeError::Runtime`]: an invariant that upstream checks should have
//!   guaranteed, or a batch-level inconsistency (directory mismatch).
//! - `Io` / `Image` / `Config`: boundary failures, always naming the path.
//! - `Context`: a wrapped error with caller context, used by the batch driver.
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HazeError>;

#[derive(Debug, Error)]
pub enum HazeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("runtime failure: {0}")]
    Runtime(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image error on {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("{context}:\n{source}")]
    Context {
        context: String,
        #[source]
        source: Box<HazeError>,
    },
}

impl HazeError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        HazeError::InvalidArgument(msg.into())
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        HazeError::Runtime(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HazeError::Io {
            path: path.into(),
            source,
        }
    }

    /// Innermost error below any `Context` wrappers.
    pub fn root(&self) -> &HazeError {
        match self {
            HazeError::Context { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.root(), HazeError::InvalidArgument(_))
    }

    pub fn is_runtime(&self) -> bool {
        matches!(self.root(), HazeError::Runtime(_))
    }
}

/// Attach caller context to a fallible result, keeping the original error as
/// the source.
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|source| HazeError::Context {
            context: context.into(),
            source: Box::new(source),
        })
    }

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|source| HazeError::Context {
            context: f().into(),
            source: Box::new(source),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_chain_keeps_root_kind() {
        let err: Result<()> = Err(HazeError::invalid("dark_channel: patch size can't be even"));
        let wrapped = err
            .context("cannot process a.png")
            .context("produce: cannot dehaze images");
        let err = wrapped.unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(!err.is_runtime());
        let text = err.to_string();
        assert!(text.starts_with("produce: cannot dehaze images:\n"));
        assert!(text.contains("cannot process a.png"));
        assert!(text.ends_with("patch size can't be even"));
    }
}
