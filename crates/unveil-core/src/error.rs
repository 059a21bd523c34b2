//! Error types for the reveal engine.

use thiserror::Error;

use crate::types::ContainerId;

/// Result type for reveal operations.
pub type Result<T> = std::result::Result<T, RevealError>;

/// Errors raised while setting up a reveal.
///
/// None of these ever reach the page: the controller catches them and shows
/// the content without animation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RevealError {
    /// The container is not attached to the surface (removed or never inserted).
    #[error("container {0:?} is not attached")]
    Detached(ContainerId),

    /// A scroll threshold string could not be parsed.
    #[error("invalid scroll threshold `{0}`")]
    InvalidThreshold(String),

    /// The reveal configuration is unusable.
    #[error("invalid reveal configuration: {0}")]
    InvalidConfig(String),

    /// The surface refused to split the container.
    #[error("segmentation failed: {0}")]
    Segmentation(String),
}
