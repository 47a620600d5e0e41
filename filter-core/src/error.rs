//! Error types for filter configuration and block processing

use thiserror::Error;

/// Errors reported by the filtering core.
///
/// Variants carry only plain integers or static strings so that building one
/// on the real-time path never allocates.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    #[error("Filter has not been initialized")]
    NotInitialized,

    #[error("Block has {actual} channels, filter is configured for {expected}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("Block has {actual} frames, filter block size is {expected}")]
    FrameSizeMismatch { expected: usize, actual: usize },
}
