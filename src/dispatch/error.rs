//! Errors reported to the host inside a failed [`super::Envelope`].

use thiserror::Error;

/// Why a message could not be handled.
///
/// The display strings are the `error` field the panel sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The message kind is not one of the known request types.
    #[error("unknown message type")]
    UnknownMessageType {
        /// The rejected kind.
        kind: u32,
    },

    /// A pull request request whose payload is not JSON.
    #[error("invalid request format")]
    InvalidRequestFormat,

    /// A pull request request without a string `params.repository`.
    #[error("missing repository parameter")]
    MissingRepository,

    /// A set-config payload that is not a settings object.
    #[error("invalid config format")]
    InvalidConfigFormat,

    /// New settings could not be written to storage.
    #[error("failed to save config")]
    SaveFailed,

    /// A response payload could not be encoded as JSON.
    #[error("failed to encode response")]
    EncodeFailed,
}
