use thiserror::Error;

/// Failures raised by page collaborators.
///
/// Missing elements are never errors: every component treats an absent
/// element as "feature not present on this page".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The preference store could not be read or written.
    #[error("preference store error: {0}")]
    Storage(String),

    /// Writing to the system clipboard was rejected.
    #[error("clipboard write failed: {0}")]
    Clipboard(String),

    /// A DOM mutation was rejected by the host.
    #[error("DOM operation failed: {0}")]
    Dom(String),

    /// A persisted theme name is not one we know.
    #[error("unknown theme `{0}`")]
    InvalidTheme(String),

    /// An effects profile name is not one we know.
    #[error("unknown effects profile `{0}`")]
    InvalidProfile(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
