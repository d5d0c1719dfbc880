//! Shim Error Types

use thiserror::Error;

/// Errors surfaced by the device, stream and policy shims.
///
/// Forwarded vendor calls fail with [`HalError::Vendor`] carrying the
/// vendor's own status code unchanged; the shim adds no failure modes to
/// calls it does not itself interpret.
#[derive(Error, Debug)]
pub enum HalError {
    /// The caller asked for something this module does not provide, such
    /// as an unknown interface name or a stream handle that is not open.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The vendor binary could not be located or opened.
    #[error("failed to load vendor module {module}: {reason}")]
    ModuleLoad { module: String, reason: String },

    /// Operation exists only in the current interface generation; the
    /// wrapped module predates it.
    #[error("operation not supported by the wrapped module")]
    NotSupported,

    /// Status code reported by a forwarded vendor call, passed through
    /// unchanged.
    #[error("vendor call failed with status {0}")]
    Vendor(i32),
}

/// Result type alias for shim operations
pub type HalResult<T> = Result<T, HalError>;
