//! Error types surfaced by rendering and device operations.

use thiserror::Error;

use crate::format::PixelFormat;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can go wrong between a canvas and the panel glass.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied value was out of range or of the wrong shape.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A model name or palette entry did not resolve.
    ///
    /// `suggestions` carries up to a few near-miss names for the caller to
    /// surface.
    #[error("`{name}` not found")]
    NotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// Device initialization failed; the instance should be discarded.
    #[error("initialization failed: {0}")]
    Init(String),

    /// The busy wait exceeded its deadline or was cancelled from outside.
    #[error("busy wait {}", busy_reason(.cancelled))]
    BusyTimeout { cancelled: bool },

    /// A refresh failed for a reason other than a timeout.
    #[error("device error: {0}")]
    Device(String),

    /// An optional external library is missing for the requested feature.
    #[error("missing optional dependency `{feature}`: {hint}")]
    Dependency {
        feature: &'static str,
        hint: &'static str,
    },

    /// A framebuffer does not match what the display expects.
    #[error("framebuffer format {found:?} does not match expected {expected:?}")]
    FormatMismatch {
        expected: PixelFormat,
        found: PixelFormat,
    },
}

fn busy_reason(cancelled: &bool) -> &'static str {
    if *cancelled {
        "cancelled"
    } else {
        "timed out"
    }
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

/// Low-level status returned by driver bodies and the sequence interpreter.
///
/// `Device` translates these to [`Error`] depending on whether they occurred
/// during initialization or a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DriverError {
    /// Busy wait exceeded its 5000 ms ceiling, or the cancel flag tripped.
    Timeout { cancelled: bool },
    /// An init sequence was truncated or malformed.
    Param(&'static str),
    /// An SPI or GPIO transfer failed.
    Io(String),
}

pub(crate) type DriverResult = core::result::Result<(), DriverError>;

impl DriverError {
    /// Translation used by init paths.
    pub(crate) fn into_init_error(self) -> Error {
        match self {
            DriverError::Timeout { cancelled } => Error::BusyTimeout { cancelled },
            DriverError::Param(msg) => Error::Init(msg.into()),
            DriverError::Io(msg) => Error::Init(msg),
        }
    }

    /// Translation used by refresh paths.
    pub(crate) fn into_display_error(self) -> Error {
        match self {
            DriverError::Timeout { cancelled } => Error::BusyTimeout { cancelled },
            DriverError::Param(msg) => Error::Device(msg.into()),
            DriverError::Io(msg) => Error::Device(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_translation_keeps_cancellation() {
        let err = DriverError::Timeout { cancelled: true }.into_display_error();
        assert!(matches!(err, Error::BusyTimeout { cancelled: true }));
    }

    #[test]
    fn param_errors_are_fatal_during_init() {
        let err = DriverError::Param("truncated sequence").into_init_error();
        assert!(matches!(err, Error::Init(_)));
    }

    #[test]
    fn display_formats_mention_cancellation() {
        let cancelled = Error::BusyTimeout { cancelled: true };
        assert!(cancelled.to_string().contains("cancelled"));
        let timed_out = Error::BusyTimeout { cancelled: false };
        assert!(timed_out.to_string().contains("timed out"));
    }
}
