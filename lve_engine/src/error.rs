//! Error types for the LVE engine
//!
//! This module defines the error types used throughout the engine,
//! including device setup, swapchain lifecycle and resource creation.

use std::fmt;
use crate::graphics_device::TextureFormat;

/// Result type for LVE engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// LVE engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (unexpected Vulkan status, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (buffer, shader, model, etc.)
    InvalidResource(String),

    /// Initialization failed (instance, device, window)
    InitializationFailed(String),

    /// Rejected configuration value
    InvalidConfig(String),

    /// Frame lifecycle call made out of order or with a foreign command list
    IllegalState(String),

    /// Swapchain recreation produced different image or depth formats
    SwapchainFormatMismatch {
        old_color: TextureFormat,
        new_color: TextureFormat,
        old_depth: TextureFormat,
        new_depth: TextureFormat,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            Error::IllegalState(msg) => write!(f, "Illegal state: {}", msg),
            Error::SwapchainFormatMismatch { old_color, new_color, old_depth, new_depth } => write!(
                f,
                "Swap chain image (or depth) format has changed: color {:?} -> {:?}, depth {:?} -> {:?}",
                old_color, new_color, old_depth, new_depth
            ),
        }
    }
}

impl std::error::Error for Error {}

/// Build an `Error::BackendError` and log it at ERROR level with file:line
///
/// # Example
///
/// ```no_run
/// # use lve_engine::engine_err;
/// let err = engine_err!("lve::vulkan", "vkCreateImage failed: {}", "ERROR_DEVICE_LOST");
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::lve::Engine::log_detailed(
            $crate::lve::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::lve::Error::BackendError(message)
    }};
}

/// Log an error and return early with `Error::BackendError`
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
