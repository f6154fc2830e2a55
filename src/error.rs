//! Error taxonomy shared by every editor boundary.
//!
//! Each layer owns a `thiserror` enum (`DiagramError`, `RemoteError`,
//! `ExportError`). `EditorError` is what sessions hand back: it wraps those
//! and adds the single-flight `Busy` rejection. Every enum implements
//! [`ErrorCode`] so the HTTP surface can emit a stable machine-readable code
//! next to the message.

use crate::artifact::export::ExportError;
use crate::diagram::DiagramError;
use crate::remote::RemoteError;
use crate::session::ops::Operation;

/// Trait for errors that carry a grepable code.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Errors surfaced by an open editor session.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Diagram(#[from] DiagramError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("{0} is already in progress")]
    Busy(Operation),
}

impl EditorError {
    /// Message shown to the user next to the control that failed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Remote(RemoteError::NotConfigured) => "The diagram service is not configured.".into(),
            Self::Remote(err) if err.retryable() => format!("{}. Please try again.", capitalize(&err.to_string())),
            other => capitalize(&other.to_string()),
        }
    }
}

impl ErrorCode for EditorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Diagram(err) => err.error_code(),
            Self::Remote(err) => err.error_code(),
            Self::Export(err) => err.error_code(),
            Self::Busy(_) => "E_BUSY",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Remote(err) => err.retryable(),
            Self::Busy(_) => true,
            Self::Diagram(_) | Self::Export(_) => false,
        }
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
