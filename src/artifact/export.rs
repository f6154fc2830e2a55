//! Export adapter: cached artifact to a downloadable file.

use super::Artifact;

pub const SVG_MIME: &str = "image/svg+xml";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("no diagram to export yet")]
    NoArtifact,
}

impl crate::error::ErrorCode for ExportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoArtifact => "E_NO_ARTIFACT",
        }
    }
}

/// A file ready to hand to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    /// `Content-Disposition` header value that triggers a download.
    #[must_use]
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Serialize the cached artifact unchanged, tagged as SVG.
///
/// # Errors
///
/// Returns [`ExportError::NoArtifact`] if there is no artifact or it is blank.
pub fn export_artifact(artifact: Option<&Artifact>, filename: &str) -> Result<ExportedFile, ExportError> {
    let artifact = artifact
        .filter(|a| !a.is_empty())
        .ok_or(ExportError::NoArtifact)?;
    Ok(ExportedFile { filename: filename.to_owned(), mime: SVG_MIME, bytes: artifact.as_bytes().to_vec() })
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
