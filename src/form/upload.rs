//! File ingestion for upload-backed fields
//!
//! Certificate-style fields take the file's text verbatim; image fields
//! (custom logos) take a base64 `data:` URL. Either way the uploaded file
//! name is remembered by the form so a later revert can clear it.

use crate::error::{Error, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;

/// An uploaded file destined for a string or data-URL field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    name: String,
    contents: Vec<u8>,
}

impl FileUpload {
    /// Wrap already-read file contents
    pub fn new(name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            contents,
        }
    }

    /// Read an upload from disk
    ///
    /// # Errors
    ///
    /// Returns `Error::UploadRead` when the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let contents = std::fs::read(path).map_err(|e| Error::UploadRead {
            name: name.clone(),
            source: e,
        })?;
        Ok(Self { name, contents })
    }

    /// Original file name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw contents
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Interpret the contents as UTF-8 text (certificates, metadata XML)
    ///
    /// # Errors
    ///
    /// Returns `Error::UploadRead` when the contents are not valid UTF-8.
    pub fn as_text(&self) -> Result<String> {
        String::from_utf8(self.contents.clone()).map_err(|e| Error::UploadRead {
            name: self.name.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })
    }

    /// Encode the contents as a base64 `data:` URL, guessing the MIME type
    /// from the file name
    #[must_use]
    pub fn to_data_url(&self) -> String {
        let mime = mime_guess::from_path(&self.name).first_or_octet_stream();
        format!("data:{};base64,{}", mime, STANDARD.encode(&self.contents))
    }
}

// =============================================================================
// Tests
// =============================================================================
