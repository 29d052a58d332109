use std::fmt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult, ExtractionError};
use crate::models::NewDocument;

/// Body of `POST /api/data`. Both fields are optional at the wire level so
/// that a missing field becomes a validation error rather than a rejection.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SaveDocumentRequest {
    #[serde(default)]
    pub document_type: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl SaveDocumentRequest {
    /// `document_type` must be a non-empty string and `data` must be present
    /// and non-null.
    pub fn validate(self) -> AppResult<NewDocument> {
        let document_type = match self.document_type {
            Some(Value::String(s)) if !s.is_empty() => s,
            _ => return Err(AppError::missing_fields()),
        };
        let data = match self.data {
            Some(Value::Null) | None => return Err(AppError::missing_fields()),
            Some(data) => data,
        };
        Ok(NewDocument::new(document_type, data))
    }
}

/// The file types the extraction flow accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AcceptedMimeType {
    #[serde(rename = "application/pdf")]
    Pdf,
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/webp")]
    Webp,
}

impl AcceptedMimeType {
    pub const ALL: [AcceptedMimeType; 4] = [
        AcceptedMimeType::Pdf,
        AcceptedMimeType::Jpeg,
        AcceptedMimeType::Png,
        AcceptedMimeType::Webp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AcceptedMimeType::Pdf => "application/pdf",
            AcceptedMimeType::Jpeg => "image/jpeg",
            AcceptedMimeType::Png => "image/png",
            AcceptedMimeType::Webp => "image/webp",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            AcceptedMimeType::Pdf => &["pdf"],
            AcceptedMimeType::Jpeg => &["jpeg", "jpg"],
            AcceptedMimeType::Png => &["png"],
            AcceptedMimeType::Webp => &["webp"],
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.extensions().contains(&ext.as_str()))
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Detect the type from leading magic bytes.
    pub fn sniff(content: &[u8]) -> Option<Self> {
        if content.starts_with(b"%PDF") {
            Some(AcceptedMimeType::Pdf)
        } else if content.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(AcceptedMimeType::Jpeg)
        } else if content.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(AcceptedMimeType::Png)
        } else if content.len() >= 12 && &content[..4] == b"RIFF" && &content[8..12] == b"WEBP" {
            Some(AcceptedMimeType::Webp)
        } else {
            None
        }
    }
}

impl fmt::Display for AcceptedMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the bytes of a selected file live until they are encoded.
#[derive(Debug, Clone)]
pub enum FileSource {
    Disk(PathBuf),
    Memory(Bytes),
}

/// A single file chosen for extraction. Holds a handle, not the encoded
/// payload; reading happens when an extraction starts.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: AcceptedMimeType,
    pub source: FileSource,
}

impl SelectedFile {
    /// Select a file on disk. The type comes from the extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, ExtractionError> {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mime_type = AcceptedMimeType::from_path(&path)
            .ok_or_else(|| ExtractionError::UnsupportedFileType { name: name.clone() })?;

        Ok(Self {
            name,
            mime_type,
            source: FileSource::Disk(path),
        })
    }

    /// Select an in-memory file. The extension decides the type, falling back
    /// to the content's magic bytes.
    pub fn from_bytes(name: impl Into<String>, content: impl Into<Bytes>) -> Result<Self, ExtractionError> {
        let name = name.into();
        let content = content.into();

        let mime_type = AcceptedMimeType::from_path(Path::new(&name))
            .or_else(|| AcceptedMimeType::sniff(&content))
            .ok_or_else(|| ExtractionError::UnsupportedFileType { name: name.clone() })?;

        Ok(Self {
            name,
            mime_type,
            source: FileSource::Memory(content),
        })
    }
}
