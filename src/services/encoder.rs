use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use crate::error::ExtractionError;
use crate::models::{EncodedFile, FileSource, SelectedFile};

/// Read a selected file and base64-encode it for the request body.
pub async fn encode_file(file: &SelectedFile) -> Result<EncodedFile, ExtractionError> {
    let data = match &file.source {
        FileSource::Disk(path) => {
            let content = tokio::fs::read(path)
                .await
                .map_err(|source| ExtractionError::Read {
                    name: file.name.clone(),
                    source,
                })?;
            encode_bytes(&content)
        }
        FileSource::Memory(content) => encode_bytes(content),
    };

    debug!(
        file_name = %file.name,
        mime_type = %file.mime_type,
        encoded_len = data.len(),
        "Encoded file payload"
    );

    Ok(EncodedFile {
        mime_type: file.mime_type,
        data,
    })
}

pub fn encode_bytes(content: &[u8]) -> String {
    STANDARD.encode(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn encoded_payload_decodes_to_original_bytes() {
        let mut content = b"%PDF-1.4\n".to_vec();
        content.extend((0u8..=255).cycle().take(4096));

        let mut temp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        temp.write_all(&content).unwrap();

        let file = SelectedFile::from_path(temp.path()).unwrap();
        let encoded = encode_file(&file).await.unwrap();

        assert_eq!(encoded.mime_type, crate::models::AcceptedMimeType::Pdf);
        assert_eq!(STANDARD.decode(&encoded.data).unwrap(), content);
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = SelectedFile::from_path(dir.path().join("gone.png")).unwrap();

        let err = encode_file(&file).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Read { ref name, .. } if name == "gone.png"));
    }

    #[tokio::test]
    async fn in_memory_files_encode_without_io() {
        let file = SelectedFile::from_bytes("photo.webp", b"RIFF\x00\x00\x00\x00WEBP".to_vec()).unwrap();
        let encoded = encode_file(&file).await.unwrap();
        assert_eq!(encoded.data, "UklGRgAAAABXRUJQ");
    }
}
