use thiserror::Error;

/// Everything that can go wrong between selecting a file and displaying the
/// model's reply.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Please upload a file first!")]
    NoFileSelected,

    #[error("Unsupported file type '{name}'. Accepted types: PDF, JPG, PNG, or WEBP")]
    UnsupportedFileType { name: String },

    #[error("Failed to read file '{name}': {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("API Error: {message}")]
    Api { message: String },

    #[error("Request to the extraction API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Content was blocked due to safety concerns. Please try a different file.")]
    SafetyBlocked,

    #[error("No text could be extracted from the file. The API response might be empty.")]
    EmptyResult,

    #[error("Unexpected response from the extraction API: {message}")]
    MalformedResponse { message: String },
}

impl ExtractionError {
    pub fn api(message: impl Into<String>) -> Self {
        ExtractionError::Api {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ExtractionError::MalformedResponse {
            message: message.into(),
        }
    }

    /// Short machine-readable tag, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::NoFileSelected => "no_file_selected",
            ExtractionError::UnsupportedFileType { .. } => "unsupported_file_type",
            ExtractionError::Read { .. } => "read",
            ExtractionError::Api { .. } => "api",
            ExtractionError::Transport(_) => "transport",
            ExtractionError::SafetyBlocked => "safety_blocked",
            ExtractionError::EmptyResult => "empty_result",
            ExtractionError::MalformedResponse { .. } => "malformed_response",
        }
    }
}
