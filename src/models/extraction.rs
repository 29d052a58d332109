//! Wire types for the Gemini `generateContent` call and the typed view the
//! rest of the crate works with.

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;
use crate::models::AcceptedMimeType;
use crate::prompts::EXTRACTION_PROMPT;

/// Base64 content of a selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFile {
    pub mime_type: AcceptedMimeType,
    pub data: String,
}

/// One extraction attempt. Built fresh per attempt and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub mime_type: AcceptedMimeType,
    pub encoded_payload: String,
    pub instruction_prompt: String,
}

impl ExtractionRequest {
    pub fn new(file: EncodedFile) -> Self {
        Self {
            mime_type: file.mime_type,
            encoded_payload: file.data,
            instruction_prompt: EXTRACTION_PROMPT.to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.instruction_prompt = prompt.into();
        self
    }

    pub fn to_body(&self) -> GenerateContentRequest<'_> {
        GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Text {
                        text: &self.instruction_prompt,
                    },
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            mime_type: self.mime_type.as_str(),
                            data: &self.encoded_payload,
                        },
                    },
                ],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RequestContent<'a> {
    pub parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RequestPart<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData<'a> {
    pub mime_type: &'a str,
    pub data: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

pub const SAFETY_FINISH_REASON: &str = "SAFETY";

/// The parts of a reply this crate cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResponse {
    pub candidate_text: Option<String>,
    pub safety_blocked: bool,
}

impl ExtractionResponse {
    /// Text of the reply, or the distinct failure it represents.
    pub fn into_text(self) -> Result<String, ExtractionError> {
        if self.safety_blocked {
            return Err(ExtractionError::SafetyBlocked);
        }
        match self.candidate_text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ExtractionError::EmptyResult),
        }
    }
}

impl From<GenerateContentResponse> for ExtractionResponse {
    fn from(reply: GenerateContentResponse) -> Self {
        let prompt_blocked = reply.candidates.is_empty()
            && reply
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref())
                .is_some();

        let first = reply.candidates.into_iter().next();
        let candidate_blocked = first
            .as_ref()
            .and_then(|c| c.finish_reason.as_deref())
            .map_or(false, |reason| reason == SAFETY_FINISH_REASON);

        let candidate_text = first
            .and_then(|c| c.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text);

        Self {
            candidate_text,
            safety_blocked: prompt_blocked || candidate_blocked,
        }
    }
}
