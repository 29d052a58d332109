//! Upload/result interaction as an explicit state machine.
//!
//! [`UploadState`] transitions are pure: each consumes the current state and
//! returns the next one. [`UploadController`] owns a state and performs the
//! only side effect, the extraction round trip.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::models::{ExtractionRequest, SelectedFile};
use crate::services::normalizer::{self, NormalizedResult};
use crate::services::{encode_file, Extractor};

pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred during extraction.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Ready,
    Extracting,
    Done,
    Errored,
}

#[derive(Debug, Clone, Default)]
pub enum UploadState {
    #[default]
    Empty,
    Ready {
        file: SelectedFile,
    },
    Extracting {
        file: SelectedFile,
    },
    Done {
        file: SelectedFile,
        result: NormalizedResult,
        /// Display text, editable by the user.
        text: String,
    },
    Errored {
        file: Option<SelectedFile>,
        message: String,
    },
}

impl UploadState {
    pub fn phase(&self) -> Phase {
        match self {
            UploadState::Empty => Phase::Empty,
            UploadState::Ready { .. } => Phase::Ready,
            UploadState::Extracting { .. } => Phase::Extracting,
            UploadState::Done { .. } => Phase::Done,
            UploadState::Errored { .. } => Phase::Errored,
        }
    }

    /// Replace any previous file, result or error with a fresh selection.
    /// Ignored while a request for the current file is in flight.
    pub fn select_file(self, file: SelectedFile) -> Self {
        match self {
            UploadState::Extracting { .. } => {
                debug!(file_name = %file.name, "Selection ignored while extracting");
                self
            }
            _ => UploadState::Ready { file },
        }
    }

    pub fn remove_file(self) -> Self {
        UploadState::Empty
    }

    /// Start an attempt. Returns the file to encode when a request should be
    /// issued; `None` when the trigger is ignored or rejected.
    pub fn begin_extraction(self) -> (Self, Option<SelectedFile>) {
        match self {
            UploadState::Extracting { .. } => (self, None),
            UploadState::Empty | UploadState::Errored { file: None, .. } => (
                UploadState::Errored {
                    file: None,
                    message: user_message(&ExtractionError::NoFileSelected),
                },
                None,
            ),
            UploadState::Ready { file }
            | UploadState::Done { file, .. }
            | UploadState::Errored { file: Some(file), .. } => {
                (UploadState::Extracting { file: file.clone() }, Some(file))
            }
        }
    }

    /// Settle an in-flight attempt. Outcomes arriving in any other state are
    /// dropped.
    pub fn resolve(self, outcome: Result<NormalizedResult, ExtractionError>) -> Self {
        match self {
            UploadState::Extracting { file } => match outcome {
                Ok(result) => UploadState::Done {
                    text: result.to_display_string(),
                    result,
                    file,
                },
                Err(err) => UploadState::Errored {
                    file: Some(file),
                    message: user_message(&err),
                },
            },
            other => other,
        }
    }

    /// Replace the displayed text. Only meaningful once a result exists. The
    /// tagged result is re-derived so it always describes the shown text.
    pub fn edit(self, new_text: impl Into<String>) -> Self {
        match self {
            UploadState::Done { file, .. } => {
                let text = new_text.into();
                UploadState::Done {
                    file,
                    result: normalizer::normalize(&text),
                    text,
                }
            }
            other => other,
        }
    }

    /// The `(document_type, data)` pair to persist. The edited text is parsed
    /// as JSON when possible; its `document_type` field wins over
    /// `default_type`.
    pub fn finalize(&self, default_type: &str) -> Option<(String, Value)> {
        let UploadState::Done { text, .. } = self else {
            return None;
        };

        let data = normalizer::to_value(text);
        let document_type = data
            .get("document_type")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(default_type)
            .to_string();

        Some((document_type, data))
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        match self {
            UploadState::Empty => None,
            UploadState::Ready { file }
            | UploadState::Extracting { file }
            | UploadState::Done { file, .. } => Some(file),
            UploadState::Errored { file, .. } => file.as_ref(),
        }
    }

    pub fn normalized_result(&self) -> Option<&str> {
        match self {
            UploadState::Done { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn structured_result(&self) -> Option<&NormalizedResult> {
        match self {
            UploadState::Done { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, UploadState::Extracting { .. })
    }

    pub fn last_error(&self) -> Option<&str> {
        match self {
            UploadState::Errored { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Whether the extract action is enabled.
    pub fn can_extract(&self) -> bool {
        !self.is_loading() && self.selected_file().is_some()
    }
}

/// Map a model reply to a displayable result. A reply that normalizes to
/// nothing is treated as an empty extraction.
pub fn interpret(reply: Result<String, ExtractionError>) -> Result<NormalizedResult, ExtractionError> {
    let result = normalizer::normalize(&reply?);
    match &result {
        NormalizedResult::PlainText(text) if text.is_empty() => Err(ExtractionError::EmptyResult),
        _ => Ok(result),
    }
}

fn user_message(err: &ExtractionError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        UNEXPECTED_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

/// Drives an [`UploadState`] through a real extraction.
pub struct UploadController<E> {
    extractor: E,
    state: UploadState,
}

impl<E: Extractor> UploadController<E> {
    pub fn new(extractor: E) -> Self {
        Self {
            extractor,
            state: UploadState::Empty,
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        self.transition(|s| s.select_file(file));
    }

    pub fn remove_file(&mut self) {
        self.transition(UploadState::remove_file);
    }

    pub fn edit(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.transition(|s| s.edit(text));
    }

    /// Run one extraction attempt to completion. Every failure ends up in
    /// the state's error message.
    pub async fn extract(&mut self) -> &UploadState {
        let (state, file) = std::mem::take(&mut self.state).begin_extraction();
        self.state = state;

        let Some(file) = file else {
            if let Some(message) = self.state.last_error() {
                warn!(message = %message, "Extraction not started");
            }
            return &self.state;
        };

        info!(file_name = %file.name, mime_type = %file.mime_type, "Extraction started");
        let outcome = self.run(&file).await;

        match &outcome {
            Ok(result) => info!(structured = result.is_structured(), "Extraction finished"),
            Err(err) => warn!(kind = err.kind(), error = %err, "Extraction failed"),
        }

        self.transition(|s| s.resolve(outcome));
        &self.state
    }

    async fn run(&self, file: &SelectedFile) -> Result<NormalizedResult, ExtractionError> {
        let encoded = encode_file(file).await?;
        let request = ExtractionRequest::new(encoded);
        interpret(self.extractor.extract(&request).await)
    }

    fn transition(&mut self, f: impl FnOnce(UploadState) -> UploadState) {
        self.state = f(std::mem::take(&mut self.state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn pdf(name: &str) -> SelectedFile {
        SelectedFile::from_bytes(name, b"%PDF-1.4 test".to_vec()).unwrap()
    }

    fn done(text: &str) -> UploadState {
        let (state, _) = UploadState::Ready { file: pdf("a.pdf") }.begin_extraction();
        state.resolve(interpret(Ok(text.to_string())))
    }

    #[derive(Clone)]
    struct FakeExtractor {
        calls: Arc<AtomicUsize>,
        reply: Arc<dyn Fn() -> Result<String, ExtractionError> + Send + Sync>,
    }

    impl FakeExtractor {
        fn replying(reply: impl Fn() -> Result<String, ExtractionError> + Send + Sync + 'static) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                reply: Arc::new(reply),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Extractor for FakeExtractor {
        async fn extract(&self, request: &ExtractionRequest) -> Result<String, ExtractionError> {
            assert!(!request.encoded_payload.is_empty());
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.reply)()
        }
    }

    #[test]
    fn selecting_a_file_clears_previous_outcome() {
        let state = done("hello").select_file(pdf("b.pdf"));
        assert_eq!(state.phase(), Phase::Ready);
        assert_eq!(state.selected_file().unwrap().name, "b.pdf");
        assert!(state.normalized_result().is_none());
        assert!(state.last_error().is_none());

        let errored = UploadState::Errored { file: None, message: "x".into() }.select_file(pdf("c.pdf"));
        assert_eq!(errored.phase(), Phase::Ready);
    }

    #[test]
    fn removing_the_file_always_empties() {
        assert_eq!(done("hello").remove_file().phase(), Phase::Empty);
        let (extracting, _) = UploadState::Ready { file: pdf("a.pdf") }.begin_extraction();
        assert_eq!(extracting.remove_file().phase(), Phase::Empty);
    }

    #[test]
    fn triggering_without_a_file_is_an_input_error() {
        let (state, file) = UploadState::Empty.begin_extraction();
        assert!(file.is_none());
        assert_eq!(state.phase(), Phase::Errored);
        assert_eq!(state.last_error(), Some("Please upload a file first!"));
    }

    #[test]
    fn triggering_while_extracting_is_a_no_op() {
        let (extracting, first) = UploadState::Ready { file: pdf("a.pdf") }.begin_extraction();
        assert!(first.is_some());
        assert!(extracting.is_loading());
        assert!(!extracting.can_extract());

        let (still, second) = extracting.begin_extraction();
        assert!(second.is_none());
        assert_eq!(still.phase(), Phase::Extracting);
    }

    #[test]
    fn selection_is_ignored_while_extracting() {
        let (extracting, _) = UploadState::Ready { file: pdf("a.pdf") }.begin_extraction();
        let state = extracting.select_file(pdf("b.pdf"));
        assert_eq!(state.phase(), Phase::Extracting);
        assert_eq!(state.selected_file().unwrap().name, "a.pdf");
    }

    #[test]
    fn retry_from_done_or_errored_clears_outcome() {
        let (state, file) = done("hello").begin_extraction();
        assert!(file.is_some());
        assert!(state.normalized_result().is_none());

        let errored = UploadState::Errored { file: Some(pdf("a.pdf")), message: "boom".into() };
        let (state, file) = errored.begin_extraction();
        assert!(file.is_some());
        assert!(state.last_error().is_none());
    }

    #[test]
    fn safety_block_has_its_own_message() {
        let (state, _) = UploadState::Ready { file: pdf("a.pdf") }.begin_extraction();
        let blocked = state.clone().resolve(Err(ExtractionError::SafetyBlocked));
        let generic = state.resolve(Err(ExtractionError::api("Bad Request")));

        assert_eq!(blocked.phase(), Phase::Errored);
        assert!(blocked.normalized_result().is_none());
        assert!(blocked.last_error().unwrap().contains("safety"));
        assert_ne!(blocked.last_error(), generic.last_error());
    }

    #[test]
    fn late_outcomes_are_dropped() {
        let state = UploadState::Empty.resolve(Ok(NormalizedResult::PlainText("late".into())));
        assert_eq!(state.phase(), Phase::Empty);
    }

    #[test]
    fn edits_only_apply_to_results() {
        let edited = done("hello").edit("hello, edited");
        assert_eq!(edited.phase(), Phase::Done);
        assert_eq!(edited.normalized_result(), Some("hello, edited"));

        let ready = UploadState::Ready { file: pdf("a.pdf") }.edit("nope");
        assert_eq!(ready.phase(), Phase::Ready);
        assert!(ready.normalized_result().is_none());
    }

    #[test]
    fn editing_rederives_the_tagged_result() {
        let state = done(r#"{"a":1}"#);
        assert_eq!(state.structured_result(), Some(&NormalizedResult::Structured(json!({ "a": 1 }))));

        let edited = state.edit("now plain text");
        assert_eq!(edited.normalized_result(), Some("now plain text"));
        assert_eq!(
            edited.structured_result(),
            Some(&NormalizedResult::PlainText("now plain text".to_string()))
        );

        let back = edited.edit(r#"{"b": 2}"#);
        assert_eq!(back.structured_result(), Some(&NormalizedResult::Structured(json!({ "b": 2 }))));
    }

    #[test]
    fn blank_reply_after_cleanup_is_empty() {
        assert!(matches!(interpret(Ok("```json\n```".into())), Err(ExtractionError::EmptyResult)));
    }

    #[test]
    fn finalize_prefers_document_type_from_json() {
        let state = done(r#"{"document_type":"Certificate","recipient_name":"A. Lovelace"}"#);
        let (doc_type, data) = state.finalize("Unknown").unwrap();
        assert_eq!(doc_type, "Certificate");
        assert_eq!(data["recipient_name"], "A. Lovelace");

        let (doc_type, data) = done("just text").finalize("Note").unwrap();
        assert_eq!(doc_type, "Note");
        assert_eq!(data, json!("just text"));

        assert!(UploadState::Empty.finalize("Note").is_none());
    }

    #[tokio::test]
    async fn controller_makes_no_call_without_a_file() {
        let extractor = FakeExtractor::replying(|| Ok("unused".into()));
        let mut controller = UploadController::new(extractor.clone());

        let state = controller.extract().await;
        assert_eq!(state.phase(), Phase::Errored);
        assert_eq!(extractor.calls(), 0);
    }

    #[tokio::test]
    async fn controller_runs_a_full_extraction() {
        let extractor = FakeExtractor::replying(|| Ok("```json\n{\"total\":100}\n```".into()));
        let mut controller = UploadController::new(extractor.clone());

        controller.select_file(pdf("invoice.pdf"));
        let state = controller.extract().await;

        assert_eq!(state.phase(), Phase::Done);
        assert_eq!(state.normalized_result(), Some("{\n  \"total\": 100\n}"));
        assert_eq!(extractor.calls(), 1);

        controller.edit("{\"total\": 120}");
        let (_, data) = controller.state().finalize("Invoice").unwrap();
        assert_eq!(data, json!({ "total": 120 }));
    }

    #[tokio::test]
    async fn controller_surfaces_failures_as_messages() {
        let extractor = FakeExtractor::replying(|| Err(ExtractionError::EmptyResult));
        let mut controller = UploadController::new(extractor);

        controller.select_file(pdf("blank.pdf"));
        let state = controller.extract().await;

        assert_eq!(state.phase(), Phase::Errored);
        assert!(state.last_error().unwrap().starts_with("No text could be extracted"));
        assert!(state.normalized_result().is_none());
        assert!(state.can_extract());
    }

    #[tokio::test]
    async fn unreadable_file_is_reported_without_a_call() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = FakeExtractor::replying(|| Ok("unused".into()));
        let mut controller = UploadController::new(extractor.clone());

        controller.select_file(SelectedFile::from_path(dir.path().join("missing.jpg")).unwrap());
        let state = controller.extract().await;

        assert_eq!(state.phase(), Phase::Errored);
        assert!(state.last_error().unwrap().contains("missing.jpg"));
        assert_eq!(extractor.calls(), 0);
    }
}
