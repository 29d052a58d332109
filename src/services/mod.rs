pub mod document_api;
pub mod encoder;
pub mod gemini;
pub mod normalizer;

pub use document_api::DocumentApiClient;
pub use encoder::{encode_bytes, encode_file};
pub use gemini::{Extractor, GeminiClient};
pub use normalizer::{normalize, normalize_text, NormalizedResult};
