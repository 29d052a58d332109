//! Docuscan document OCR service
//!
//! Sends a single uploaded document to a hosted multimodal model for text
//! and structured-data extraction, normalizes the reply, and stores
//! finalized results in a document store.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod prompts;
pub mod services;
pub mod session;
pub mod store;
pub mod telemetry;

pub use config::{Config, GeminiConfig};
pub use error::{AppError, AppResult, ExtractionError};
pub use session::{UploadController, UploadState};
