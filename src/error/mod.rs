mod extraction;
mod types;

pub use extraction::ExtractionError;
pub use types::{AppError, AppResult};
