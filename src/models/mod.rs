pub mod document;
pub mod extraction;
pub mod request;
pub mod response;

pub use document::*;
pub use extraction::*;
pub use request::*;
pub use response::*;
