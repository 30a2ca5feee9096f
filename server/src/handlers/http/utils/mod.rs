pub mod deliver_page;
pub mod form;
pub mod headers;
pub mod json_response;

// Re-export commonly used utilities
pub use deliver_page::*;
pub use form::*;
pub use headers::*;
pub use json_response::*;
