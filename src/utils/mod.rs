//! Utility modules.
//!
//! - [`HttpClient`]: shared reqwest client with a bounded request timeout

mod http;

pub use http::{HttpClient, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
