//! Transport layer for the Litmus SDK.

pub mod http;

pub use http::HttpTransport;
