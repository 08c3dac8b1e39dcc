//! HTTP transport

pub mod http;
pub mod ssl;

// Re-exports
pub use http::{ReqwestTransport, Transport, TransportOptions, TransportResponse, USER_AGENT_STRING};
pub use ssl::SslConfig;
