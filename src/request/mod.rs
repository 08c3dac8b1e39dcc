//! Request assembly
//!
//! - [`descriptor`] - the immutable request value
//! - [`builder`] - merged configuration to request

pub mod builder;
pub mod descriptor;

pub use builder::{build, build_from_merged, AuthScheme};
pub use descriptor::{Body, Headers, RequestDescriptor};
