//! Layered configuration
//!
//! - [`layer`] - loading YAML documents into mappings
//! - [`merge`] - deterministic precedence merge
//! - [`resolver`] - gathering the four layers of a resolution
//! - [`settings`] - user-wide locations and constants

pub mod layer;
pub mod merge;
pub mod resolver;
pub mod settings;

pub use layer::{load_layer, LayerName, Mapping};
pub use merge::merge;
pub use resolver::{ConfigResolver, ResolvedConfig};
pub use settings::{Settings, APP_MARKER, DEFAULT_ENV, DEFAULT_TIMEOUT};
