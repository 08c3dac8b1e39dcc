//! App-level collaborators of the resolver
//!
//! - [`discovery`] - locating the app root from a working directory
//! - [`registry`] - named apps recorded under the recurl home
//! - [`scaffold`] - `recurl init`

pub mod discovery;
pub mod registry;
pub mod scaffold;

pub use discovery::find_app_root;
pub use registry::{AppRegistry, RegistryEntry, YamlRegistry};
pub use scaffold::create_app;
