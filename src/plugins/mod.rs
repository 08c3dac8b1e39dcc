//! Hook extension points
//!
//! Hooks transform the merged configuration (`after_config`) and the
//! assembled request (`after_prepare`). They run with full trust, inline with
//! the resolution, and a failing hook aborts it.

pub mod command;
pub mod hooks;

pub use command::{discover, CommandHook};
pub use hooks::{ConfigTransform, HookPipeline, HookPoint, RequestTransform};
