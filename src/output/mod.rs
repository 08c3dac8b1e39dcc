//! Output handling (response display, tables)

pub mod response;
pub mod table;

pub use response::{format_body, status_line, write_response, DisplayMode};
pub use table::format_apps;
