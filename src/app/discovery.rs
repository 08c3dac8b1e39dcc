//! App root discovery

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::APP_MARKER;

/// Walk upward from `start` until a directory holding the marker file is found
pub fn find_app_root(start: &Path) -> Option<PathBuf> {
    let found = start
        .ancestors()
        .find(|dir| dir.join(APP_MARKER).is_file())
        .map(Path::to_path_buf);

    debug!(start = %start.display(), found = ?found, "App root lookup");
    found
}
