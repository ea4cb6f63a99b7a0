//! Serves a built single-page-app frontend from a directory on disk.

use std::path::{Path, PathBuf};

use tower_http::services::{ServeDir, ServeFile};

/// The file served for paths that do not match a file in the frontend directory.
const INDEX_FILE: &str = "index.html";

/// Decide whether the frontend should be mounted.
///
/// Returns `path` if it is set and refers to an existing directory. A path that is set but
/// does not exist is logged and ignored.
pub fn resolve_frontend_dir(path: Option<&Path>) -> Option<PathBuf> {
    let path = path?;

    if path.is_dir() {
        tracing::info!("Serving frontend from {}", path.display());
        Some(path.to_path_buf())
    } else {
        tracing::warn!(
            "The frontend directory {} does not exist, the frontend will not be served",
            path.display()
        );
        None
    }
}

/// A service that serves files from `dir`, falling back to its `index.html` so that the
/// frontend can handle its own routes.
pub(crate) fn frontend_service(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir).fallback(ServeFile::new(dir.join(INDEX_FILE)))
}
