//! Static file path resolution

use std::path::{Path, PathBuf};

/// Map a request path to a filesystem path under the document root
///
/// The request path must be absolute; `.` and empty components are dropped
/// and any `..` component rejects the whole path, so the result can never
/// escape the root. Returns `None` for anything unservable (existence is the
/// caller's concern).
pub fn sanitize(doc_root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = request_path.strip_prefix('/')?;

    let mut resolved = doc_root.to_path_buf();
    for component in relative.split('/') {
        match component {
            "" | "." => continue,
            ".." => return None,
            name => resolved.push(name),
        }
    }
    Some(resolved)
}
