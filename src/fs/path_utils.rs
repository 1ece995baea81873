use std::io;
use std::path::{Path, PathBuf};

/// Resolve a request path within the serve root, refusing anything that
/// could climb out of it.
pub fn safe_path_join(root: &Path, request_path: &str) -> io::Result<PathBuf> {
    let mut result = root.to_path_buf();

    for component in request_path.trim_start_matches('/').split('/') {
        match component {
            "" | "." => continue,
            ".." => {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "directory traversal not allowed",
                ));
            }
            comp if comp.contains('\0') => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "null bytes in path not allowed",
                ));
            }
            comp => result.push(comp),
        }
    }

    // Symlinks may still point elsewhere; compare canonical forms when both exist.
    if let (Ok(canonical_root), Ok(canonical_result)) = (root.canonicalize(), result.canonicalize()) {
        if !canonical_result.starts_with(&canonical_root) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "path escapes serve root",
            ));
        }
    }

    Ok(result)
}
