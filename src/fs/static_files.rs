use crate::fs::path_utils::safe_path_join;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read-only view of the serve root
#[derive(Debug, Clone)]
pub struct StaticFileServer {
    document_root: PathBuf,
}

impl StaticFileServer {
    pub fn new<P: AsRef<Path>>(document_root: P) -> Self {
        StaticFileServer {
            document_root: document_root.as_ref().to_path_buf(),
        }
    }

    /// Contents of the regular file at `request_path`, or `None` when there
    /// is no such file. Only unexpected I/O failures are errors.
    pub fn read_file(&self, request_path: &str) -> io::Result<Option<Vec<u8>>> {
        let file_path = match safe_path_join(&self.document_root, request_path) {
            Ok(path) => path,
            Err(e) => {
                debug!(path = request_path, error = %e, "rejected request path");
                return Ok(None);
            }
        };

        match fs::metadata(&file_path) {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => return Ok(None),
            Err(e) if is_missing(&e) => return Ok(None),
            Err(e) => return Err(e),
        }

        match fs::read(&file_path) {
            Ok(content) => Ok(Some(content)),
            // Removed between the stat and the read
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn is_missing(e: &io::Error) -> bool {
    // NotADirectory shows up when a path segment is a regular file
    matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("nar")).unwrap();
        fs::write(temp_dir.path().join("nar/abc123.nar"), b"hello").unwrap();

        let server = StaticFileServer::new(temp_dir.path());
        assert_eq!(
            server.read_file("/nar/abc123.nar").unwrap(),
            Some(b"hello".to_vec())
        );
    }

    #[test]
    fn test_binary_content_is_preserved() {
        let temp_dir = TempDir::new().unwrap();
        let content: Vec<u8> = (0..=255).collect();
        fs::write(temp_dir.path().join("abc123.nar.xz"), &content).unwrap();

        let server = StaticFileServer::new(temp_dir.path());
        assert_eq!(server.read_file("abc123.nar.xz").unwrap(), Some(content));
    }

    #[test]
    fn test_missing_and_non_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("nar")).unwrap();
        fs::write(temp_dir.path().join("abc123.narinfo"), "StorePath: /nix/store/abc123").unwrap();

        let server = StaticFileServer::new(temp_dir.path());
        assert_eq!(server.read_file("/does-not-exist.nar").unwrap(), None);
        assert_eq!(server.read_file("/nar").unwrap(), None);
        assert_eq!(server.read_file("/").unwrap(), None);
        assert_eq!(server.read_file("/abc123.narinfo/child").unwrap(), None);
        assert_eq!(server.read_file("/../etc/passwd").unwrap(), None);
    }

    #[test]
    fn test_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let server = StaticFileServer::new(temp_dir.path().join("gone"));
        assert_eq!(server.read_file("/nix-cache-info").unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_unexpected_io_error_is_returned() {
        let temp_dir = TempDir::new().unwrap();
        let server = StaticFileServer::new(temp_dir.path());

        let overlong = format!("/{}.nar", "a".repeat(300));
        let err = server.read_file(&overlong).unwrap_err();
        assert!(!is_missing(&err));
    }
}
