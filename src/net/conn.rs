use crate::errors::{ParseError, Result, ServerError};
use crate::http::parse::HttpParser;
use crate::http::request::{HttpRequest, Method};
use crate::http::response::HttpResponse;
use crate::routing::Router;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream};
use tracing::{debug, warn};

/// One accepted client: a single request in, a single response out
pub struct Connection<S = TcpStream> {
    stream: S,
    addr: SocketAddr,
}

impl<S: Read + Write> Connection<S> {
    pub fn new(stream: S, addr: SocketAddr) -> Self {
        Connection { stream, addr }
    }

    /// Read until the request head is complete
    pub fn read_request(&mut self) -> Result<HttpRequest> {
        let mut parser = HttpParser::new();
        let mut temp_buf = [0u8; 4096];

        loop {
            let n = match self.stream.read(&mut temp_buf) {
                Ok(0) => return Err(ParseError::Incomplete.into()),
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            if let Some(request) = parser.parse(&temp_buf[..n])? {
                return Ok(request);
            }
        }
    }

    pub fn write_response(&mut self, response: &HttpResponse, include_body: bool) -> io::Result<()> {
        let bytes = if include_body {
            response.to_bytes()
        } else {
            response.head_bytes()
        };
        self.stream.write_all(&bytes)?;
        self.stream.flush()
    }

    /// Handle the connection's single request. Errors are local to this
    /// connection; the caller only logs them.
    pub fn serve(mut self, router: &Router) -> Result<()> {
        let request = match self.read_request() {
            Ok(request) => request,
            // Client went away without asking for anything
            Err(ServerError::Parse(ParseError::Incomplete)) => return Ok(()),
            Err(ServerError::Parse(e)) => {
                debug!(peer = %self.addr, error = %e, "malformed request");
                self.write_response(&HttpResponse::bad_request(), true)?;
                return Err(e.into());
            }
            Err(e) => return Err(e),
        };

        let include_body = request.method != Method::HEAD;
        let response = match router.route_request(&request) {
            Ok(response) => response,
            Err(e) => {
                warn!(peer = %self.addr, path = %request.path, error = %e, "failed to read file");
                // Best effort; the socket may already be unusable
                let _ = self.write_response(&HttpResponse::internal_server_error(), include_body);
                return Err(e.into());
            }
        };

        debug!(
            peer = %self.addr,
            method = %request.method,
            path = %request.path,
            query = ?request.query_string,
            version = %request.version,
            user_agent = ?request.get_header("User-Agent"),
            status = response.status_code,
            bytes = response.body.len(),
            "request served"
        );
        self.write_response(&response, include_body)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    /// In-memory stream: reads from a fixed request, records what is written
    struct MockStream {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl MockStream {
        fn new(input: &[u8]) -> Self {
            MockStream {
                input: Cursor::new(input.to_vec()),
                output: Vec::new(),
            }
        }
    }

    impl Read for MockStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for MockStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn exchange(router: &Router, request: &[u8]) -> (Result<()>, Vec<u8>) {
        let mut stream = MockStream::new(request);
        let result = Connection::new(&mut stream, peer()).serve(router);
        (result, stream.output)
    }

    fn router(status: u16) -> (TempDir, Router) {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("abc123.narinfo"), "StorePath: /nix/store/abc123").unwrap();
        let router = Router::from_config(&ServerConfig::new(temp_dir.path(), status));
        (temp_dir, router)
    }

    #[test]
    fn test_get_writes_full_response() {
        let (_cache, router) = router(200);
        let (result, output) = exchange(&router, b"GET /abc123.narinfo HTTP/1.1\r\n\r\n");

        assert!(result.is_ok());
        assert!(output.starts_with(b"HTTP/1.0 200 OK\r\n"));
        assert!(output.ends_with(b"\r\n\r\nStorePath: /nix/store/abc123"));
    }

    #[test]
    fn test_head_omits_body() {
        let (_cache, router) = router(200);
        let (result, output) = exchange(&router, b"HEAD /abc123.narinfo HTTP/1.1\r\n\r\n");
        let text = String::from_utf8(output).unwrap();

        assert!(result.is_ok());
        assert!(text.contains("Content-Length: 28\r\n"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_malformed_request_gets_bad_request() {
        let (_cache, router) = router(200);
        let (result, output) = exchange(&router, b"NONSENSE\r\n\r\n");

        assert!(matches!(result, Err(ServerError::Parse(_))));
        assert!(output.starts_with(b"HTTP/1.0 400 Bad Request\r\n"));
    }

    #[test]
    fn test_early_close_is_silent() {
        let (_cache, router) = router(200);
        let (result, output) = exchange(&router, b"GET /abc1");

        assert!(result.is_ok());
        assert!(output.is_empty());
    }

    #[test]
    fn test_bare_lf_request_is_served() {
        let (_cache, router) = router(200);
        let (result, output) = exchange(&router, b"GET /abc123.narinfo HTTP/1.0\n\n");

        assert!(result.is_ok());
        assert!(output.starts_with(b"HTTP/1.0 200 OK\r\n"));
        assert!(output.ends_with(b"StorePath: /nix/store/abc123"));
    }

    #[cfg(unix)]
    #[test]
    fn test_read_failure_gets_internal_error() {
        let (_cache, router) = router(200);
        // Longer than NAME_MAX, so stat fails with something other than NotFound
        let request = format!("GET /{}.narinfo HTTP/1.1\r\n\r\n", "a".repeat(300));
        let (result, output) = exchange(&router, request.as_bytes());

        assert!(matches!(result, Err(ServerError::Io(_))));
        assert!(output.starts_with(b"HTTP/1.0 500 Internal Server Error\r\n"));
        assert!(output.ends_with(b"Content-Length: 0\r\n\r\n"));

        let (result, output) = exchange(&router, b"GET /abc123.narinfo HTTP/1.1\r\n\r\n");
        assert!(result.is_ok());
        assert!(output.starts_with(b"HTTP/1.0 200 OK\r\n"));
    }
}
