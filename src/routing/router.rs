use crate::config::ServerConfig;
use crate::fs::StaticFileServer;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;
use crate::routing::FaultPolicy;
use std::io;

/// Decides between an injected fault, a file from the serve root, or 404
#[derive(Debug, Clone)]
pub struct Router {
    files: StaticFileServer,
    fault: FaultPolicy,
}

impl Router {
    pub fn new(files: StaticFileServer, fault: FaultPolicy) -> Self {
        Router { files, fault }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            StaticFileServer::new(&config.cache_dir),
            FaultPolicy::new(config.return_code),
        )
    }

    /// Route a parsed request. HEAD gets the same response as GET; the
    /// connection layer drops the body.
    pub fn route_request(&self, request: &HttpRequest) -> io::Result<HttpResponse> {
        if !request.method.is_read() {
            return Ok(HttpResponse::not_implemented());
        }
        self.route_path(request.relative_path())
    }

    /// The GET decision for a path relative to the serve root
    pub fn route_path(&self, path: &str) -> io::Result<HttpResponse> {
        if let Some(response) = self.fault.check(path) {
            return Ok(response);
        }

        Ok(match self.files.read_file(path)? {
            Some(content) => HttpResponse::octet_stream(content),
            None => HttpResponse::not_found(),
        })
    }
}
