use crate::config::NO_FAULT;
use crate::http::response::HttpResponse;

/// Challenge sent with injected 401 responses
pub const BEARER_CHALLENGE: &str = r#"Bearer realm="test""#;

/// Whether a request path (leading slashes already stripped) names artifact
/// content rather than metadata such as `nix-cache-info` or `*.narinfo`.
pub fn is_artifact_path(path: &str) -> bool {
    path.starts_with("nar/") || path.ends_with(".nar") || path.ends_with(".nar.xz")
}

/// Status injected for artifact paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultPolicy {
    status: u16,
}

impl FaultPolicy {
    pub fn new(status: u16) -> Self {
        FaultPolicy { status }
    }

    pub fn disabled() -> Self {
        Self::new(NO_FAULT)
    }

    pub fn is_enabled(&self) -> bool {
        self.status != NO_FAULT
    }

    /// Injected response for `path`, if the policy applies to it
    pub fn check(&self, path: &str) -> Option<HttpResponse> {
        if !self.is_enabled() || !is_artifact_path(path) {
            return None;
        }

        let mut response = HttpResponse::new(self.status);
        if self.status == 401 {
            response.set_header("WWW-Authenticate", BEARER_CHALLENGE);
        }
        response.set_body(Vec::new());
        Some(response)
    }
}

impl Default for FaultPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}
