use std::fmt;

pub const SERVER_NAME: &str = "nar-fault-server";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    /// Headers in emission order; names keep their casing on the wire
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub version: &'static str,
}

impl HttpResponse {
    pub fn new(status_code: u16) -> Self {
        HttpResponse {
            status_code,
            headers: vec![("Server".to_string(), SERVER_NAME.to_string())],
            body: Vec::new(),
            // One request per connection, closed after the response
            version: "HTTP/1.0",
        }
    }

    /// Status with an empty body and `Content-Length: 0`
    pub fn empty(status_code: u16) -> Self {
        let mut response = Self::new(status_code);
        response.set_body(Vec::new());
        response
    }

    /// 200 carrying raw file bytes
    pub fn octet_stream(content: Vec<u8>) -> Self {
        let mut response = Self::new(200);
        response.set_header("Content-Type", "application/octet-stream");
        response.set_body(content);
        response
    }

    pub fn not_found() -> Self {
        Self::empty(404)
    }

    pub fn bad_request() -> Self {
        Self::empty(400)
    }

    pub fn not_implemented() -> Self {
        Self::empty(501)
    }

    pub fn internal_server_error() -> Self {
        Self::empty(500)
    }

    /// Insert or replace a header, matching names case-insensitively
    pub fn set_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
        let length = self.body.len().to_string();
        self.set_header("Content-Length", &length);
    }

    pub fn status_text(&self) -> &'static str {
        reason_phrase(self.status_code)
    }

    /// Status line and headers, terminated by the blank line
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut head = format!("{} {} {}\r\n", self.version, self.status_code, self.status_text());
        for (name, value) in &self.headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");
        head.into_bytes()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut response = self.head_bytes();
        response.extend_from_slice(&self.body);
        response
    }
}

#[cfg(test)]
impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Display for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.version, self.status_code, self.status_text())
    }
}

pub fn reason_phrase(status_code: u16) -> &'static str {
    match status_code {
        100 => "Continue",
        101 => "Switching Protocols",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        206 => "Partial Content",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        413 => "Payload Too Large",
        416 => "Range Not Satisfiable",
        418 => "I'm a teapot",
        429 => "Too Many Requests",
        451 => "Unavailable For Legal Reasons",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}
