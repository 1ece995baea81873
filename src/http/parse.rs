use crate::errors::ParseError;
use crate::http::request::{HttpRequest, Method};
use std::str;

/// Upper bound on request line plus headers
pub const MAX_HEAD_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseState {
    RequestLine,
    Headers,
    Complete,
}

/// Incremental parser for an HTTP/1.x request head. Bodies are never read.
#[derive(Debug)]
pub struct HttpParser {
    state: ParseState,
    buffer: Vec<u8>,
    consumed: usize,
    request: Option<HttpRequest>,
}

impl HttpParser {
    pub fn new() -> Self {
        HttpParser {
            state: ParseState::RequestLine,
            buffer: Vec::new(),
            consumed: 0,
            request: None,
        }
    }

    /// Feed more bytes. Returns Ok(Some(request)) once the blank line ending
    /// the head has been seen, Ok(None) when more data is needed.
    pub fn parse(&mut self, data: &[u8]) -> Result<Option<HttpRequest>, ParseError> {
        self.buffer.extend_from_slice(data);

        loop {
            match self.state {
                ParseState::RequestLine => match self.take_line()? {
                    // Tolerate stray CRLFs before the request line
                    Some(line) if line.is_empty() => continue,
                    Some(line) => {
                        self.request = Some(parse_request_line(&line)?);
                        self.state = ParseState::Headers;
                    }
                    None => return Ok(None),
                },
                ParseState::Headers => match self.take_line()? {
                    Some(line) if line.is_empty() => self.state = ParseState::Complete,
                    Some(line) => {
                        let header = parse_header(&line)?;
                        if let Some(request) = self.request.as_mut() {
                            request.headers.push(header);
                        }
                    }
                    None => return Ok(None),
                },
                ParseState::Complete => return Ok(self.request.clone()),
            }
        }
    }

    /// Next line without its terminator. Lines end in CRLF or a bare LF.
    fn take_line(&mut self) -> Result<Option<String>, ParseError> {
        let Some(pos) = self.find_lf() else {
            if self.consumed + self.buffer.len() > MAX_HEAD_SIZE {
                return Err(ParseError::HeadTooLarge(MAX_HEAD_SIZE));
            }
            return Ok(None);
        };

        self.consumed += pos + 1;
        if self.consumed > MAX_HEAD_SIZE {
            return Err(ParseError::HeadTooLarge(MAX_HEAD_SIZE));
        }

        let line_bytes: Vec<u8> = self.buffer.drain(..pos + 1).collect();
        let line = line_bytes[..pos].strip_suffix(b"\r").unwrap_or(&line_bytes[..pos]);
        let line = str::from_utf8(line).map_err(|_| ParseError::InvalidUtf8)?;
        Ok(Some(line.to_string()))
    }

    fn find_lf(&self) -> Option<usize> {
        self.buffer.iter().position(|&b| b == b'\n')
    }
}

impl Default for HttpParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_request_line(line: &str) -> Result<HttpRequest, ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let [method, target, version] = parts.as_slice() else {
        return Err(ParseError::InvalidRequestLine(line.to_string()));
    };

    if !version.starts_with("HTTP/") {
        return Err(ParseError::InvalidVersion(version.to_string()));
    }

    Ok(HttpRequest::new(Method::parse(method), target, version))
}

fn parse_header(line: &str) -> Result<(String, String), ParseError> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| ParseError::InvalidHeader(line.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ParseError::InvalidHeader(line.to_string()));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
