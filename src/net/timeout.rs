use std::io;
use std::net::TcpStream;
use std::time::Duration;

/// Socket timeouts applied to every accepted connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Timeout for reading the request head
    pub read: Option<Duration>,
    /// Timeout for writing response data
    pub write: Option<Duration>,
}

impl TimeoutConfig {
    /// Same timeout for both directions; 0 disables them
    pub fn from_secs(secs: u64) -> Self {
        let timeout = (secs > 0).then(|| Duration::from_secs(secs));
        TimeoutConfig {
            read: timeout,
            write: timeout,
        }
    }

    pub fn apply(&self, stream: &TcpStream) -> io::Result<()> {
        stream.set_read_timeout(self.read)?;
        stream.set_write_timeout(self.write)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self::from_secs(30)
    }
}
