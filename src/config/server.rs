use crate::net::timeout::TimeoutConfig;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Status code that disables fault injection
pub const NO_FAULT: u16 = 200;

/// Server configuration, read once at startup from flags or the environment
#[derive(Debug, Clone, Parser)]
#[command(name = "nar-fault-server")]
#[command(version, about = "Static binary-cache server that can fail artifact downloads on demand", long_about = None)]
pub struct ServerConfig {
    /// Directory to serve files from
    #[arg(long = "cache-dir", env = "CACHE_DIR", value_name = "DIR", default_value = ".")]
    pub cache_dir: PathBuf,

    /// HTTP status returned for artifact paths (200 disables injection)
    #[arg(
        long = "return-code",
        env = "RETURN_CODE",
        value_name = "STATUS",
        default_value_t = NO_FAULT
    )]
    pub return_code: u16,

    /// Port to bind to (0 = OS-assigned)
    #[arg(long, short = 'p', env = "TEST_SERVER_PORT", default_value_t = 0)]
    pub port: u16,

    /// Address to bind to
    #[arg(long, short = 'b', env = "TEST_SERVER_BIND", default_value = "127.0.0.1")]
    pub bind: IpAddr,

    /// Per-connection read/write timeout (0 = no timeout)
    #[arg(long = "timeout-secs", value_name = "SECONDS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// debug logging as default instead of warn; use RUST_LOG env for more options
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

impl ServerConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn timeouts(&self) -> TimeoutConfig {
        TimeoutConfig::from_secs(self.timeout_secs)
    }

    pub fn injects_faults(&self) -> bool {
        self.return_code != NO_FAULT
    }
}

#[cfg(test)]
impl ServerConfig {
    /// Loopback config on an ephemeral port
    pub fn new(cache_dir: impl Into<PathBuf>, return_code: u16) -> Self {
        ServerConfig {
            cache_dir: cache_dir.into(),
            return_code,
            port: 0,
            bind: IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
            timeout_secs: 30,
            verbose: false,
        }
    }
}
