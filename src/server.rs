use crate::config::{ConfigValidator, ServerConfig};
use crate::errors::{Result, ServerError};
use crate::net::{Connection, TimeoutConfig};
use crate::routing::Router;
use std::io::{self, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

/// Bound listener plus the read-only routing state shared by every
/// connection thread
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
    timeouts: TimeoutConfig,
}

impl Server {
    /// Validate the configuration and bind the listener
    pub fn bind(config: &ServerConfig) -> Result<Self> {
        let mut validator = ConfigValidator::new();
        validator.validate(config)?;
        for warning in validator.warnings() {
            warn!("{warning}");
        }

        let addr = config.listen_addr();
        let listener = TcpListener::bind(addr).map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;

        let server = Server {
            listener,
            router: Arc::new(Router::from_config(config)),
            timeouts: config.timeouts(),
        };
        info!(
            addr = %server.local_addr()?,
            cache_dir = %config.cache_dir.display(),
            return_code = config.return_code,
            "listener bound"
        );
        Ok(server)
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Write the bound port as a single line so a parent process can pick
    /// up an ephemeral port
    pub fn announce_port<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "{}", self.local_addr()?.port())?;
        out.flush()
    }

    /// Accept connections until the process is killed, one thread each
    pub fn run(&self) -> Result<()> {
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => self.spawn_connection(stream),
                // Transient accept failures (e.g. EMFILE, ECONNABORTED) must not stop the loop
                Err(e) => warn!(error = %e, "failed to accept connection"),
            }
        }
        Ok(())
    }

    fn spawn_connection(&self, stream: TcpStream) {
        let router = Arc::clone(&self.router);
        let timeouts = self.timeouts;

        thread::spawn(move || {
            let addr = match stream.peer_addr() {
                Ok(addr) => addr,
                Err(e) => {
                    debug!(error = %e, "connection closed before it could be served");
                    return;
                }
            };
            if let Err(e) = timeouts.apply(&stream) {
                warn!(peer = %addr, error = %e, "failed to set socket timeouts");
            }

            if let Err(e) = Connection::new(stream, addr).serve(&router) {
                debug!(peer = %addr, error = %e, "connection ended with error");
            }
        });
    }
}
