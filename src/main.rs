mod config;
mod errors;
mod fs;
mod http;
mod net;
mod routing;
mod server;
mod telemetry;

use clap::Parser;
use config::ServerConfig;
use server::Server;
use std::io;
use std::process;

fn main() {
    let config = ServerConfig::parse();

    if let Err(e) = telemetry::init_tracing(config.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let server = match Server::bind(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to start server: {}", e);
            process::exit(1);
        }
    };

    // The port must be the first line on stdout, before any request is served
    if let Err(e) = server.announce_port(io::stdout().lock()) {
        eprintln!("Failed to announce port: {}", e);
        process::exit(1);
    }

    if let Err(e) = server.run() {
        eprintln!("Server error: {}", e);
        process::exit(1);
    }
}
