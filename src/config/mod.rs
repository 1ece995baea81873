pub mod server;
pub mod validation;

pub use server::{ServerConfig, NO_FAULT};
pub use validation::ConfigValidator;
