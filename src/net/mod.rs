pub mod conn;
pub mod timeout;

pub use conn::Connection;
pub use timeout::TimeoutConfig;
