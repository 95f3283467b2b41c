pub mod config;
pub mod errors;

pub use config::RelayConfig;
pub use errors::AppError;
