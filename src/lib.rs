pub mod common;
pub mod server;
pub mod store;
pub mod utils;
