// espanel-api: Async Rust client for the ESPHome web_server REST API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::DeviceClient;
pub use error::Error;
pub use transport::TransportConfig;
