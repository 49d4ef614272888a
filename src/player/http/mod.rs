//! Player adapter polling a JSON now-playing endpoint over HTTP.

mod client;
mod config;

pub use client::HttpPlayerClient;
pub use config::HttpPlayerConfig;
