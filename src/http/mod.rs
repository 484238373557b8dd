//! HTTP layer: the thin host surface the monitor is embedded behind.

pub mod server;

pub use server::HttpServer;
