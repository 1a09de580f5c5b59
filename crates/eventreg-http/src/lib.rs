//! REST-backed `RegistrationStore`.

mod client;
mod config;

pub use client::HttpRegistrationStore;
pub use config::HttpStoreConfig;
