//! Infrastructure layer implementations.

pub mod config;
pub mod http;
pub mod observability;
pub mod solana;

pub use config::SdkConfig;
pub use http::HttpKineticApi;
pub use solana::Keypair;
