//! Application layer: per-call resolution, the shared config cache and the
//! operation orchestrators.

pub mod cache;
pub mod precondition;
pub mod resolver;
pub mod service;

pub use cache::AppConfigCache;
pub use precondition::PreconditionFetcher;
pub use resolver::{resolve_commitment, resolve_mint};
pub use service::KineticSdk;
