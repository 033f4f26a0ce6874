//! Kinetic SDK
//!
//! Client for a Kinetic ledger service: token transactions are built and
//! signed locally, then handed to the service, which pays the fees and relays
//! them.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               Application Layer              │
//! │  KineticSdk orchestrators, config resolution │
//! │     app config cache, precondition fetch     │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │  Types, errors, KineticApi / signer traits   │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │ HTTP API client, transaction builders, keys  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Key Features
//!
//! - **Explicit configuration**: the app config is fetched once and cached;
//!   mint-dependent calls fail fast until it is
//! - **Fresh preconditions**: every built transaction gets its own blockhash
//! - **Local signing**: owner keys never leave the process
//! - **Typed errors**: callers branch on [`domain::SdkError`] variants
//! - **Testability**: the remote service sits behind [`domain::KineticApi`]
//!
//! # Example
//!
//! ```ignore
//! use kinetic_sdk::app::KineticSdk;
//! use kinetic_sdk::domain::{CallOptions, TransferRequest};
//! use kinetic_sdk::infra::{Keypair, SdkConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = SdkConfig::new("devnet", "devnet", 1);
//!     let sdk = KineticSdk::connect(&config).await?;
//!
//!     let owner = Keypair::generate();
//!     sdk.create_account(&owner, &CallOptions::default()).await?;
//!
//!     let transfer = TransferRequest::new("10", "Dest1nation...").with_sender_create(true);
//!     let tx = sdk.make_transfer(&owner, &transfer, &CallOptions::default()).await?;
//!     println!("{:?}", tx.signature);
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod domain;
pub mod infra;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use app::KineticSdk;
pub use domain::{CallOptions, Commitment, SdkError, TransactionType, TransferRequest};
pub use infra::{Keypair, SdkConfig};
