//! Test utilities and mock implementations.
//!
//! Provides an in-memory [`KineticApi`](crate::domain::KineticApi) plus
//! descriptor fixtures for unit tests.

pub mod mocks;

pub use mocks::{
    MockConfig, MockKineticApi, default_mint, memo_mint, sample_app_config, test_key,
};
