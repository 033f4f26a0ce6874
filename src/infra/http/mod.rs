//! HTTP transport for the Kinetic API.

pub mod client;

pub use client::{HttpKineticApi, USER_AGENT};
