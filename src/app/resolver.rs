//! Per-call resolution of commitment and mint.

use crate::domain::{AppConfig, AppConfigMint, Commitment, SdkError};

/// Pick the commitment for a call.
///
/// The explicit argument wins, then the client-wide default, then
/// [`Commitment::FALLBACK`]. Never fails.
#[must_use]
pub fn resolve_commitment(explicit: Option<Commitment>, default: Option<Commitment>) -> Commitment {
    explicit.or(default).unwrap_or(Commitment::FALLBACK)
}

/// Find the mint a call operates on.
///
/// With no explicit identifier the descriptor's default mint is used. The
/// identifier must match one of the configured mints exactly.
pub fn resolve_mint<'a>(
    config: &'a AppConfig,
    mint: Option<&str>,
) -> Result<&'a AppConfigMint, SdkError> {
    let wanted = mint.unwrap_or(&config.mint.public_key);
    config
        .mints
        .iter()
        .find(|m| m.public_key == wanted)
        .ok_or_else(|| SdkError::MintNotFound(wanted.to_string()))
}
