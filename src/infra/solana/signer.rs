//! Local ed25519 signing identity.
//!
//! The raw secret lives in a `SecretString` and is only exposed inside the
//! scope of `sign_message`. Keys are never generated implicitly by the SDK;
//! callers import them or call `Keypair::generate` explicitly.

use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::{PublicKey, TransactionError, TransactionSigner};

/// Parse a base58-encoded private key (32-byte seed or 64-byte keypair).
fn signing_key_from_secret(secret: &SecretString) -> Result<SigningKey, TransactionError> {
    let key_bytes = bs58::decode(secret.expose_secret())
        .into_vec()
        .map_err(|e| TransactionError::Signing(e.to_string()))?;

    let key_array: [u8; 32] = if key_bytes.len() == 64 {
        // Solana keypair format: first 32 bytes are the secret key
        key_bytes[..32]
            .try_into()
            .map_err(|_| TransactionError::Signing("Invalid keypair format".to_string()))?
    } else if key_bytes.len() == 32 {
        key_bytes.try_into().map_err(|v: Vec<u8>| {
            TransactionError::Signing(format!("Key must be 32 bytes, got {}", v.len()))
        })?
    } else {
        return Err(TransactionError::Signing(format!(
            "Key must be 32 or 64 bytes, got {}",
            key_bytes.len()
        )));
    };

    Ok(SigningKey::from_bytes(&key_array))
}

/// Externally supplied owner identity.
pub struct Keypair {
    secret: SecretString,
    public_key: PublicKey,
}

impl Keypair {
    /// Import a Base58-encoded secret (32-byte seed or 64-byte keypair).
    pub fn from_base58(secret: SecretString) -> Result<Self, TransactionError> {
        let signing_key = signing_key_from_secret(&secret)?;
        let public_key = PublicKey::new(signing_key.verifying_key().to_bytes());
        Ok(Self { secret, public_key })
    }

    /// Import a raw 32-byte ed25519 seed.
    #[must_use]
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self::from_signing_key(&signing_key)
    }

    /// Create a fresh random identity.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_signing_key(&SigningKey::generate(&mut OsRng))
    }

    fn from_signing_key(signing_key: &SigningKey) -> Self {
        let secret = SecretString::from(bs58::encode(signing_key.to_bytes()).into_string());
        Self {
            secret,
            public_key: PublicKey::new(signing_key.verifying_key().to_bytes()),
        }
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

impl TransactionSigner for Keypair {
    fn public_key(&self) -> PublicKey {
        self.public_key
    }

    fn sign_message(&self, message: &[u8]) -> Result<[u8; 64], TransactionError> {
        let signing_key = signing_key_from_secret(&self.secret)?;
        Ok(signing_key.sign(message).to_bytes())
    }
}
