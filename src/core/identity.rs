//! Anonymous caller identities
//!
//! A caller's network address is stretched through PBKDF2-HMAC-SHA256 with a
//! fixed salt and iteration count, then Base64 encoded. The resulting token is
//! stable per address and cannot be turned back into the address.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::Hmac;
use sha2::Sha256;
use std::fmt;
use std::sync::Arc;

/// Default salt, matching existing deployments so tokens stay stable
pub const DEFAULT_SALT: &str = "c31dd9c7d949d2ee76e2583a86e4aa469ed7fed17f2e32d3787d43d2f5981c90";

/// PBKDF2 rounds
pub const DEFAULT_ITERATIONS: u32 = 2048;

/// Derived key length in bytes (44 Base64 characters)
pub const DEFAULT_KEY_LENGTH: usize = 32;

/// Parameters for identity derivation
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityParams {
    pub salt: Vec<u8>,
    pub iterations: u32,
    pub key_length: usize,
}

impl Default for IdentityParams {
    fn default() -> Self {
        Self {
            salt: DEFAULT_SALT.as_bytes().to_vec(),
            iterations: DEFAULT_ITERATIONS,
            key_length: DEFAULT_KEY_LENGTH,
        }
    }
}

// Salt stays out of logs.
impl fmt::Debug for IdentityParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityParams")
            .field("iterations", &self.iterations)
            .field("key_length", &self.key_length)
            .finish_non_exhaustive()
    }
}

/// Pseudonymous key derived from a network address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityToken(String);

impl IdentityToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deterministic address hasher
///
/// Cheap to clone; the parameters are shared.
#[derive(Debug, Clone)]
pub struct IdentityHasher {
    params: Arc<IdentityParams>,
}

impl IdentityHasher {
    /// Build a hasher from explicit parameters
    ///
    /// # Errors
    /// Rejects a zero iteration count, zero key length or empty salt.
    pub fn new(params: IdentityParams) -> Result<Self, IdentityError> {
        if params.iterations == 0 {
            return Err(IdentityError::InvalidParams("iterations must be > 0"));
        }
        if params.key_length == 0 {
            return Err(IdentityError::InvalidParams("key_length must be > 0"));
        }
        if params.salt.is_empty() {
            return Err(IdentityError::InvalidParams("salt must not be empty"));
        }
        Ok(Self {
            params: Arc::new(params),
        })
    }

    pub fn params(&self) -> &IdentityParams {
        &self.params
    }

    /// Derive the identity token for a raw address
    pub fn derive(&self, raw_address: &str) -> Result<IdentityToken, IdentityError> {
        let mut key = vec![0u8; self.params.key_length];
        pbkdf2::pbkdf2::<Hmac<Sha256>>(
            raw_address.as_bytes(),
            &self.params.salt,
            self.params.iterations,
            &mut key,
        )
        .map_err(|e| IdentityError::Derivation(e.to_string()))?;

        Ok(IdentityToken(STANDARD.encode(&key)))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Invalid identity parameters: {0}")]
    InvalidParams(&'static str),

    #[error("Key derivation failed: {0}")]
    Derivation(String),
}
