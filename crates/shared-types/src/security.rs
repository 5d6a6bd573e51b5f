//! # Security Primitives
//!
//! The request gate and the credential generator.
//!
//! ## Security Properties
//!
//! - **Constant-time key check**: the gate compares the presented key with
//!   `subtle` so response timing does not leak the shared secret.
//! - **Deterministic credentials**: a credential is HMAC-SHA256 of the account
//!   identity under the shared secret, hex encoded. Same inputs, same token.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

// =============================================================================
// ACCESS GATE
// =============================================================================

/// Shared-secret check performed before any core operation runs.
#[derive(Clone)]
pub struct AccessGate {
    access_key: Vec<u8>,
}

impl AccessGate {
    pub fn new(access_key: impl Into<Vec<u8>>) -> Self {
        Self {
            access_key: access_key.into(),
        }
    }

    /// Returns `true` only when a key is presented and it matches.
    ///
    /// An unconfigured (empty) access key authorizes nobody.
    pub fn authorize(&self, presented: Option<&str>) -> bool {
        let Some(presented) = presented else {
            return false;
        };
        if self.access_key.is_empty() {
            return false;
        }
        self.access_key.ct_eq(presented.as_bytes()).into()
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("access_key", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// CREDENTIAL GENERATION
// =============================================================================

/// Pure `generate(account_id, shared_secret) -> token` function.
pub trait CredentialGenerator: Send + Sync {
    fn generate(&self, account_id: &str) -> String;
}

/// HMAC-SHA256 credential generator keyed by the shared secret.
#[derive(Clone)]
pub struct HmacCredentialGenerator {
    secret: Vec<u8>,
}

impl HmacCredentialGenerator {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl CredentialGenerator for HmacCredentialGenerator {
    fn generate(&self, account_id: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size");
        mac.update(account_id.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl std::fmt::Debug for HmacCredentialGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacCredentialGenerator")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl<T: CredentialGenerator + ?Sized> CredentialGenerator for std::sync::Arc<T> {
    fn generate(&self, account_id: &str) -> String {
        (**self).generate(account_id)
    }
}
