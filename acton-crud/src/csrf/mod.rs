//! CSRF tokens for edit forms
//!
//! Tokens are stateless: `hex(sha256(secret | action | bucket))`, where the
//! bucket is the current time divided by half the token lifetime. A token is
//! accepted for its own bucket and the one after it, so it stays valid for
//! between half and the full lifetime.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::config::SecuritySettings;

/// Form field carrying the CSRF token
pub const CSRF_FORM_FIELD: &str = "_csrf_token";

/// Issues and verifies CSRF tokens
#[derive(Clone)]
pub struct CsrfTokens {
    secret: Arc<[u8]>,
    bucket_secs: i64,
    enabled: bool,
}

impl std::fmt::Debug for CsrfTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsrfTokens")
            .field("secret", &"[REDACTED]")
            .field("bucket_secs", &self.bucket_secs)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Default for CsrfTokens {
    fn default() -> Self {
        Self::random(Duration::from_secs(86400))
    }
}

impl CsrfTokens {
    /// Create a token issuer with a fixed secret
    #[must_use]
    pub fn new(secret: impl AsRef<[u8]>, lifetime: Duration) -> Self {
        let half = i64::try_from(lifetime.as_secs() / 2).unwrap_or(i64::MAX);
        Self {
            secret: Arc::from(secret.as_ref()),
            bucket_secs: half.max(1),
            enabled: true,
        }
    }

    /// Create a token issuer with a per-process random secret
    #[must_use]
    pub fn random(lifetime: Duration) -> Self {
        let secret: [u8; 32] = rand::thread_rng().gen();
        Self::new(secret, lifetime)
    }

    /// Create an issuer whose tokens are never checked
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(b"", Duration::from_secs(2))
        }
    }

    /// Build from security settings
    #[must_use]
    pub fn from_settings(settings: &SecuritySettings) -> Self {
        if !settings.csrf_enabled {
            return Self::disabled();
        }
        let lifetime = Duration::from_secs(settings.csrf_lifetime_secs);
        match settings.csrf_secret.as_deref() {
            Some(secret) if !secret.is_empty() => Self::new(secret, lifetime),
            _ => Self::random(lifetime),
        }
    }

    /// Whether submitted tokens are checked
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Issue a token for `action`
    #[must_use]
    pub fn issue(&self, action: &str) -> String {
        self.issue_at(action, chrono::Utc::now().timestamp())
    }

    /// Verify a submitted token for `action`
    #[must_use]
    pub fn verify(&self, token: &str, action: &str) -> bool {
        self.verify_at(token, action, chrono::Utc::now().timestamp())
    }

    fn issue_at(&self, action: &str, now: i64) -> String {
        self.digest(action, now.div_euclid(self.bucket_secs))
    }

    fn verify_at(&self, token: &str, action: &str, now: i64) -> bool {
        if !self.enabled {
            return true;
        }
        let bucket = now.div_euclid(self.bucket_secs);
        [bucket, bucket - 1].into_iter().any(|candidate| {
            let expected = self.digest(action, candidate);
            bool::from(expected.as_bytes().ct_eq(token.as_bytes()))
        })
    }

    fn digest(&self, action: &str, bucket: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(b"|");
        hasher.update(action.as_bytes());
        hasher.update(b"|");
        hasher.update(bucket.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}
