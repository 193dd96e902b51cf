use std::fmt;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::accounts::error::AccountError;
use crate::config::PasswordConfig;

/// Argon2 PHC string. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub(crate) fn from_stored(phc: String) -> Self {
        Self(phc)
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// Salted Argon2id hashing and constant-time verification.
#[derive(Clone)]
pub struct PasswordCodec {
    argon2: Argon2<'static>,
    decoy: PasswordDigest,
}

impl PasswordCodec {
    pub fn new(cfg: &PasswordConfig) -> Result<Self, AccountError> {
        let params = Params::new(cfg.m_cost, cfg.t_cost, cfg.p_cost, None).map_err(|e| {
            error!(error = %e, "invalid argon2 params");
            AccountError::Codec(e.to_string())
        })?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let decoy = hash_with(&argon2, "decoy-password-for-unknown-users")?;
        Ok(Self { argon2, decoy })
    }

    pub fn hash(&self, plain: &str) -> Result<PasswordDigest, AccountError> {
        hash_with(&self.argon2, plain)
    }

    /// `Ok(false)` for a wrong password; `Err` only if `digest` is not a PHC string.
    pub fn verify(&self, plain: &str, digest: &PasswordDigest) -> Result<bool, AccountError> {
        let parsed = PasswordHash::new(digest.as_str()).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            AccountError::Codec(e.to_string())
        })?;
        // Parameters come from the digest itself, so hashes made under older
        // cost settings still verify.
        Ok(self
            .argon2
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }

    /// Burns the same work as a real verify. Used when the lookup missed.
    pub fn verify_decoy(&self, plain: &str) {
        let _ = self.verify(plain, &self.decoy);
    }
}

fn hash_with(argon2: &Argon2<'_>, plain: &str) -> Result<PasswordDigest, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            AccountError::Codec(e.to_string())
        })?
        .to_string();
    Ok(PasswordDigest(hash))
}

#[cfg(test)]
pub(crate) fn test_codec() -> PasswordCodec {
    PasswordCodec::new(&PasswordConfig {
        m_cost: 256,
        t_cost: 1,
        p_cost: 1,
    })
    .expect("cheap params are valid")
}
