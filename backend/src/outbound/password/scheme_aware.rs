//! Password verification that honours the scheme named by each stored hash.
//!
//! bcrypt (`$2a$`, `$2b$`, `$2x$`, `$2y$`) and PHC-format Argon2
//! (`$argon2id$`, `$argon2i$`, `$argon2d$`) are understood. Hash work is CPU
//! bound and runs on the blocking pool.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHashVerifier};

const BCRYPT_PREFIXES: [&str; 4] = ["$2a$", "$2b$", "$2x$", "$2y$"];
const ARGON2_PREFIX: &str = "$argon2";
const TIMING_DUMMY_PASSWORD: &str = "gateway-timing-dummy";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HashScheme {
    Bcrypt,
    Argon2,
}

impl HashScheme {
    fn detect(stored_hash: &str) -> Result<Self, PasswordHashError> {
        if BCRYPT_PREFIXES
            .iter()
            .any(|prefix| stored_hash.starts_with(prefix))
        {
            return Ok(Self::Bcrypt);
        }
        if stored_hash.starts_with(ARGON2_PREFIX) {
            return Ok(Self::Argon2);
        }
        match stored_hash
            .strip_prefix('$')
            .and_then(|rest| rest.split('$').next())
            .filter(|ident| !ident.is_empty())
        {
            Some(ident) => Err(PasswordHashError::unsupported_scheme(ident)),
            None => Err(PasswordHashError::malformed_hash(
                "hash does not start with a $scheme$ identifier",
            )),
        }
    }

    fn verify(self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError> {
        match self {
            Self::Bcrypt => bcrypt::verify(password, stored_hash)
                .map_err(|err| PasswordHashError::malformed_hash(err.to_string())),
            Self::Argon2 => {
                let parsed = PasswordHash::new(stored_hash)
                    .map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
                match Argon2::default().verify_password(password.as_bytes(), &parsed) {
                    Ok(()) => Ok(true),
                    Err(argon2::password_hash::Error::Password) => Ok(false),
                    Err(err) => Err(PasswordHashError::malformed_hash(err.to_string())),
                }
            }
        }
    }
}

/// `PasswordHashVerifier` backed by the `bcrypt` and `argon2` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemeAwarePasswordVerifier;

#[async_trait]
impl PasswordHashVerifier for SchemeAwarePasswordVerifier {
    async fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError> {
        let scheme = HashScheme::detect(stored_hash)?;
        let owned_password = Zeroizing::new(password.to_owned());
        let owned_hash = stored_hash.to_owned();
        tokio::task::spawn_blocking(move || scheme.verify(&owned_password, &owned_hash))
            .await
            .map_err(|err| PasswordHashError::worker(err.to_string()))?
    }
}

/// Produce a bcrypt hash at the default cost for timing equalisation.
///
/// # Errors
///
/// Returns an error when bcrypt cannot generate a salt.
pub fn timing_dummy_hash() -> Result<String, PasswordHashError> {
    bcrypt::hash(TIMING_DUMMY_PASSWORD, bcrypt::DEFAULT_COST)
        .map_err(|err| PasswordHashError::worker(err.to_string()))
}
