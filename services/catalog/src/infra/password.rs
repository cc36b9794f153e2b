use anyhow::anyhow;
use argon2::{
    Argon2,
    password_hash::{PasswordHasher as _, SaltString, rand_core::OsRng},
};

use crate::domain::repository::PasswordHasher;
use crate::error::CatalogError;

/// Argon2id with the crate's default parameters; output is a PHC string.
#[derive(Clone, Copy, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, CatalogError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| anyhow!("hash password: {e}").into())
    }
}
