use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use sha2::{Digest, Sha512};
use std::sync::LazyLock;

/// Use insecure (fast) password hashing for dev/test environments
static INSECURE_HASHING: LazyLock<bool> =
    LazyLock::new(|| cfg!(test) || std::env::var("INSECURE_PASSWORD_HASHING").is_ok());

fn get_argon2() -> Argon2<'static> {
    if *INSECURE_HASHING {
        // Minimal params for fast dev/test - NOT SECURE FOR PRODUCTION
        match Params::new(1024, 1, 1, None) {
            Ok(params) => Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            Err(_) => Argon2::default(),
        }
    } else {
        Argon2::default()
    }
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = get_argon2().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    get_argon2()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Hash checked when a login names no account, so both misses cost one verify.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password(DUMMY_PASSWORD).ok());

const DUMMY_PASSWORD: &str = "genie-no-such-account";

/// Spend one argon2 verify without a user to check against.
pub fn verify_dummy_password(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

/// Stretch the configured secret to the 64 bytes cookie signing needs.
pub fn derive_key_material(secret: &str) -> [u8; 64] {
    let mut hasher = Sha512::new();
    hasher.update(secret.as_bytes());
    let mut material = [0u8; 64];
    material.copy_from_slice(&hasher.finalize());
    material
}
