use bcrypt::{hash, verify, DEFAULT_COST};

/// Salted adaptive hash with a fixed work factor. Plaintext never leaves this
/// function's caller.
pub fn hash_password(plaintext: &str) -> Result<String, bcrypt::BcryptError> {
    hash(plaintext, DEFAULT_COST)
}

/// Constant-time comparison against the stored hash. `Ok(false)` is a wrong
/// password; `Err` means the stored hash itself is unusable.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(plaintext, stored_hash)
}
