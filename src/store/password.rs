//! Password hashing with bcrypt.

use super::error::StoreError;

/// bcrypt cost factor for new hashes.
pub const PASSWORD_COST: u32 = 10;

/// Longest password bcrypt can hash without truncation, in bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hash `password` with a fresh salt. The salt is embedded in the result.
///
/// Passwords longer than [`MAX_PASSWORD_BYTES`] are an error, never truncated.
pub fn hash_password(password: &str) -> Result<String, StoreError> {
    Ok(bcrypt::non_truncating_hash(password, PASSWORD_COST)?)
}

/// Check `password` against a stored bcrypt hash.
///
/// A malformed stored hash or an over-long password counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::non_truncating_verify(password, hash).unwrap_or(false)
}
