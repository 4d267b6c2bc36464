//! Deterministic content digests using SHA256 hashing.
//!
//! Document ids in the store are random UUIDs assigned on insert; the
//! digest here is a content fingerprint used to flag re-imports of the
//! same workout text.

use sha2::{Digest, Sha256};

/// Generate a short content digest from input fields.
/// Uses SHA256 and takes the first 16 hex characters for brevity.
pub fn digest_id(fields: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            hasher.update(b"|");
        }
        hasher.update(field.as_bytes());
    }
    let result = hasher.finalize();
    let hash = hex::encode(result);
    hash[..16].to_string()
}
