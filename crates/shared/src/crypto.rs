//! Link-code generation and keyed digests.
//!
//! Link codes bind an accepted applicant to a freshly minted member record.
//! Only the keyed digest of a code is ever persisted; the plaintext is
//! disclosed exactly once to the accepting administrator.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Generates a link code of 8 hex characters formatted `XXXX-XXXX`,
/// drawn from 4 cryptographically random bytes.
pub fn generate_link_code() -> String {
    let mut bytes = [0u8; 4];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    let hexed = hex::encode_upper(bytes);
    format!("{}-{}", &hexed[..4], &hexed[4..])
}

/// Computes the keyed digest of a link code as lowercase hex.
///
/// HMAC-SHA256 with a server-held secret rather than a salted password
/// hash: link time needs deterministic re-verification of the presented
/// code against the stored digest.
pub fn link_code_digest(secret: &str, code: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(code.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Computes the SHA-256 digest of the input as lowercase hex.
///
/// Used for admin API key comparison so plaintext keys never sit in
/// request-scoped state longer than necessary.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
