//! Cache key derivation for API requests
//!
//! Same method + same parameter set must always map to the same key, and the
//! digest only has to separate parameter variants - collision resistance is
//! a nice-to-have, not a security property.

use sha2::{Digest, Sha256};

/// Namespace prefix shared by every derived key.
pub const REQUEST_NAMESPACE: &str = "eventbrite-request-";

/// Length of the parameter digest suffix.
const DIGEST_LEN: usize = 5;

/// Derive the cache key for `method` with the given query parameters.
///
/// Empty params yield the bare namespaced method name; non-empty params
/// append a short hex digest over the parameter values. Pairs are sorted by
/// key first so the result is stable under reordering.
pub fn request_key(method: &str, params: &[(String, String)]) -> String {
    let mut key = format!("{REQUEST_NAMESPACE}{method}");

    if !params.is_empty() {
        let mut sorted = params.to_vec();
        sorted.sort();
        let joined =
            sorted.iter().map(|(_, value)| value.as_str()).collect::<Vec<_>>().join("-");

        let digest = hex::encode(Sha256::digest(joined.as_bytes()));
        key.push('-');
        key.push_str(&digest[..DIGEST_LEN]);
    }

    key
}
