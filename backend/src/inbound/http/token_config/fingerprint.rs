//! Token secret fingerprinting for operational visibility.
//!
//! Operators compare fingerprints across replicas to confirm they share a
//! signing secret without the secret itself reaching the logs.

use sha2::{Digest, Sha256};

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Truncated SHA-256 of the secret as 16 lowercase hex characters.
///
/// # Examples
///
/// ```rust
/// use rentease::inbound::http::token_config::fingerprint::secret_fingerprint;
///
/// let fp = secret_fingerprint(b"0123456789abcdef0123456789abcdef");
///
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn secret_fingerprint(secret: &[u8]) -> String {
    let digest = Sha256::digest(secret);
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fingerprint_is_deterministic() {
        let secret = [b'a'; 32];
        assert_eq!(secret_fingerprint(&secret), secret_fingerprint(&secret));
    }

    #[rstest]
    fn fingerprint_is_short_lowercase_hex() {
        let fp = secret_fingerprint(&[b'z'; 48]);

        assert_eq!(fp.len(), FINGERPRINT_BYTES * 2);
        assert_eq!(fp, fp.to_lowercase());
    }

    #[rstest]
    fn different_secrets_produce_different_fingerprints() {
        assert_ne!(
            secret_fingerprint(&[b'a'; 32]),
            secret_fingerprint(&[b'b'; 32])
        );
    }

    #[rstest]
    fn known_digest_prefix() {
        // SHA-256("abc") = ba7816bf8f01cfea...
        assert_eq!(secret_fingerprint(b"abc"), "ba7816bf8f01cfea");
    }
}
