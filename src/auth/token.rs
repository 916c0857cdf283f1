// src/auth/token.rs
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// 32 bytes encode to a 43 character URL-safe string.
pub const TOKEN_BYTES: usize = 32;

/// Fresh random token for magic links and sessions.
pub fn new_token() -> String {
    new_token_from(&mut OsRng)
}

pub fn new_token_from<R: RngCore>(rng: &mut R) -> String {
    let mut buf = [0u8; TOKEN_BYTES];
    rng.fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

/// SHA-256 of the raw token. Only this is ever stored.
pub fn hash_token(token: &str) -> [u8; 32] {
    let digest = Sha256::digest(token.as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Compares two secrets through their SHA-256 digests, touching every byte,
/// so timing reveals neither length nor the first differing position.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    let a = hash_token(provided);
    let b = hash_token(expected);
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn token_is_url_safe() {
        let mut rng = StdRng::seed_from_u64(7);
        let t = new_token_from(&mut rng);
        assert_eq!(t.len(), 43);
        assert!(t
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn tokens_differ() {
        assert_ne!(new_token(), new_token());
    }

    #[test]
    fn hash_is_stable_per_input() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
    }

    #[test]
    fn secrets_match_only_on_equal_input() {
        assert!(secrets_match("whsec_123", "whsec_123"));
        assert!(!secrets_match("whsec_124", "whsec_123"));
        assert!(!secrets_match("whsec_12", "whsec_123"));
        assert!(!secrets_match("", "whsec_123"));
    }
}
