/// Household invitation codes
///
/// Invitation codes are handed out once, in plaintext, to the person issuing
/// the invite. Only their SHA-256 hash is stored.
///
/// # Code Format
///
/// `hh_` followed by 24 base62 characters (27 characters total).
///
/// # Example
///
/// ```
/// use householdhero_shared::auth::invite_code::{generate_invite_code, hash_invite_code, validate_invite_code_format};
///
/// let (code, hash) = generate_invite_code();
/// assert!(validate_invite_code_format(&code));
/// assert_eq!(hash_invite_code(&code), hash);
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

const CODE_RANDOM_LENGTH: usize = 24;

const CODE_PREFIX: &str = "hh_";

/// Total length of an invitation code
pub const INVITE_CODE_LENGTH: usize = CODE_PREFIX.len() + CODE_RANDOM_LENGTH;

/// Generates a new invitation code
///
/// # Returns
///
/// Tuple of (plaintext_code, sha256_hex_hash)
pub fn generate_invite_code() -> (String, String) {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    let random_part: String = (0..CODE_RANDOM_LENGTH)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();

    let code = format!("{}{}", CODE_PREFIX, random_part);
    let hash = hash_invite_code(&code);

    (code, hash)
}

/// Hashes an invitation code using SHA-256 (hex-encoded, 64 chars)
pub fn hash_invite_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks prefix, length and alphabet of an invitation code
pub fn validate_invite_code_format(code: &str) -> bool {
    code.len() == INVITE_CODE_LENGTH
        && code
            .strip_prefix(CODE_PREFIX)
            .map(|rest| rest.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_invite_code() {
        let (code, hash) = generate_invite_code();

        assert!(code.starts_with("hh_"));
        assert_eq!(code.len(), INVITE_CODE_LENGTH);
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn test_codes_are_unique() {
        let (a, _) = generate_invite_code();
        let (b, _) = generate_invite_code();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_invite_code("hh_abc"), hash_invite_code("hh_abc"));
        assert_ne!(hash_invite_code("hh_abc"), hash_invite_code("hh_abd"));
    }

    #[test]
    fn test_validate_format() {
        let (code, _) = generate_invite_code();
        assert!(validate_invite_code_format(&code));

        assert!(!validate_invite_code_format("hh_short"));
        assert!(!validate_invite_code_format(&code.replacen("hh_", "xx_", 1)));
        assert!(!validate_invite_code_format("hh_abcdefghijklmnopqrstuv!x"));
        assert!(!validate_invite_code_format(""));
    }
}
