use sha2::{Digest, Sha256};
use std::fmt;

/// Digest offsets the device samples for its three digits.
const DIGIT_OFFSETS: [usize; 3] = [0, 15, 31];

/// Three digits in `1..=5` the operator types on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeCode(pub [u8; 3]);

impl fmt::Display for ChallengeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{a} {b} {c}")
    }
}

pub fn digit_for_byte(byte: u8) -> u8 {
    if byte < 6 { 1 } else { byte % 5 + 1 }
}

/// Derive the confirmation digits for a payload from its SHA-256 digest.
pub fn derive_challenge(payload: &[u8]) -> ChallengeCode {
    let digest: [u8; 32] = Sha256::digest(payload).into();
    ChallengeCode(DIGIT_OFFSETS.map(|i| digit_for_byte(digest[i])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digit_vectors() {
        assert_eq!(digit_for_byte(3), 1);
        assert_eq!(digit_for_byte(10), 1);
        assert_eq!(digit_for_byte(7), 3);
        assert_eq!(digit_for_byte(5), 1);
        assert_eq!(digit_for_byte(6), 2);
        assert_eq!(digit_for_byte(255), 1);
    }

    #[test]
    fn test_every_byte_maps_into_range() {
        for b in 0..=255u8 {
            assert!((1..=5).contains(&digit_for_byte(b)), "byte {b}");
        }
    }

    #[test]
    fn test_derive_is_deterministic() {
        let payload = [0x42u8; 32];
        assert_eq!(derive_challenge(&payload), derive_challenge(&payload));
    }

    #[test]
    fn test_derive_samples_digest_bytes() {
        let digest: [u8; 32] = Sha256::digest(b"abc").into();
        let code = derive_challenge(b"abc");
        assert_eq!(code.0, [digit_for_byte(digest[0]), digit_for_byte(digest[15]), digit_for_byte(digest[31])]);
        // digest[0] of sha256("abc") is 0xba
        assert_eq!(code.0[0], 0xba % 5 + 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(ChallengeCode([1, 5, 3]).to_string(), "1 5 3");
    }
}
