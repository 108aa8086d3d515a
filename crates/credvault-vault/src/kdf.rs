// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from device fingerprint material.

use std::num::NonZeroU32;

use credvault_core::CredvaultError;
use ring::pbkdf2;
use zeroize::Zeroizing;

use crate::crypto;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derive a 32-byte key from `material` and `salt`.
///
/// The key is wrapped in [`Zeroizing`] so it is wiped on drop.
pub fn derive_key(material: &[u8], salt: &[u8], iterations: NonZeroU32) -> Zeroizing<[u8; 32]> {
    let mut output = Zeroizing::new([0u8; 32]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        material,
        output.as_mut(),
    );
    output
}

/// Generate a random salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN], CredvaultError> {
    crypto::random_bytes().map_err(|_| CredvaultError::EncryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iters(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn matches_rfc7914_test_vector() {
        // PBKDF2-HMAC-SHA256("passwd", "salt", 1), first 32 bytes.
        let key = derive_key(b"passwd", b"salt", iters(1));
        assert_eq!(
            hex::encode(*key),
            "55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc"
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = derive_key(b"device", &[1u8; SALT_LEN], iters(10));
        let b = derive_key(b"device", &[1u8; SALT_LEN], iters(10));
        assert_eq!(*a, *b);
    }

    #[test]
    fn different_salt_changes_key() {
        let a = derive_key(b"device", &[1u8; SALT_LEN], iters(10));
        let b = derive_key(b"device", &[2u8; SALT_LEN], iters(10));
        assert_ne!(*a, *b);
    }

    #[test]
    fn different_material_changes_key() {
        let a = derive_key(b"device-a", &[1u8; SALT_LEN], iters(10));
        let b = derive_key(b"device-b", &[1u8; SALT_LEN], iters(10));
        assert_ne!(*a, *b);
    }

    #[test]
    fn salts_are_random() {
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
    }
}
