// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations.
//!
//! Every call to [`seal`] generates a fresh random 96-bit nonce via the system
//! CSPRNG. Nonce reuse would be catastrophic for GCM security.

use credvault_core::CredvaultError;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};

/// Encrypt plaintext with AES-256-GCM using a random 96-bit nonce.
///
/// Returns `(ciphertext_with_tag, nonce_bytes)`.
pub fn seal(key: &[u8; 32], plaintext: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_LEN]), CredvaultError> {
    let unbound =
        UnboundKey::new(&AES_256_GCM, key).map_err(|_| CredvaultError::EncryptionFailed)?;
    let less_safe = LessSafeKey::new(unbound);

    let nonce_bytes: [u8; NONCE_LEN] =
        random_bytes().map_err(|_| CredvaultError::EncryptionFailed)?;
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    // Seal in place: the buffer is extended with the 16-byte tag.
    let mut in_out = plaintext.to_vec();
    less_safe
        .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| CredvaultError::EncryptionFailed)?;

    Ok((in_out, nonce_bytes))
}

/// Decrypt ciphertext with AES-256-GCM.
///
/// `ciphertext` must include the authentication tag appended by [`seal`].
/// A wrong key and tampered data are indistinguishable to the caller.
pub fn open(key: &[u8; 32], nonce_bytes: &[u8; NONCE_LEN], ciphertext: &[u8]) -> Result<Vec<u8>, CredvaultError> {
    let unbound =
        UnboundKey::new(&AES_256_GCM, key).map_err(|_| CredvaultError::DecryptionFailed)?;
    let less_safe = LessSafeKey::new(unbound);

    let nonce = Nonce::assume_unique_for_key(*nonce_bytes);

    let mut in_out = ciphertext.to_vec();
    let plaintext = less_safe
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| CredvaultError::DecryptionFailed)?;

    Ok(plaintext.to_vec())
}

/// Fill an `N`-byte array from the system CSPRNG.
pub fn random_bytes<const N: usize>() -> Result<[u8; N], CredvaultError> {
    let mut buf = [0u8; N];
    SystemRandom::new()
        .fill(&mut buf)
        .map_err(|_| CredvaultError::Internal("system random source unavailable".to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> [u8; 32] {
        random_bytes().unwrap()
    }

    #[test]
    fn seal_open_roundtrip() {
        let key = key();
        let (ciphertext, nonce) = seal(&key, b"gsk_secret_value").unwrap();
        assert_eq!(open(&key, &nonce, &ciphertext).unwrap(), b"gsk_secret_value");
    }

    #[test]
    fn seal_uses_fresh_nonce_each_call() {
        let key = key();
        let (ct1, nonce1) = seal(&key, b"same input twice").unwrap();
        let (ct2, nonce2) = seal(&key, b"same input twice").unwrap();
        assert_ne!(nonce1, nonce2);
        assert_ne!(ct1, ct2);
    }

    #[test]
    fn open_with_wrong_key_fails() {
        let (ciphertext, nonce) = seal(&key(), b"secret").unwrap();
        let err = open(&key(), &nonce, &ciphertext).unwrap_err();
        assert!(matches!(err, CredvaultError::DecryptionFailed));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = key();
        let (mut ciphertext, nonce) = seal(&key, b"do not tamper").unwrap();
        ciphertext[0] ^= 0x01;
        assert!(open(&key, &nonce, &ciphertext).is_err());
    }

    #[test]
    fn ciphertext_carries_16_byte_tag() {
        let (ciphertext, _) = seal(&key(), b"hello").unwrap();
        assert_eq!(ciphertext.len(), 5 + 16);
    }
}
