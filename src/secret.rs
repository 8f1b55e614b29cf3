//! Encrypted Secret Store
//!
//! The mnemonic is held as AES-256-GCM ciphertext under a random key that
//! lives only in this process. Plaintext exists only inside a `Zeroizing`
//! buffer handed to the caller, which clears it on drop.

use crate::error::{Result, WalletError};
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use zeroize::Zeroizing;

const AAD_MNEMONIC: &[u8] = b"avahd-mnemonic";

pub struct EncryptedMnemonic {
    key: Zeroizing<[u8; 32]>,
    nonce: [u8; 12],
    ciphertext: Vec<u8>,
}

impl EncryptedMnemonic {
    pub fn seal(mnemonic: &str) -> Result<Self> {
        let mut key = Zeroizing::new([0u8; 32]);
        OsRng.fill_bytes(&mut key[..]);
        let mut nonce = [0u8; 12];
        OsRng.fill_bytes(&mut nonce);

        let cipher = Aes256Gcm::new_from_slice(&key[..])
            .map_err(|e| WalletError::Encryption(format!("cipher init: {e}")))?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), Payload { msg: mnemonic.as_bytes(), aad: AAD_MNEMONIC })
            .map_err(|_| WalletError::Encryption("encrypt failed".into()))?;

        Ok(Self { key, nonce, ciphertext })
    }

    /// Decrypt into a buffer that is wiped when dropped.
    pub fn reveal(&self) -> Result<Zeroizing<String>> {
        let cipher = Aes256Gcm::new_from_slice(&self.key[..])
            .map_err(|e| WalletError::Encryption(format!("cipher init: {e}")))?;
        let plaintext = Zeroizing::new(
            cipher
                .decrypt(
                    Nonce::from_slice(&self.nonce),
                    Payload { msg: &self.ciphertext, aad: AAD_MNEMONIC },
                )
                .map_err(|_| WalletError::Encryption("decrypt failed".into()))?,
        );
        let phrase = std::str::from_utf8(&plaintext)
            .map_err(|e| WalletError::Encryption(format!("mnemonic utf8: {e}")))?;
        Ok(Zeroizing::new(phrase.to_owned()))
    }

    /// Scoped access: the plaintext is cleared as soon as `f` returns.
    pub fn with_phrase<T>(&self, f: impl FnOnce(&str) -> T) -> Result<T> {
        let phrase = self.reveal()?;
        Ok(f(&phrase))
    }
}

impl fmt::Debug for EncryptedMnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedMnemonic")
            .field("ciphertext_len", &self.ciphertext.len())
            .finish_non_exhaustive()
    }
}
