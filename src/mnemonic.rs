//! BIP39 phrase helpers: generation, checksum validation, seed.

use crate::error::{Result, WalletError};
use bip39::{Language, Mnemonic};
use rand::RngCore;
use zeroize::Zeroizing;

/// Entropy for generated phrases: 256 bits, 24 words.
pub const DEFAULT_WORD_COUNT: usize = 24;

/// A fresh 24 word phrase.
pub fn generate_mnemonic_phrase() -> Result<Zeroizing<String>> {
    generate_mnemonic(DEFAULT_WORD_COUNT)
}

pub fn generate_mnemonic(word_count: usize) -> Result<Zeroizing<String>> {
    let entropy_len = match word_count {
        12 => 16,
        15 => 20,
        18 => 24,
        21 => 28,
        24 => 32,
        _ => return Err(WalletError::InvalidMnemonic(format!("unsupported word count {word_count}"))),
    };

    let mut entropy = Zeroizing::new(vec![0u8; entropy_len]);
    rand::thread_rng().fill_bytes(&mut entropy);

    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|e| WalletError::InvalidMnemonic(format!("generation failed: {e}")))?;
    Ok(Zeroizing::new(mnemonic.to_string()))
}

/// True for exactly the phrases the English word list checksum accepts.
pub fn validate_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse_in(Language::English, phrase).is_ok()
}

/// BIP39 seed with the empty passphrase.
pub fn seed_from_phrase(phrase: &str) -> Result<Zeroizing<[u8; 64]>> {
    let mnemonic = Mnemonic::parse_in(Language::English, phrase)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
    Ok(Zeroizing::new(mnemonic.to_seed("")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_generated_phrase_is_24_words_and_valid() {
        let phrase = generate_mnemonic_phrase().unwrap();
        assert_eq!(phrase.split_whitespace().count(), 24);
        assert!(validate_mnemonic(&phrase));
    }

    #[test]
    fn test_generated_phrases_differ() {
        let a = generate_mnemonic_phrase().unwrap();
        let b = generate_mnemonic_phrase().unwrap();
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_validate() {
        assert!(validate_mnemonic(TEST_MNEMONIC));
        // Bad checksum: last word changed
        assert!(!validate_mnemonic(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon"
        ));
        assert!(!validate_mnemonic("not a real phrase"));
        assert!(!validate_mnemonic(""));
    }

    #[test]
    fn test_unsupported_word_count() {
        assert!(matches!(generate_mnemonic(13), Err(WalletError::InvalidMnemonic(_))));
    }

    #[test]
    fn test_seed_vector() {
        // BIP39 reference vector, empty passphrase
        let seed = seed_from_phrase(TEST_MNEMONIC).unwrap();
        assert_eq!(
            hex::encode(&seed[..8]),
            "5eb00bbddcf06908"
        );
    }
}
