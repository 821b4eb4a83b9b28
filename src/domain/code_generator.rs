//! Random short code generation.
//!
//! Codes are drawn symbol by symbol, uniformly and independently, from the
//! alphabet using a cryptographically secure generator. Predictable codes
//! would let anyone enumerate existing links.

use rand::{CryptoRng, Rng};

/// `A-Z`, `a-z` and `0-9`.
pub const DEFAULT_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Default number of symbols per code.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Longest code the datastore column accepts.
pub const MAX_CODE_LENGTH: usize = 10;

/// Errors raised when building a generator from a custom alphabet.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AlphabetError {
    #[error("Alphabet must not be empty")]
    Empty,

    #[error("Alphabet must contain only ASCII alphanumerics, found {0:?}")]
    InvalidSymbol(char),

    #[error("Alphabet contains duplicate symbol {0:?}")]
    DuplicateSymbol(char),
}

/// Draws candidate short codes from a fixed alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeGenerator {
    alphabet: Vec<char>,
}

impl CodeGenerator {
    /// Generator over the 62-symbol [`DEFAULT_ALPHABET`].
    pub fn new() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.chars().collect(),
        }
    }

    /// Generator over a custom alphabet.
    ///
    /// Symbols must be unique ASCII alphanumerics so every code stays
    /// URL-safe and each symbol keeps equal weight.
    ///
    /// # Errors
    ///
    /// Returns [`AlphabetError`] if the alphabet is empty or malformed.
    pub fn with_alphabet(alphabet: &str) -> Result<Self, AlphabetError> {
        let mut symbols: Vec<char> = Vec::with_capacity(alphabet.len());

        for c in alphabet.chars() {
            if !c.is_ascii_alphanumeric() {
                return Err(AlphabetError::InvalidSymbol(c));
            }
            if symbols.contains(&c) {
                return Err(AlphabetError::DuplicateSymbol(c));
            }
            symbols.push(c);
        }

        if symbols.is_empty() {
            return Err(AlphabetError::Empty);
        }

        Ok(Self { alphabet: symbols })
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Returns true if every symbol of `code` belongs to the alphabet.
    pub fn is_in_alphabet(&self, code: &str) -> bool {
        code.chars().all(|c| self.alphabet.contains(&c))
    }

    /// Draws a code of `length` symbols from the thread-local CSPRNG.
    pub fn generate(&self, length: usize) -> String {
        self.generate_with(&mut rand::rng(), length)
    }

    /// Draws a code of `length` symbols from the given CSPRNG.
    pub fn generate_with<R: Rng + CryptoRng>(&self, rng: &mut R, length: usize) -> String {
        (0..length)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())])
            .collect()
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}
