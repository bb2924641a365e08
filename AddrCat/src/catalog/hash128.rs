//! 128-bit content hash

use crate::error::{Error, Result};
use crate::io::ByteCursor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit hash held as 32 lowercase hex digits.
///
/// On disk the hash is four little-endian `u32` words. Each word renders as
/// eight hex digits, most significant nibble first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hash128(String);

impl Hash128 {
    /// Wrap a hex string as-is. The value is only validated when it is
    /// written to the binary format.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The all-zero hash.
    #[must_use]
    pub fn zero() -> Self {
        Self("0".repeat(32))
    }

    #[must_use]
    pub fn from_words(words: [u32; 4]) -> Self {
        Self(format!(
            "{:08x}{:08x}{:08x}{:08x}",
            words[0], words[1], words[2], words[3]
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the all-zero hash.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.len() == 32 && self.0.bytes().all(|b| b == b'0')
    }

    /// Parse the hex digits into four words.
    ///
    /// # Errors
    /// Returns [`Error::InvalidHash128`] unless the value is 32 hex digits.
    pub fn to_words(&self) -> Result<[u32; 4]> {
        let invalid = || Error::InvalidHash128(self.0.clone());
        if self.0.len() != 32 || !self.0.is_ascii() {
            return Err(invalid());
        }

        let mut words = [0u32; 4];
        for (i, word) in words.iter_mut().enumerate() {
            let chunk = &self.0[i * 8..(i + 1) * 8];
            *word = u32::from_str_radix(chunk, 16).map_err(|_| invalid())?;
        }
        Ok(words)
    }

    /// Read the 16-byte binary form at the cursor position.
    pub fn read_binary(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let words = [
            cursor.read_u32()?,
            cursor.read_u32()?,
            cursor.read_u32()?,
            cursor.read_u32()?,
        ];
        Ok(Self::from_words(words))
    }

    /// The 16-byte binary form.
    pub fn to_binary(&self) -> Result<[u8; 16]> {
        let words = self.to_words()?;
        let mut bytes = [0u8; 16];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        Ok(bytes)
    }
}

impl Default for Hash128 {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Hash128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Hash128 {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_word_order() {
        let bytes = [
            0x78, 0x56, 0x34, 0x12, 0, 0, 0, 0, 0xef, 0xbe, 0xad, 0xde, 0xff, 0, 0, 0,
        ];
        let mut cursor = ByteCursor::new(&bytes);
        let hash = Hash128::read_binary(&mut cursor).unwrap();
        assert_eq!(hash.as_str(), "1234567800000000deadbeef000000ff");
        assert_eq!(hash.to_binary().unwrap(), bytes);
    }

    #[test]
    fn test_zero() {
        assert!(Hash128::zero().is_zero());
        assert!(Hash128::default().is_zero());
        assert!(!Hash128::new("deadbeefdeadbeefdeadbeefdeadbeef").is_zero());
    }

    #[test]
    fn test_invalid_hex() {
        assert!(matches!(
            Hash128::new("xyz").to_binary(),
            Err(Error::InvalidHash128(_))
        ));
        assert!(matches!(
            Hash128::new("g".repeat(32)).to_words(),
            Err(Error::InvalidHash128(_))
        ));
    }
}
