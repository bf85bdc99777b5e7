//! Human-enterable room join codes.
//!
//! [`RoomCode`] is a 6-character string drawn from the uppercase
//! alphanumeric alphabet. Codes are the public join key for a room and
//! must be unique among live rooms; the store rejects duplicates and the
//! service regenerates on collision.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Alphabet used for room codes: uppercase letters and digits.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Number of characters in a room code.
pub const CODE_LENGTH: usize = 6;

/// A 6-character room join code.
///
/// The code space (36^6 ≈ 2.2 billion) vastly exceeds any realistic
/// number of concurrent rooms, so collisions are rare and handled by
/// bounded regeneration in the service layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Generates a fresh random code.
    ///
    /// Uniqueness is not guaranteed here; callers must check against the
    /// store and regenerate on collision.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let code: String = (0..CODE_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..CODE_ALPHABET.len());
                char::from(CODE_ALPHABET.get(idx).copied().unwrap_or(b'A'))
            })
            .collect();
        Self(code)
    }

    /// Wraps an existing code string without validation.
    ///
    /// Intended for lookups where the string comes from a client and is
    /// matched against stored codes verbatim.
    #[must_use]
    pub fn from_string(code: String) -> Self {
        Self(code)
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
