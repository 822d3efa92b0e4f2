use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::Rng;
use std::fmt;

/// Suffix appended to every resource name, namespacing lock records away
/// from unrelated keys in the shared store.
pub const LOCK_SUFFIX: &str = ":lock";

/// Derive the store key under which a resource's lock record lives.
///
/// Acquisition and release both go through this function so the two always
/// agree on key identity.
pub fn lock_key(name: &str) -> String {
    format!("{}{}", name, LOCK_SUFFIX)
}

/// Proof of ownership for a single acquisition: 128 random bits,
/// base64-encoded for storage.
///
/// A token is minted fresh on every attempt and never reused. Collision
/// resistance is all that is required of it; it is not a secret.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    /// Mint a new token.
    pub fn mint() -> Self {
        let bytes: [u8; 16] = rand::thread_rng().gen();
        Token(STANDARD.encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
