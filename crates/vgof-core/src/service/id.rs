use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Globally unique key of a service in the [`ServiceRegistry`](super::ServiceRegistry).
///
/// Identifiers are plain 128-bit values. They are never derived from the
/// service itself, so producers and consumers agree on them by sharing a
/// constant, usually published from a small API crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(Uuid);

impl ServiceId {
    /// Identifier from a `u128`, usable in `const` items.
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// Identifier from raw big-endian bytes, usable in `const` items.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Generate a fresh random (v4) identifier.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse the canonical hyphenated form, e.g. `3a805e12-5fe1-4c92-8b0a-861ade558e66`.
    pub fn parse_str(input: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(input).map(Self)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn as_u128(&self) -> u128 {
        self.0.as_u128()
    }
}

impl From<Uuid> for ServiceId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for ServiceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}
