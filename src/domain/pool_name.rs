//! Type-safe pool name.
//!
//! [`PoolName`] is the unique, immutable key of a pool. It wraps a
//! validated `String` so that arbitrary text cannot be confused with a
//! registry key.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::LedgerError;

/// Maximum pool name length, in characters.
pub const MAX_POOL_NAME_LEN: usize = 100;

/// Unique name of a pool.
///
/// Used as the dictionary key in [`super::PoolRegistry`], event
/// discriminator, and WebSocket subscription target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PoolName(String);

impl PoolName {
    /// Validates and wraps a pool name.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidPoolName`] if the name is empty, longer
    /// than [`MAX_POOL_NAME_LEN`] characters, or has surrounding whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self, LedgerError> {
        let name = name.into();
        if name.is_empty()
            || name.chars().count() > MAX_POOL_NAME_LEN
            || name.trim().len() != name.len()
        {
            return Err(LedgerError::InvalidPoolName(name));
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PoolName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for PoolName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}
