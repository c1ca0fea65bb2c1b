// Copyright 2024 The mintvcs Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Object identity: the 40-character lowercase hex SHA-1 that names a blob,
//! tree, or commit.
//!
//! Unlike a system that gives blobs, trees, and commits distinct identifier
//! types, every object kind here shares one identity space (a tree entry
//! names its child by the same 40-hex string regardless of whether the child
//! is a blob or a tree), so a single [`ObjectId`] type suffices.

use std::fmt;

use crate::errors::MintError;
use crate::hex_util;

/// The length in bytes of the SHA-1 digest underlying every [`ObjectId`].
pub const DIGEST_LEN: usize = 20;

/// The length in hex characters of an [`ObjectId`]'s string form.
pub const HEX_LEN: usize = DIGEST_LEN * 2;

/// A content identity: the lowercase hex rendering of a 20-byte SHA-1 digest.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    /// Builds an identity directly from a raw 20-byte digest.
    pub fn from_digest(digest: &[u8; DIGEST_LEN]) -> Self {
        Self(hex::encode(digest))
    }

    /// Parses a 40-character lowercase hex string into an identity.
    ///
    /// Returns [`MintError::Format`] if `hex` isn't exactly 40 lowercase hex
    /// characters.
    pub fn from_hex(hex: impl AsRef<str>) -> Result<Self, MintError> {
        let hex = hex.as_ref();
        if !hex_util::is_lower_hex_of_len(hex, HEX_LEN) {
            return Err(MintError::Format(format!(
                "expected a {HEX_LEN}-character lowercase hex object id, got {hex:?}"
            )));
        }
        Ok(Self(hex.to_owned()))
    }

    /// Returns the hex string rendering of this identity.
    pub fn hex(&self) -> &str {
        &self.0
    }

    /// Splits the hex rendering into the two path components used by the
    /// object store's fan-out directory layout: the first two characters and
    /// the remaining 38.
    pub fn fan_out(&self) -> (&str, &str) {
        self.0.split_at(2)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectId").field(&self.0).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_digest_then_hex_round_trips() {
        let digest = [0u8; DIGEST_LEN];
        let id = ObjectId::from_digest(&digest);
        assert_eq!(id.hex(), "0000000000000000000000000000000000000000");
        assert_eq!(ObjectId::from_hex(id.hex()).unwrap(), id);
    }

    #[test]
    fn rejects_wrong_length_or_case() {
        assert!(ObjectId::from_hex("abc").is_err());
        assert!(ObjectId::from_hex("A".repeat(HEX_LEN)).is_err());
    }

    #[test]
    fn fan_out_splits_at_two_chars() {
        let id = ObjectId::from_hex("a".repeat(HEX_LEN)).unwrap();
        assert_eq!(id.fan_out(), ("aa", &"a".repeat(HEX_LEN - 2)[..]));
    }
}
