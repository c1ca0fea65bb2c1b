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

//! The SHA-1 byte-stream hasher objects are addressed by.

use sha1::Digest as _;
use sha1::Sha1;

use crate::object_id::ObjectId;

/// A streaming SHA-1 hasher.
///
/// `finalize` consumes `self`, so double-finalizing is a compile error
/// rather than a runtime one.
#[derive(Default)]
pub struct Hasher {
    inner: Sha1,
}

impl Hasher {
    /// Starts a new, empty hash.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds more bytes into the running hash.
    pub fn update(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    /// Finalizes the hash and renders it as an [`ObjectId`].
    pub fn finalize(self) -> ObjectId {
        let digest = self.inner.finalize();
        let bytes: [u8; 20] = digest.into();
        ObjectId::from_digest(&bytes)
    }
}

/// Hashes a single byte slice in one call.
pub fn hash_bytes(bytes: &[u8]) -> ObjectId {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    hasher.finalize()
}
