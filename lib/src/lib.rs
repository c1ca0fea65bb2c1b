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

//! `mintvcs-lib` is the content-addressed object store and history-manipulation
//! engine behind the `mintvcs` command-line tool. It owns everything inside a
//! `.mintvcs/` repository directory: the blob/tree/commit object store, the
//! index, references and HEAD, and the checkout/status/merge algorithms built
//! on top of them.
//!
//! The crate is organized leaves-first:
//!
//! - [`hasher`] and [`codec`] are the two byte-level primitives (SHA-1,
//!   zlib-style compression) everything else is built from.
//! - [`object_id`] and [`objects`] define object identity and the canonical
//!   on-disk encoding of blobs, trees and commits.
//! - [`object_store`] and [`store`] persist and retrieve those objects.
//! - [`refs`] and [`index`] are the two pieces of mutable repository state
//!   outside the object store.
//! - [`working_tree`] and [`ignore`] bridge the repository to the filesystem
//!   outside `.mintvcs/`.
//! - [`snapshot`], [`checkout`], [`history`], [`status`] and [`merge_engine`]
//!   are the history-manipulation algorithms, each built only from the
//!   primitives above.
//! - [`repo`] wires all of the above into a single [`repo::Repository`] handle.

pub mod checkout;
pub mod codec;
pub mod config;
pub mod errors;
pub mod hasher;
pub mod history;
pub mod hex_util;
pub mod ignore;
pub mod index;
pub mod merge_engine;
pub mod object_id;
pub mod object_store;
pub mod objects;
pub mod refs;
pub mod repo;
pub mod repo_path;
pub mod snapshot;
pub mod status;
pub mod store;
pub mod working_tree;

pub use errors::MintError;
pub use errors::MintResult;
pub use merge_engine::MergeOutcome;
pub use object_id::ObjectId;
pub use repo::Repository;

#[cfg(test)]
pub(crate) mod tests {
    use tempfile::TempDir;

    /// Creates a fresh temporary directory for a test to work in.
    pub(crate) fn new_temp_dir() -> TempDir {
        tempfile::Builder::new()
            .prefix("mintvcs-test-")
            .tempdir()
            .unwrap()
    }
}
