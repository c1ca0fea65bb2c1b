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

//! The error taxonomy every fallible operation in this crate returns.

use std::path::PathBuf;

use thiserror::Error;

/// The single error type returned by every public operation in this crate.
///
/// This is a closed, flat taxonomy (not a per-component type) because every
/// caller — command dispatch in `mintvcs-cli` chief among them — needs to
/// classify a failure the same way regardless of which component raised it.
#[derive(Debug, Error)]
pub enum MintError {
    /// `.mintvcs/` does not exist under the given path (or any ancestor).
    #[error("not a mintvcs repository (or any parent up to the root)")]
    NotARepo,

    /// A filesystem read, write, or permission failure.
    #[error("I/O error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A compressed stream or an on-disk text format (HEAD, a ref file, an
    /// index line) did not match its expected shape.
    #[error("malformed data: {0}")]
    Format(String),

    /// An object's content did not match its header: bad length, unknown
    /// kind, or an embedded identity that isn't 40 hex characters.
    #[error("corrupt object {id}: {reason}")]
    CorruptObject { id: String, reason: String },

    /// An object, ref, or file was looked up but does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A branch or tag creation collided with an existing name.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// A ref name failed validation (empty, control characters, or an
    /// embedded path-traversal sequence).
    #[error("invalid ref name {name:?}: {reason}")]
    InvalidRef { name: String, reason: &'static str },

    /// A checkout or merge target could not be resolved to exactly one
    /// commit.
    #[error("unresolved reference {0:?}")]
    UnresolvedRef(String),

    /// `None` ambiguous prefix matched more than one object.
    #[error("ambiguous object prefix {prefix:?} matches {candidates} objects")]
    AmbiguousPrefix { prefix: String, candidates: usize },

    /// A merge was attempted between two commits with disjoint histories.
    #[error("no common ancestor between {0} and {1}")]
    NoCommonAncestor(String, String),

    /// `commit` was invoked with nothing staged.
    #[error("nothing to commit: the index is empty")]
    IndexEmpty,

    /// An attempt to delete or rename the branch HEAD currently points at.
    #[error("cannot delete or rename the current branch {0:?}")]
    ProtectedBranch(String),
}

/// The result type returned by every public operation in this crate.
pub type MintResult<T> = Result<T, MintError>;

impl MintError {
    /// Wraps a filesystem error with the path that was being operated on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
