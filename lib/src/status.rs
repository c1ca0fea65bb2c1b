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

//! Three-way comparison of the last commit's tree, the index, and the
//! working tree into the buckets a `status` command reports.

use std::collections::BTreeSet;

use crate::errors::MintError;
use crate::hasher;
use crate::ignore::IgnoreList;
use crate::index::Index;
use crate::object_id::ObjectId;
use crate::objects::encode_blob;
use crate::snapshot;
use crate::store::Store;
use crate::working_tree::WorkingTree;

/// The classification of every tracked and untracked path, per §4.11.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Status {
    /// Staged in the index with content differing from HEAD (new or
    /// changed relative to the last commit).
    pub staged: BTreeSet<String>,
    /// Present in the working tree with content differing from what's
    /// staged.
    pub modified: BTreeSet<String>,
    /// Staged, but missing from the working tree.
    pub deleted: BTreeSet<String>,
    /// Present in the working tree but never staged.
    pub untracked: BTreeSet<String>,
}

impl Status {
    /// True iff every bucket is empty: nothing to report.
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty()
            && self.modified.is_empty()
            && self.deleted.is_empty()
            && self.untracked.is_empty()
    }
}

/// Computes [`Status`] from the three snapshots described in §4.11.
pub fn compute(
    store: &Store,
    index: &Index,
    working_tree: &WorkingTree,
    head_tree: Option<&ObjectId>,
    ignores: &IgnoreList,
) -> Result<Status, MintError> {
    let head_entries = match head_tree {
        Some(tree) => snapshot::flatten_tree(store, tree)?,
        None => Default::default(),
    };

    let mut status = Status::default();
    let tracked: BTreeSet<String> = index.paths().map(str::to_owned).collect();

    for path in &tracked {
        let staged_id = index
            .get(path)
            .expect("path came from index.paths(), so index.get must return Some");

        if working_tree.exists(path) {
            let content = working_tree.read(path)?;
            let worktree_id = hasher::hash_bytes(&encode_blob(&content));
            if &worktree_id != staged_id {
                status.modified.insert(path.clone());
            } else if head_entries.get(path) != Some(staged_id) {
                status.staged.insert(path.clone());
            }
        } else {
            status.deleted.insert(path.clone());
            if head_entries.get(path) != Some(staged_id) {
                status.staged.insert(path.clone());
            }
        }
    }

    for path in working_tree.enumerate(ignores)? {
        if !tracked.contains(&path) {
            status.untracked.insert(path);
        }
    }

    Ok(status)
}
