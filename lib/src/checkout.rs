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

//! Resolving a checkout target and materializing its tree into the working
//! directory and index.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::instrument;

use crate::errors::MintError;
use crate::hex_util;
use crate::index::Index;
use crate::object_id::ObjectId;
use crate::refs::RefStore;
use crate::snapshot;
use crate::store::Store;
use crate::working_tree::WorkingTree;

/// The minimum number of hex characters a commit-id prefix must have to be
/// accepted as a checkout target.
const MIN_PREFIX_LEN: usize = 7;

/// Resolves `token` to a commit identity and, if it named a branch, that
/// branch's name.
///
/// Resolution order: an exact branch name; the literal token `HEAD`; a
/// `refs/...` path; an abbreviated hex commit id of at least 7 characters;
/// otherwise [`MintError::UnresolvedRef`].
pub fn resolve_target(
    store: &Store,
    refs: &RefStore,
    token: &str,
) -> Result<(ObjectId, Option<String>), MintError> {
    if let Ok(id) = refs.read_branch(token) {
        return Ok((id, Some(token.to_owned())));
    }
    if token == "HEAD" {
        let id = refs
            .resolve_head()?
            .ok_or_else(|| MintError::UnresolvedRef(token.to_owned()))?;
        return Ok((id, refs.current_branch()?));
    }
    if let Some(_rest) = token.strip_prefix("refs/") {
        let id = refs.read_ref_path(token)?;
        return Ok((id, None));
    }
    if token.len() >= MIN_PREFIX_LEN && hex_util::is_lower_hex(token) {
        let id = store.resolve_prefix(token)?;
        return Ok((id, None));
    }
    Err(MintError::UnresolvedRef(token.to_owned()))
}

/// Checks out `token`: materializes its tree into the working directory,
/// rewrites the index to mirror it, and updates HEAD.
///
/// `index_path` is the on-disk location of the index file (`REPO/index`),
/// kept distinct from `working_tree`'s root since the two are not the same
/// directory.
#[instrument(skip(store, refs, index, working_tree))]
pub fn checkout(
    store: &Store,
    refs: &RefStore,
    index: &mut Index,
    index_path: &Path,
    working_tree: &WorkingTree,
    token: &str,
) -> Result<ObjectId, MintError> {
    let (commit_id, branch) = resolve_target(store, refs, token)?;
    let commit = store.read_commit(&commit_id)?;
    let target_map = snapshot::flatten_tree(store, &commit.tree)?;

    let new_tracked: BTreeSet<&str> = target_map.keys().map(String::as_str).collect();
    let old_tracked: Vec<String> = index.paths().map(str::to_owned).collect();

    // Computing `new_tracked` before deleting anything means a path that
    // survives into the target tree is never transiently removed.
    for path in &old_tracked {
        if !new_tracked.contains(path.as_str()) {
            working_tree.remove(path)?;
        }
    }

    for (path, blob_id) in &target_map {
        let content = store.read_blob(blob_id)?;
        working_tree.write(path, &content)?;
    }

    index.replace_all(target_map.into_iter());
    index.save(index_path)?;

    match &branch {
        Some(name) => refs.set_head_symbolic(name)?,
        None => refs.set_head_direct(&commit_id)?,
    }

    Ok(commit_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Signature;
    use crate::objects::TreeEntry;
    use crate::tests::new_temp_dir;

    struct Fixture {
        dir: tempfile::TempDir,
        store: Store,
        refs: RefStore,
    }

    fn fixture() -> Fixture {
        let dir = new_temp_dir();
        let store = Store::init(dir.path().join("objects")).unwrap();
        let refs = RefStore::init(dir.path()).unwrap();
        Fixture { dir, store, refs }
    }

    fn commit_with(fx: &Fixture, entries: &[TreeEntry], parent: Option<&ObjectId>) -> ObjectId {
        let tree = fx.store.write_tree(entries).unwrap();
        let sig = Signature::new("a <a@x>", 0, 0);
        let parents: Vec<ObjectId> = parent.cloned().into_iter().collect();
        fx.store
            .write_commit(&tree, &parents, &sig, &sig, "msg")
            .unwrap()
    }

    #[test]
    fn checkout_branch_materializes_files_and_updates_head() {
        let fx = fixture();
        let blob = fx.store.write_blob(b"hello\n").unwrap();
        let commit = commit_with(&fx, &[TreeEntry::file("a.txt", blob)], None);
        fx.refs.write_branch("main", &commit).unwrap();

        let mut index = Index::empty();
        let working_tree = WorkingTree::new(fx.dir.path().join("work"));
        std::fs::create_dir_all(fx.dir.path().join("work")).unwrap();
        let index_path = fx.dir.path().join("index");

        let resolved = checkout(
            &fx.store,
            &fx.refs,
            &mut index,
            &index_path,
            &working_tree,
            "main",
        )
        .unwrap();
        assert_eq!(resolved, commit);
        assert_eq!(working_tree.read("a.txt").unwrap(), b"hello\n");
        assert_eq!(
            fx.refs.current_branch().unwrap(),
            Some("main".to_owned())
        );
        assert_eq!(index.paths().collect::<Vec<_>>(), vec!["a.txt"]);
    }

    #[test]
    fn checkout_removes_files_not_in_target_but_keeps_survivors() {
        let fx = fixture();
        let blob_a = fx.store.write_blob(b"a\n").unwrap();
        let blob_b = fx.store.write_blob(b"b\n").unwrap();
        let first = commit_with(
            &fx,
            &[
                TreeEntry::file("a.txt", blob_a.clone()),
                TreeEntry::file("b.txt", blob_b),
            ],
            None,
        );
        let second = commit_with(&fx, &[TreeEntry::file("a.txt", blob_a)], Some(&first));
        fx.refs.write_branch("main", &first).unwrap();
        fx.refs.write_branch("trimmed", &second).unwrap();

        let work_dir = fx.dir.path().join("work");
        std::fs::create_dir_all(&work_dir).unwrap();
        let working_tree = WorkingTree::new(&work_dir);
        let mut index = Index::empty();
        let index_path = fx.dir.path().join("index");

        checkout(&fx.store, &fx.refs, &mut index, &index_path, &working_tree, "main").unwrap();
        assert!(working_tree.exists("b.txt"));

        checkout(
            &fx.store,
            &fx.refs,
            &mut index,
            &index_path,
            &working_tree,
            "trimmed",
        )
        .unwrap();
        assert!(!working_tree.exists("b.txt"));
        assert!(working_tree.exists("a.txt"));
    }

    #[test]
    fn checkout_by_abbreviated_hex_detaches_head() {
        let fx = fixture();
        let blob = fx.store.write_blob(b"x\n").unwrap();
        let commit = commit_with(&fx, &[TreeEntry::file("a.txt", blob)], None);

        let work_dir = fx.dir.path().join("work");
        std::fs::create_dir_all(&work_dir).unwrap();
        let working_tree = WorkingTree::new(&work_dir);
        let mut index = Index::empty();
        let index_path = fx.dir.path().join("index");

        let prefix = &commit.hex()[..8];
        let resolved = checkout(
            &fx.store,
            &fx.refs,
            &mut index,
            &index_path,
            &working_tree,
            prefix,
        )
        .unwrap();
        assert_eq!(resolved, commit);
        assert_eq!(fx.refs.current_branch().unwrap(), None);
    }

    #[test]
    fn unresolvable_token_fails() {
        let fx = fixture();
        let work_dir = fx.dir.path().join("work");
        std::fs::create_dir_all(&work_dir).unwrap();
        let working_tree = WorkingTree::new(&work_dir);
        let mut index = Index::empty();
        let index_path = fx.dir.path().join("index");
        let err = checkout(
            &fx.store,
            &fx.refs,
            &mut index,
            &index_path,
            &working_tree,
            "no-such-thing",
        )
        .unwrap_err();
        assert!(matches!(err, MintError::UnresolvedRef(_)));
    }
}
