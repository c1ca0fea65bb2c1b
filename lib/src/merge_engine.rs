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

//! Three-way merge of two branch histories: per-path decision table,
//! conflict blob materialization, and the resulting two-parent commit.
//!
//! This engine only touches the object graph and refs. It never writes the
//! working tree or index; callers that want the merge reflected there run
//! [`crate::checkout`] afterward, the same split this crate draws between
//! [`crate::snapshot`] (pure data) and [`crate::checkout`] (materialization)
//! everywhere else.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use tracing::info;
use tracing::instrument;

use crate::errors::MintError;
use crate::history::HistoryWalker;
use crate::object_id::ObjectId;
use crate::objects::Signature;
use crate::refs::RefStore;
use crate::snapshot;
use crate::store::Store;

/// The result of a merge attempt.
#[derive(Debug)]
pub enum MergeOutcome {
    /// `current` already equals `target`; nothing was done.
    AlreadyUpToDate,
    /// A merge commit was written; `conflicts` lists every path that needed
    /// a synthesized conflict blob.
    Merged {
        commit: ObjectId,
        conflicts: Vec<String>,
    },
}

/// Merges `target_branch` into the commit HEAD currently resolves to.
#[instrument(skip(store, refs, author, committer))]
pub fn merge(
    store: &Store,
    refs: &RefStore,
    target_branch: &str,
    author: &Signature,
    committer: &Signature,
) -> Result<MergeOutcome, MintError> {
    let current = refs
        .resolve_head()?
        .ok_or_else(|| MintError::UnresolvedRef("HEAD".to_owned()))?;
    let target = refs.read_branch(target_branch)?;

    if current == target {
        info!("already up to date");
        return Ok(MergeOutcome::AlreadyUpToDate);
    }

    let mut walker = HistoryWalker::new(store);
    let base = walker
        .lca(&current, &target)?
        .ok_or_else(|| MintError::NoCommonAncestor(current.to_string(), target.to_string()))?;

    let base_tree = store.read_commit(&base)?.tree;
    let current_tree = store.read_commit(&current)?.tree;
    let target_tree = store.read_commit(&target)?.tree;

    let base_map = snapshot::flatten_tree(store, &base_tree)?;
    let current_map = snapshot::flatten_tree(store, &current_tree)?;
    let target_map = snapshot::flatten_tree(store, &target_tree)?;

    let mut all_paths: BTreeSet<&str> = BTreeSet::new();
    all_paths.extend(base_map.keys().map(String::as_str));
    all_paths.extend(current_map.keys().map(String::as_str));
    all_paths.extend(target_map.keys().map(String::as_str));

    let mut merged: BTreeMap<String, ObjectId> = BTreeMap::new();
    let mut conflicts = Vec::new();

    for path in all_paths {
        let b = base_map.get(path);
        let s = current_map.get(path);
        let t = target_map.get(path);

        match (s == t, s == b, t == b) {
            (true, _, _) => {
                if let Some(id) = s {
                    merged.insert(path.to_owned(), id.clone());
                }
            }
            (false, true, false) => {
                if let Some(id) = t {
                    merged.insert(path.to_owned(), id.clone());
                }
            }
            (false, false, true) => {
                if let Some(id) = s {
                    merged.insert(path.to_owned(), id.clone());
                }
            }
            (false, false, false) => {
                let source_content = match s {
                    Some(id) => store.read_blob(id)?,
                    None => Vec::new(),
                };
                let target_content = match t {
                    Some(id) => store.read_blob(id)?,
                    None => Vec::new(),
                };
                let conflict_bytes = materialize_conflict(&source_content, &target_content);
                let conflict_blob = store.write_blob(&conflict_bytes)?;
                merged.insert(path.to_owned(), conflict_blob);
                conflicts.push(path.to_owned());
            }
        }
    }

    let merged_paths: Vec<(&str, &ObjectId)> = merged.iter().map(|(p, id)| (p.as_str(), id)).collect();
    let merged_tree = snapshot::write_tree_from_paths(store, merged_paths)?;

    let message = format!("Merge branch {target_branch} into HEAD");
    let commit = store.write_commit(
        &merged_tree,
        &[current.clone(), target.clone()],
        author,
        committer,
        &message,
    )?;
    refs.update_current(&commit)?;

    info!(commit = %commit, conflicts = conflicts.len(), "merge complete");
    Ok(MergeOutcome::Merged { commit, conflicts })
}

/// Builds the conflict-blob body for one path: both sides delimited by
/// marker lines, each side getting a trailing newline appended only if it
/// doesn't already end with one (an empty side stays empty).
fn materialize_conflict(source: &[u8], target: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"<<<<<<< SOURCE\n");
    out.extend(conflict_side(source));
    out.extend_from_slice(b"=======\n");
    out.extend(conflict_side(target));
    out.extend_from_slice(b">>>>>>> TARGET\n");
    out
}

fn conflict_side(content: &[u8]) -> Vec<u8> {
    if content.is_empty() {
        return Vec::new();
    }
    if content.ends_with(b"\n") {
        content.to_vec()
    } else {
        let mut owned = content.to_vec();
        owned.push(b'\n');
        owned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::TreeEntry;
    use crate::tests::new_temp_dir;

    struct Fixture {
        _dir: tempfile::TempDir,
        store: Store,
        refs: RefStore,
        sig: Signature,
    }

    fn fixture() -> Fixture {
        let dir = new_temp_dir();
        let store = Store::init(dir.path().join("objects")).unwrap();
        let refs = RefStore::init(dir.path()).unwrap();
        Fixture {
            _dir: dir,
            store,
            refs,
            sig: Signature::new("a <a@x>", 0, 0),
        }
    }

    fn commit_with_file(
        fx: &Fixture,
        parent: Option<&ObjectId>,
        name: &str,
        content: &[u8],
        message: &str,
    ) -> ObjectId {
        let blob = fx.store.write_blob(content).unwrap();
        let tree = fx
            .store
            .write_tree(&[TreeEntry::file(name, blob)])
            .unwrap();
        let parents: Vec<ObjectId> = parent.cloned().into_iter().collect();
        fx.store
            .write_commit(&tree, &parents, &fx.sig, &fx.sig, message)
            .unwrap()
    }

    #[test]
    fn already_up_to_date_when_branches_equal() {
        let fx = fixture();
        let root = commit_with_file(&fx, None, "a.txt", b"hello\n", "root");
        fx.refs.write_branch("main", &root).unwrap();
        fx.refs.write_branch("feat", &root).unwrap();
        fx.refs.set_head_symbolic("main").unwrap();
        fx.refs.update_current(&root).unwrap();

        let outcome = merge(&fx.store, &fx.refs, "feat", &fx.sig, &fx.sig).unwrap();
        assert!(matches!(outcome, MergeOutcome::AlreadyUpToDate));
    }

    #[test]
    fn clean_merge_combines_one_sided_changes() {
        let fx = fixture();
        let root = commit_with_file(&fx, None, "a.txt", b"hello\n", "root");
        fx.refs.write_branch("main", &root).unwrap();
        fx.refs.write_branch("feat", &root).unwrap();

        let feat_commit = commit_with_file(&fx, Some(&root), "a.txt", b"hi\n", "feat change");
        fx.refs.write_branch("feat", &feat_commit).unwrap();

        let main_tree = fx
            .store
            .write_tree(&[TreeEntry::file("b.txt", fx.store.write_blob(b"b\n").unwrap())])
            .unwrap();
        let main_commit = fx
            .store
            .write_commit(&main_tree, &[root.clone()], &fx.sig, &fx.sig, "main adds b")
            .unwrap();
        fx.refs.write_branch("main", &main_commit).unwrap();
        fx.refs.set_head_symbolic("main").unwrap();
        fx.refs.update_current(&main_commit).unwrap();

        let outcome = merge(&fx.store, &fx.refs, "feat", &fx.sig, &fx.sig).unwrap();
        let MergeOutcome::Merged { commit, conflicts } = outcome else {
            panic!("expected a merge commit");
        };
        assert!(conflicts.is_empty());
        let body = fx.store.read_commit(&commit).unwrap();
        let flattened = snapshot::flatten_tree(&fx.store, &body.tree).unwrap();
        assert_eq!(
            fx.store.read_blob(flattened.get("a.txt").unwrap()).unwrap(),
            b"hi\n"
        );
        assert_eq!(
            fx.store.read_blob(flattened.get("b.txt").unwrap()).unwrap(),
            b"b\n"
        );
    }

    #[test]
    fn conflicting_changes_produce_marker_blob() {
        let fx = fixture();
        let root = commit_with_file(&fx, None, "a.txt", b"hello\n", "root");
        fx.refs.write_branch("main", &root).unwrap();
        fx.refs.write_branch("x", &root).unwrap();

        let x_commit = commit_with_file(&fx, Some(&root), "a.txt", b"x\n", "x change");
        fx.refs.write_branch("x", &x_commit).unwrap();

        let main_commit = commit_with_file(&fx, Some(&root), "a.txt", b"y\n", "main change");
        fx.refs.write_branch("main", &main_commit).unwrap();
        fx.refs.set_head_symbolic("main").unwrap();
        fx.refs.update_current(&main_commit).unwrap();

        let outcome = merge(&fx.store, &fx.refs, "x", &fx.sig, &fx.sig).unwrap();
        let MergeOutcome::Merged { commit, conflicts } = outcome else {
            panic!("expected a merge commit");
        };
        assert_eq!(conflicts, vec!["a.txt".to_owned()]);

        let body = fx.store.read_commit(&commit).unwrap();
        assert_eq!(body.parents, vec![main_commit, x_commit]);
        let flattened = snapshot::flatten_tree(&fx.store, &body.tree).unwrap();
        let conflict_content = fx.store.read_blob(flattened.get("a.txt").unwrap()).unwrap();
        assert_eq!(
            conflict_content,
            b"<<<<<<< SOURCE\ny\n=======\nx\n>>>>>>> TARGET\n"
        );
    }

    #[test]
    fn disjoint_histories_fail_with_no_common_ancestor() {
        let fx = fixture();
        let a = commit_with_file(&fx, None, "a.txt", b"a\n", "a");
        let b = commit_with_file(&fx, None, "b.txt", b"b\n", "b");
        fx.refs.write_branch("main", &a).unwrap();
        fx.refs.write_branch("other", &b).unwrap();
        fx.refs.set_head_symbolic("main").unwrap();
        fx.refs.update_current(&a).unwrap();

        let err = merge(&fx.store, &fx.refs, "other", &fx.sig, &fx.sig).unwrap_err();
        assert!(matches!(err, MintError::NoCommonAncestor(_, _)));
    }
}
