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

//! Walking the commit parent DAG: fetching parents and finding the lowest
//! common ancestor of two commits.

use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::VecDeque;

use crate::errors::MintError;
use crate::object_id::ObjectId;
use crate::store::Store;

/// Reads and caches commit parent lists for repeated traversal.
pub struct HistoryWalker<'a> {
    store: &'a Store,
    parent_cache: HashMap<ObjectId, Vec<ObjectId>>,
}

impl<'a> HistoryWalker<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            parent_cache: HashMap::new(),
        }
    }

    /// The direct parents of `commit`, memoized across calls.
    pub fn parents(&mut self, commit: &ObjectId) -> Result<Vec<ObjectId>, MintError> {
        if let Some(parents) = self.parent_cache.get(commit) {
            return Ok(parents.clone());
        }
        let body = self.store.read_commit(commit)?;
        self.parent_cache.insert(commit.clone(), body.parents.clone());
        Ok(body.parents)
    }

    /// Finds a lowest common ancestor of `a` and `b` by bidirectional
    /// breadth-first search over the parent relation, expanding the two
    /// frontiers one layer at a time and returning the first commit either
    /// side discovers that the other side has already visited.
    ///
    /// Returns `None` if the two histories are disjoint. When more than one
    /// minimal common ancestor exists, the one returned depends on search
    /// order; this is a documented best-effort tiebreak, not a canonical
    /// choice.
    pub fn lca(&mut self, a: &ObjectId, b: &ObjectId) -> Result<Option<ObjectId>, MintError> {
        if a == b {
            return Ok(Some(a.clone()));
        }

        let mut visited_from_a: HashSet<ObjectId> = HashSet::new();
        let mut visited_from_b: HashSet<ObjectId> = HashSet::new();
        let mut frontier_a: VecDeque<ObjectId> = VecDeque::from([a.clone()]);
        let mut frontier_b: VecDeque<ObjectId> = VecDeque::from([b.clone()]);
        visited_from_a.insert(a.clone());
        visited_from_b.insert(b.clone());

        while !frontier_a.is_empty() || !frontier_b.is_empty() {
            if let Some(found) = self.expand_frontier(&mut frontier_a, &mut visited_from_a, &visited_from_b)? {
                return Ok(Some(found));
            }
            if let Some(found) = self.expand_frontier(&mut frontier_b, &mut visited_from_b, &visited_from_a)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    fn expand_frontier(
        &mut self,
        frontier: &mut VecDeque<ObjectId>,
        own_visited: &mut HashSet<ObjectId>,
        other_visited: &HashSet<ObjectId>,
    ) -> Result<Option<ObjectId>, MintError> {
        let layer_size = frontier.len();
        for _ in 0..layer_size {
            let Some(current) = frontier.pop_front() else {
                break;
            };
            for parent in self.parents(&current)? {
                if other_visited.contains(&parent) {
                    return Ok(Some(parent));
                }
                if own_visited.insert(parent.clone()) {
                    frontier.push_back(parent);
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Signature;
    use crate::tests::new_temp_dir;

    fn store() -> (tempfile::TempDir, Store) {
        let dir = new_temp_dir();
        let store = Store::init(dir.path().join("objects")).unwrap();
        (dir, store)
    }

    fn commit(store: &Store, parents: &[ObjectId], message: &str) -> ObjectId {
        let tree = store.write_tree(&[]).unwrap();
        let sig = Signature::new("a <a@x>", 0, 0);
        store
            .write_commit(&tree, parents, &sig, &sig, message)
            .unwrap()
    }

    #[test]
    fn lca_of_equal_commits_is_itself() {
        let (_dir, store) = store();
        let root = commit(&store, &[], "root");
        let mut walker = HistoryWalker::new(&store);
        assert_eq!(walker.lca(&root, &root).unwrap(), Some(root));
    }

    #[test]
    fn lca_of_linear_history_is_ancestor() {
        let (_dir, store) = store();
        let root = commit(&store, &[], "root");
        let child = commit(&store, &[root.clone()], "child");
        let mut walker = HistoryWalker::new(&store);
        assert_eq!(walker.lca(&root, &child).unwrap(), Some(root));
    }

    #[test]
    fn lca_of_diverged_branches_is_fork_point() {
        let (_dir, store) = store();
        let root = commit(&store, &[], "root");
        let left = commit(&store, &[root.clone()], "left");
        let right = commit(&store, &[root.clone()], "right");
        let mut walker = HistoryWalker::new(&store);
        assert_eq!(walker.lca(&left, &right).unwrap(), Some(root));
    }

    #[test]
    fn lca_of_disjoint_histories_is_none() {
        let (_dir, store) = store();
        let a = commit(&store, &[], "a");
        let b = commit(&store, &[], "b");
        let mut walker = HistoryWalker::new(&store);
        assert_eq!(walker.lca(&a, &b).unwrap(), None);
    }

    #[test]
    fn parents_are_memoized() {
        let (_dir, store) = store();
        let root = commit(&store, &[], "root");
        let child = commit(&store, &[root.clone()], "child");
        let mut walker = HistoryWalker::new(&store);
        assert_eq!(walker.parents(&child).unwrap(), vec![root]);
        assert_eq!(walker.parents(&child).unwrap(), walker.parent_cache[&child]);
    }
}
