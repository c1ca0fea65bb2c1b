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

//! Building a tree object graph from a flat path-to-blob map, and the
//! inverse: flattening a stored tree back into that same shape.

use std::collections::BTreeMap;

use crate::errors::MintError;
use crate::object_id::ObjectId;
use crate::objects::TreeEntry;
use crate::store::Store;

/// An in-memory, pre-hash intermediate tree.
///
/// A directory tree under construction never shares structure and never
/// cycles, so a recursive value type captures the shape directly, without
/// pointers or an arena.
enum TreeBuilderNode {
    File(ObjectId),
    Dir(BTreeMap<String, TreeBuilderNode>),
}

impl TreeBuilderNode {
    fn empty_dir() -> Self {
        Self::Dir(BTreeMap::new())
    }

    fn insert(&mut self, path: &str, id: ObjectId) {
        let Self::Dir(children) = self else {
            unreachable!("insert is only ever called on directory nodes");
        };
        match path.split_once('/') {
            None => {
                children.insert(path.to_owned(), Self::File(id));
            }
            Some((first, rest)) => {
                let child = children
                    .entry(first.to_owned())
                    .or_insert_with(Self::empty_dir);
                child.insert(rest, id);
            }
        }
    }

    /// Writes this node (and, transitively, every child) to the store in
    /// children-first order, returning the identity of the written object.
    /// Children at each level are serialized in lexicographic order by
    /// construction, since `BTreeMap` iterates in key order.
    fn write(&self, store: &Store) -> Result<ObjectId, MintError> {
        match self {
            Self::File(id) => Ok(id.clone()),
            Self::Dir(children) => {
                let mut entries = Vec::with_capacity(children.len());
                for (name, child) in children {
                    let child_id = child.write(store)?;
                    entries.push(match child {
                        Self::File(_) => TreeEntry::file(name.clone(), child_id),
                        Self::Dir(_) => TreeEntry::dir(name.clone(), child_id),
                    });
                }
                store.write_tree(&entries)
            }
        }
    }
}

/// Builds and stores a tree from a flat `path -> blob identity` map,
/// returning the root tree's identity.
pub fn write_tree_from_paths<'a>(
    store: &Store,
    paths: impl IntoIterator<Item = (&'a str, &'a ObjectId)>,
) -> Result<ObjectId, MintError> {
    let mut root = TreeBuilderNode::empty_dir();
    for (path, id) in paths {
        root.insert(path, id.clone());
    }
    root.write(store)
}

/// Reads a tree (recursively) back into a flat `path -> blob identity` map.
pub fn flatten_tree(store: &Store, root: &ObjectId) -> Result<BTreeMap<String, ObjectId>, MintError> {
    let mut out = BTreeMap::new();
    flatten_into(store, root, "", &mut out)?;
    Ok(out)
}

fn flatten_into(
    store: &Store,
    tree_id: &ObjectId,
    prefix: &str,
    out: &mut BTreeMap<String, ObjectId>,
) -> Result<(), MintError> {
    for entry in store.read_tree(tree_id)? {
        let path = if prefix.is_empty() {
            entry.name.clone()
        } else {
            format!("{prefix}/{}", entry.name)
        };
        if entry.is_dir() {
            flatten_into(store, &entry.id, &path, out)?;
        } else {
            out.insert(path, entry.id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::new_temp_dir;

    fn store() -> (tempfile::TempDir, Store) {
        let dir = new_temp_dir();
        let store = Store::init(dir.path().join("objects")).unwrap();
        (dir, store)
    }

    #[test]
    fn builds_nested_tree_and_flattens_back() {
        let (_dir, store) = store();
        let a = store.write_blob(b"a-content").unwrap();
        let b = store.write_blob(b"b-content").unwrap();
        let paths = [("top.txt", &a), ("nested/deep.txt", &b)];
        let root = write_tree_from_paths(&store, paths).unwrap();

        let flattened = flatten_tree(&store, &root).unwrap();
        assert_eq!(flattened.get("top.txt"), Some(&a));
        assert_eq!(flattened.get("nested/deep.txt"), Some(&b));
        assert_eq!(flattened.len(), 2);
    }

    #[test]
    fn identical_paths_produce_identical_root_identity() {
        let (_dir, store) = store();
        let a = store.write_blob(b"1").unwrap();
        let b = store.write_blob(b"2").unwrap();
        let first = write_tree_from_paths(&store, [("z.txt", &a), ("a.txt", &b)]).unwrap();
        let second = write_tree_from_paths(&store, [("a.txt", &b), ("z.txt", &a)]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_index_produces_empty_root_tree() {
        let (_dir, store) = store();
        let root: Vec<(&str, &ObjectId)> = Vec::new();
        let id = write_tree_from_paths(&store, root).unwrap();
        assert!(flatten_tree(&store, &id).unwrap().is_empty());
    }
}
