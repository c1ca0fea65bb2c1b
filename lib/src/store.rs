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

//! The object graph's read/write surface: hashing, compression, and
//! canonical encoding stitched together behind one small API.

use std::path::PathBuf;

use tracing::instrument;

use crate::codec;
use crate::errors::MintError;
use crate::hasher::Hasher;
use crate::object_id::ObjectId;
use crate::object_store::ObjectStore;
use crate::objects;
use crate::objects::CommitBody;
use crate::objects::ObjectKind;
use crate::objects::Signature;
use crate::objects::TreeEntry;

/// The content-addressed object graph: blobs, trees, and commits.
pub struct Store {
    objects: ObjectStore,
}

impl Store {
    /// Wraps the `objects/` directory at `root` without creating it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            objects: ObjectStore::new(root),
        }
    }

    /// Creates the `objects/` directory at `root`.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self, MintError> {
        Ok(Self {
            objects: ObjectStore::init(root)?,
        })
    }

    fn write(&self, raw: &[u8]) -> Result<ObjectId, MintError> {
        let mut hasher = Hasher::new();
        hasher.update(raw);
        let id = hasher.finalize();
        let compressed = codec::compress(raw);
        self.objects.put(&id, &compressed)?;
        Ok(id)
    }

    fn read_raw(&self, id: &ObjectId) -> Result<(ObjectKind, Vec<u8>), MintError> {
        let compressed = self.objects.get(id)?;
        let raw = codec::decompress(&compressed).map_err(|_| MintError::CorruptObject {
            id: id.to_string(),
            reason: "not a valid zlib stream".to_owned(),
        })?;
        objects::decode(&raw).map_err(|err| attach_id(err, id))
    }

    /// Hashes and stores `content` as a blob, returning its identity.
    #[instrument(skip(self, content))]
    pub fn write_blob(&self, content: &[u8]) -> Result<ObjectId, MintError> {
        self.write(&objects::encode_blob(content))
    }

    /// Reads back a blob's content.
    pub fn read_blob(&self, id: &ObjectId) -> Result<Vec<u8>, MintError> {
        let (kind, body) = self.read_raw(id)?;
        expect_kind(id, kind, ObjectKind::Blob)?;
        Ok(body)
    }

    /// Hashes and stores a tree from its (already-ordered) entries.
    #[instrument(skip(self, entries))]
    pub fn write_tree(&self, entries: &[TreeEntry]) -> Result<ObjectId, MintError> {
        self.write(&objects::encode_tree(entries))
    }

    /// Reads back a tree's entries.
    pub fn read_tree(&self, id: &ObjectId) -> Result<Vec<TreeEntry>, MintError> {
        let (kind, body) = self.read_raw(id)?;
        expect_kind(id, kind, ObjectKind::Tree)?;
        objects::decode_tree(&body).map_err(|err| attach_id(err, id))
    }

    /// Hashes and stores a commit, returning its identity.
    #[instrument(skip(self, author, committer, message))]
    pub fn write_commit(
        &self,
        tree: &ObjectId,
        parents: &[ObjectId],
        author: &Signature,
        committer: &Signature,
        message: &str,
    ) -> Result<ObjectId, MintError> {
        let raw = objects::encode_commit(tree, parents, author, committer, message);
        self.write(&raw)
    }

    /// Reads back a commit's structured fields.
    pub fn read_commit(&self, id: &ObjectId) -> Result<CommitBody, MintError> {
        let (kind, body) = self.read_raw(id)?;
        expect_kind(id, kind, ObjectKind::Commit)?;
        objects::decode_commit(&body).map_err(|err| attach_id(err, id))
    }

    /// True iff an object with this identity has been stored.
    pub fn has(&self, id: &ObjectId) -> bool {
        self.objects.has(id)
    }

    /// Resolves an abbreviated hex prefix (at least 7 characters, per the
    /// same convention used elsewhere for abbreviated identities) to the
    /// single object it names.
    pub fn resolve_prefix(&self, prefix: &str) -> Result<ObjectId, MintError> {
        let mut matches = self.objects.ids_with_prefix(prefix)?;
        match matches.len() {
            0 => Err(MintError::NotFound(format!("object prefix {prefix:?}"))),
            1 => Ok(matches.remove(0)),
            candidates => Err(MintError::AmbiguousPrefix {
                prefix: prefix.to_owned(),
                candidates,
            }),
        }
    }
}

fn expect_kind(id: &ObjectId, actual: ObjectKind, expected: ObjectKind) -> Result<(), MintError> {
    if actual == expected {
        return Ok(());
    }
    Err(MintError::CorruptObject {
        id: id.to_string(),
        reason: format!("expected a {expected:?} object, found a {actual:?} object"),
    })
}

fn attach_id(err: MintError, id: &ObjectId) -> MintError {
    match err {
        MintError::CorruptObject { reason, .. } => MintError::CorruptObject {
            id: id.to_string(),
            reason,
        },
        other => other,
    }
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
    fn blob_round_trips() {
        let (_dir, store) = store();
        let id = store.write_blob(b"hello\n").unwrap();
        assert_eq!(store.read_blob(&id).unwrap(), b"hello\n");
    }

    #[test]
    fn writing_identical_content_is_deterministic() {
        let (_dir, store) = store();
        let a = store.write_blob(b"same").unwrap();
        let b = store.write_blob(b"same").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn tree_round_trips() {
        let (_dir, store) = store();
        let blob = store.write_blob(b"x").unwrap();
        let entries = vec![TreeEntry::file("a.txt", blob)];
        let tree = store.write_tree(&entries).unwrap();
        assert_eq!(store.read_tree(&tree).unwrap(), entries);
    }

    #[test]
    fn commit_round_trips() {
        let (_dir, store) = store();
        let blob = store.write_blob(b"x").unwrap();
        let tree = store.write_tree(&[TreeEntry::file("a.txt", blob)]).unwrap();
        let sig = Signature::new("a <a@x>", 1000, 0);
        let commit = store
            .write_commit(&tree, &[], &sig, &sig, "first commit")
            .unwrap();
        let body = store.read_commit(&commit).unwrap();
        assert_eq!(body.tree, tree);
        assert_eq!(body.message, "first commit");
    }

    #[test]
    fn reading_blob_as_tree_is_corrupt_object() {
        let (_dir, store) = store();
        let blob = store.write_blob(b"x").unwrap();
        let err = store.read_tree(&blob).unwrap_err();
        assert!(matches!(err, MintError::CorruptObject { .. }));
    }

    #[test]
    fn resolve_prefix_finds_unique_and_ambiguous() {
        let (_dir, store) = store();
        let id = store.write_blob(b"unique content").unwrap();
        let resolved = store.resolve_prefix(&id.hex()[..7]).unwrap();
        assert_eq!(resolved, id);
        let err = store.resolve_prefix("0").unwrap_err();
        assert!(matches!(
            err,
            MintError::NotFound(_) | MintError::AmbiguousPrefix { .. }
        ));
    }
}
