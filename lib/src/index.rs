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

//! The staging table: a flat map from repo-relative path to staged blob
//! identity, persisted as `REPO/index`.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::path::PathBuf;

use tracing::instrument;

use crate::errors::MintError;
use crate::object_id::ObjectId;

/// A single staged file: the fixed mode/kind every entry carries, plus its
/// path and the blob it currently points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub mode: &'static str,
    pub kind: &'static str,
    pub path: String,
    pub id: ObjectId,
}

/// The staging table. Every regular file this crate tracks is a `100644
/// blob` entry; there is no directory entry kind in the index itself (trees
/// are reconstructed from paths at snapshot time).
#[derive(Debug, Default)]
pub struct Index {
    entries: BTreeMap<String, ObjectId>,
}

impl Index {
    /// An empty index, matching the "missing file" case.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the index file at `path`. A missing file is the empty index.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, MintError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::empty()),
            Err(err) => return Err(MintError::io(path, err)),
        };
        Self::parse(&text)
    }

    fn parse(text: &str) -> Result<Self, MintError> {
        let mut entries = BTreeMap::new();
        for line in text.lines() {
            if line.is_empty() {
                continue;
            }
            let mut parts = line.splitn(4, ' ');
            let mode = parts
                .next()
                .ok_or_else(|| MintError::Format(format!("malformed index line {line:?}")))?;
            let kind = parts
                .next()
                .ok_or_else(|| MintError::Format(format!("malformed index line {line:?}")))?;
            let hex = parts
                .next()
                .ok_or_else(|| MintError::Format(format!("malformed index line {line:?}")))?;
            let path = parts
                .next()
                .ok_or_else(|| MintError::Format(format!("malformed index line {line:?}")))?;
            if mode != "100644" || kind != "blob" {
                return Err(MintError::Format(format!(
                    "unsupported index entry mode/kind {mode:?}/{kind:?}"
                )));
            }
            let id = ObjectId::from_hex(hex)
                .map_err(|_| MintError::Format(format!("malformed index identity {hex:?}")))?;
            entries.insert(path.to_owned(), id);
        }
        Ok(Self { entries })
    }

    /// Writes the index back out, one sorted line per entry.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn save(&self, path: &Path) -> Result<(), MintError> {
        let dir = path.parent().unwrap_or(Path::new("."));
        fs::create_dir_all(dir).map_err(|err| MintError::io(dir, err))?;
        let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|err| MintError::io(dir, err))?;
        for (file_path, id) in &self.entries {
            writeln!(temp, "100644 blob {id} {file_path}").map_err(|err| MintError::io(path, err))?;
        }
        temp.flush().map_err(|err| MintError::io(path, err))?;
        temp.persist(path).map_err(|err| MintError::io(path, err.error))?;
        Ok(())
    }

    /// Inserts or replaces the staged blob identity for `path`.
    pub fn put(&mut self, path: impl Into<String>, id: ObjectId) {
        self.entries.insert(path.into(), id);
    }

    /// Looks up the staged identity for `path`.
    pub fn get(&self, path: &str) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    /// Removes `path` from the index. Returns whether it was present.
    pub fn remove(&mut self, path: &str) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Every staged path, in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// True iff nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every staged entry, in sorted path order.
    pub fn entries(&self) -> impl Iterator<Item = IndexEntry> + '_ {
        self.entries.iter().map(|(path, id)| IndexEntry {
            mode: "100644",
            kind: "blob",
            path: path.clone(),
            id: id.clone(),
        })
    }

    /// Replaces the whole table at once, e.g. when checkout rewrites the
    /// index to mirror a target tree.
    pub fn replace_all(&mut self, entries: impl IntoIterator<Item = (String, ObjectId)>) {
        self.entries = entries.into_iter().collect();
    }
}

/// Returns the canonical on-disk location of the index file under a
/// repository root.
pub fn index_path(repo_root: &Path) -> PathBuf {
    repo_root.join("index")
}
