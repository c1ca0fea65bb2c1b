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

//! On-disk storage of compressed object bytes under a two-level fan-out.
//!
//! `objects/<first-2-hex>/<remaining-38-hex>` keeps any one directory from
//! accumulating an unbounded number of entries as the object count grows.

use std::fs;
use std::io::Write as _;
use std::path::PathBuf;

use tracing::debug;
use tracing::trace;

use crate::errors::MintError;
use crate::object_id::ObjectId;

/// Reads and writes compressed object bytes under `objects/`.
pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    /// Wraps the `objects/` directory at `root`. Does not create it; callers
    /// use [`ObjectStore::init`] for that.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the `objects/` directory (and its parent) if it does not
    /// already exist.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self, MintError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|err| MintError::io(&root, err))?;
        Ok(Self { root })
    }

    fn path_for(&self, id: &ObjectId) -> PathBuf {
        let (dir, rest) = id.fan_out();
        self.root.join(dir).join(rest)
    }

    /// True iff an object with this identity is already stored.
    pub fn has(&self, id: &ObjectId) -> bool {
        self.path_for(id).is_file()
    }

    /// Writes `compressed` under `id`, atomically.
    ///
    /// Objects are immutable and content-addressed, so if the path already
    /// exists this is a silent no-op rather than an overwrite: two writers
    /// racing to store the same content should never corrupt each other's
    /// work.
    pub fn put(&self, id: &ObjectId, compressed: &[u8]) -> Result<(), MintError> {
        let final_path = self.path_for(id);
        if final_path.is_file() {
            trace!(id = %id, "object already stored, skipping write");
            return Ok(());
        }
        let dir = final_path
            .parent()
            .expect("path_for always has a fan-out parent directory");
        fs::create_dir_all(dir).map_err(|err| MintError::io(dir, err))?;

        let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|err| MintError::io(dir, err))?;
        temp.write_all(compressed)
            .map_err(|err| MintError::io(&final_path, err))?;
        temp.flush().map_err(|err| MintError::io(&final_path, err))?;
        temp.persist(&final_path)
            .map_err(|err| MintError::io(&final_path, err.error))?;
        debug!(id = %id, "wrote object");
        Ok(())
    }

    /// Reads the compressed bytes stored under `id`.
    ///
    /// Fails with [`MintError::NotFound`] if no object has this identity.
    pub fn get(&self, id: &ObjectId) -> Result<Vec<u8>, MintError> {
        let path = self.path_for(id);
        fs::read(&path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                MintError::NotFound(format!("object {id}"))
            } else {
                MintError::io(&path, err)
            }
        })
    }

    /// Finds every stored object identity whose hex rendering starts with
    /// `prefix`. Used to resolve the abbreviated commit ids checkout and
    /// merge accept.
    pub fn ids_with_prefix(&self, prefix: &str) -> Result<Vec<ObjectId>, MintError> {
        let mut matches = Vec::new();
        if prefix.len() < 2 {
            return Ok(self.scan_all()?.into_iter().filter(|id| id.hex().starts_with(prefix)).collect());
        }
        let (dir_part, rest_part) = prefix.split_at(2);
        let dir = self.root.join(dir_part);
        if !dir.is_dir() {
            return Ok(matches);
        }
        for entry in fs::read_dir(&dir).map_err(|err| MintError::io(&dir, err))? {
            let entry = entry.map_err(|err| MintError::io(&dir, err))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.starts_with(rest_part) {
                continue;
            }
            let hex = format!("{dir_part}{name}");
            if let Ok(id) = ObjectId::from_hex(&hex) {
                matches.push(id);
            }
        }
        Ok(matches)
    }

    fn scan_all(&self) -> Result<Vec<ObjectId>, MintError> {
        let mut out = Vec::new();
        if !self.root.is_dir() {
            return Ok(out);
        }
        for fan_entry in fs::read_dir(&self.root).map_err(|err| MintError::io(&self.root, err))? {
            let fan_entry = fan_entry.map_err(|err| MintError::io(&self.root, err))?;
            if !fan_entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
                continue;
            }
            let dir_part = fan_entry.file_name();
            let dir_part = dir_part.to_string_lossy();
            for leaf in fs::read_dir(fan_entry.path()).map_err(|err| MintError::io(&self.root, err))? {
                let leaf = leaf.map_err(|err| MintError::io(&self.root, err))?;
                let hex = format!("{dir_part}{}", leaf.file_name().to_string_lossy());
                if let Ok(id) = ObjectId::from_hex(&hex) {
                    out.push(id);
                }
            }
        }
        Ok(out)
    }
}
