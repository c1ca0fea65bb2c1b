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

//! The filesystem outside `.mintvcs/`: enumerating tracked candidates and
//! reading/writing file bytes.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use crate::errors::MintError;
use crate::ignore::IgnoreList;
use crate::repo_path;

/// The repository name this crate always ignores, regardless of
/// `.mintvcsignore` contents.
const REPO_DIR_NAME: &str = ".mintvcs";

/// A view onto the working directory rooted at `root`.
pub struct WorkingTree {
    root: PathBuf,
}

impl WorkingTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists every regular file under the root, normalized to forward-slash
    /// relative paths, skipping the repository directory, the ignore file
    /// itself, and anything `ignores` matches.
    pub fn enumerate(&self, ignores: &IgnoreList) -> Result<Vec<String>, MintError> {
        let mut out = Vec::new();
        self.walk(&self.root, ignores, &mut out)?;
        out.sort();
        Ok(out)
    }

    fn walk(&self, dir: &Path, ignores: &IgnoreList, out: &mut Vec<String>) -> Result<(), MintError> {
        let read_dir = match fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(MintError::io(dir, err)),
        };
        for entry in read_dir {
            let entry = entry.map_err(|err| MintError::io(dir, err))?;
            let file_type = entry.file_type().map_err(|err| MintError::io(dir, err))?;
            let name = entry.file_name();
            if name == REPO_DIR_NAME || name == crate::ignore::IGNORE_FILE_NAME {
                continue;
            }
            let path = entry.path();
            let normalized = repo_path::normalize(&self.root, &path)?;
            if ignores.is_ignored(&normalized) {
                continue;
            }
            if file_type.is_dir() {
                self.walk(&path, ignores, out)?;
            } else if file_type.is_file() {
                out.push(normalized);
            }
        }
        Ok(())
    }

    /// True iff `normalized_path` exists as a regular file under the root.
    pub fn exists(&self, normalized_path: &str) -> bool {
        self.root.join(normalized_path).is_file()
    }

    /// Reads a tracked file's bytes.
    pub fn read(&self, normalized_path: &str) -> Result<Vec<u8>, MintError> {
        let path = self.root.join(normalized_path);
        fs::read(&path).map_err(|err| MintError::io(&path, err))
    }

    /// Writes a file's bytes, creating parent directories as needed, and
    /// overwriting whatever was there before.
    pub fn write(&self, normalized_path: &str, content: &[u8]) -> Result<(), MintError> {
        let path = self.root.join(normalized_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| MintError::io(parent, err))?;
        }
        fs::write(&path, content).map_err(|err| MintError::io(&path, err))
    }

    /// Removes a tracked file. A missing file is not an error: callers use
    /// this to clear paths that may already be gone.
    pub fn remove(&self, normalized_path: &str) -> Result<(), MintError> {
        let path = self.root.join(normalized_path);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(MintError::io(&path, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::new_temp_dir;

    #[test]
    fn enumerate_skips_repo_dir_and_ignore_file() {
        let dir = new_temp_dir();
        let tree = WorkingTree::new(dir.path());
        fs::create_dir_all(dir.path().join(".mintvcs")).unwrap();
        fs::write(dir.path().join(".mintvcs/HEAD"), "x").unwrap();
        fs::write(dir.path().join(".mintvcsignore"), "build\n").unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();
        fs::create_dir_all(dir.path().join("build")).unwrap();
        fs::write(dir.path().join("build/output"), "x").unwrap();

        let files = tree.enumerate(&IgnoreList::parse("build\n")).unwrap();
        assert_eq!(files, vec!["a.txt"]);
    }

    #[test]
    fn enumerate_recurses_into_subdirectories() {
        let dir = new_temp_dir();
        let tree = WorkingTree::new(dir.path());
        fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        fs::write(dir.path().join("src/nested/a.rs"), "x").unwrap();
        let files = tree.enumerate(&IgnoreList::empty()).unwrap();
        assert_eq!(files, vec!["src/nested/a.rs"]);
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = new_temp_dir();
        let tree = WorkingTree::new(dir.path());
        tree.write("a/b.txt", b"content").unwrap();
        assert_eq!(tree.read("a/b.txt").unwrap(), b"content");
    }

    #[test]
    fn remove_missing_file_is_ok() {
        let dir = new_temp_dir();
        let tree = WorkingTree::new(dir.path());
        tree.remove("does-not-exist.txt").unwrap();
    }
}
