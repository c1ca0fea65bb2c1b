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

//! HEAD and named references: `REPO/HEAD`, `REPO/refs/heads/<name>`,
//! `REPO/refs/tags/<name>`.

use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::errors::MintError;
use crate::object_id::ObjectId;
use crate::repo_path::validate_ref_name;

const HEADS_DIR: &str = "refs/heads";
const TAGS_DIR: &str = "refs/tags";

/// What `HEAD` currently points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    /// `ref: <path-under-repo>`, e.g. `refs/heads/main`.
    Symbolic(String),
    /// A literal commit identity (detached HEAD).
    Direct(ObjectId),
}

/// Reads and writes `HEAD` and the `refs/` tree.
pub struct RefStore {
    root: PathBuf,
}

impl RefStore {
    /// Wraps the repository root without creating anything on disk.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates `refs/heads/`, `refs/tags/`, and a `HEAD` pointing at the
    /// unborn `main` branch.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self, MintError> {
        let store = Self::new(root);
        fs::create_dir_all(store.root.join(HEADS_DIR))
            .map_err(|err| MintError::io(store.root.join(HEADS_DIR), err))?;
        fs::create_dir_all(store.root.join(TAGS_DIR))
            .map_err(|err| MintError::io(store.root.join(TAGS_DIR), err))?;
        store.set_head_symbolic("main")?;
        Ok(store)
    }

    fn head_path(&self) -> PathBuf {
        self.root.join("HEAD")
    }

    fn branch_path(&self, name: &str) -> PathBuf {
        self.root.join(HEADS_DIR).join(name)
    }

    fn tag_path(&self, name: &str) -> PathBuf {
        self.root.join(TAGS_DIR).join(name)
    }

    /// Reads the raw state of `HEAD`.
    pub fn read_head(&self) -> Result<HeadState, MintError> {
        let path = self.head_path();
        let text = fs::read_to_string(&path).map_err(|err| MintError::io(&path, err))?;
        parse_head(text.trim_end_matches('\n'))
    }

    /// Follows one level of symbolic indirection and returns the commit
    /// identity HEAD currently resolves to.
    ///
    /// Returns `Ok(None)` for the legal unborn-branch state: HEAD is
    /// symbolic and its target branch file does not exist yet.
    pub fn resolve_head(&self) -> Result<Option<ObjectId>, MintError> {
        match self.read_head()? {
            HeadState::Direct(id) => Ok(Some(id)),
            HeadState::Symbolic(refpath) => {
                let path = self.root.join(&refpath);
                match fs::read_to_string(&path) {
                    Ok(text) => Ok(Some(parse_commit_id(&text, &path)?)),
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
                    Err(err) => Err(MintError::io(&path, err)),
                }
            }
        }
    }

    /// Writes `id` wherever HEAD currently points: the referenced branch
    /// file if HEAD is symbolic, or `HEAD` itself if detached.
    pub fn update_current(&self, id: &ObjectId) -> Result<(), MintError> {
        match self.read_head()? {
            HeadState::Symbolic(refpath) => self.write_ref_file(&self.root.join(&refpath), id),
            HeadState::Direct(_) => self.set_head_direct(id),
        }
    }

    /// Points HEAD at a branch symbolically.
    pub fn set_head_symbolic(&self, branch: &str) -> Result<(), MintError> {
        validate_ref_name(branch)?;
        self.write_text_file(
            &self.head_path(),
            &format!("ref: {HEADS_DIR}/{branch}\n"),
        )
    }

    /// Points HEAD directly at a commit identity (detached).
    pub fn set_head_direct(&self, id: &ObjectId) -> Result<(), MintError> {
        self.write_text_file(&self.head_path(), &format!("{id}\n"))
    }

    /// The branch HEAD symbolically points at, or `None` when detached.
    pub fn current_branch(&self) -> Result<Option<String>, MintError> {
        match self.read_head()? {
            HeadState::Symbolic(refpath) => Ok(refpath
                .strip_prefix(&format!("{HEADS_DIR}/"))
                .map(|name| name.to_owned())),
            HeadState::Direct(_) => Ok(None),
        }
    }

    /// Every branch name under `refs/heads/`, sorted.
    pub fn list_branches(&self) -> Result<Vec<String>, MintError> {
        list_names(&self.root.join(HEADS_DIR))
    }

    /// Reads a branch's commit identity.
    pub fn read_branch(&self, name: &str) -> Result<ObjectId, MintError> {
        let path = self.branch_path(name);
        let text = fs::read_to_string(&path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                MintError::NotFound(format!("branch {name:?}"))
            } else {
                MintError::io(&path, err)
            }
        })?;
        parse_commit_id(&text, &path)
    }

    /// Writes a branch's commit identity, creating the branch if absent.
    pub fn write_branch(&self, name: &str, id: &ObjectId) -> Result<(), MintError> {
        validate_ref_name(name)?;
        self.write_ref_file(&self.branch_path(name), id)
    }

    /// Deletes a branch. Refuses to delete the branch HEAD currently points
    /// at symbolically.
    pub fn delete_branch(&self, name: &str) -> Result<(), MintError> {
        if self.current_branch()?.as_deref() == Some(name) {
            return Err(MintError::ProtectedBranch(name.to_owned()));
        }
        let path = self.branch_path(name);
        fs::remove_file(&path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                MintError::NotFound(format!("branch {name:?}"))
            } else {
                MintError::io(&path, err)
            }
        })
    }

    /// Renames a branch. Refuses to rename the branch HEAD currently points
    /// at symbolically, and fails if `new` already exists.
    pub fn rename_branch(&self, old: &str, new: &str) -> Result<(), MintError> {
        if self.current_branch()?.as_deref() == Some(old) {
            return Err(MintError::ProtectedBranch(old.to_owned()));
        }
        validate_ref_name(new)?;
        let new_path = self.branch_path(new);
        if new_path.is_file() {
            return Err(MintError::AlreadyExists(format!("branch {new:?}")));
        }
        let id = self.read_branch(old)?;
        self.write_ref_file(&new_path, &id)?;
        fs::remove_file(self.branch_path(old)).map_err(|err| MintError::io(self.branch_path(old), err))
    }

    /// Reads the commit identity stored at an arbitrary path under the
    /// repository root, e.g. `refs/heads/main` given directly rather than
    /// through [`RefStore::read_branch`]. Used by checkout's `refs/...`
    /// resolution strategy.
    pub fn read_ref_path(&self, refpath: &str) -> Result<ObjectId, MintError> {
        let path = self.root.join(refpath);
        let text = fs::read_to_string(&path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                MintError::NotFound(format!("ref {refpath:?}"))
            } else {
                MintError::io(&path, err)
            }
        })?;
        parse_commit_id(&text, &path)
    }

    /// Reads a tag's commit identity.
    pub fn read_tag(&self, name: &str) -> Result<ObjectId, MintError> {
        let path = self.tag_path(name);
        let text = fs::read_to_string(&path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                MintError::NotFound(format!("tag {name:?}"))
            } else {
                MintError::io(&path, err)
            }
        })?;
        parse_commit_id(&text, &path)
    }

    /// Writes a tag's commit identity, creating the tag if absent.
    pub fn write_tag(&self, name: &str, id: &ObjectId) -> Result<(), MintError> {
        validate_ref_name(name)?;
        self.write_ref_file(&self.tag_path(name), id)
    }

    fn write_ref_file(&self, path: &Path, id: &ObjectId) -> Result<(), MintError> {
        self.write_text_file(path, &format!("{id}\n"))
    }

    fn write_text_file(&self, path: &Path, contents: &str) -> Result<(), MintError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| MintError::io(parent, err))?;
        }
        let dir = path.parent().unwrap_or(&self.root);
        let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|err| MintError::io(dir, err))?;
        temp.write_all(contents.as_bytes())
            .map_err(|err| MintError::io(path, err))?;
        temp.flush().map_err(|err| MintError::io(path, err))?;
        temp.persist(path).map_err(|err| MintError::io(path, err.error))?;
        debug!(path = %path.display(), "updated ref file");
        Ok(())
    }
}

fn parse_head(text: &str) -> Result<HeadState, MintError> {
    if let Some(refpath) = text.strip_prefix("ref: ") {
        return Ok(HeadState::Symbolic(refpath.trim().to_owned()));
    }
    let id = ObjectId::from_hex(text.trim())
        .map_err(|_| MintError::Format(format!("HEAD contents {text:?} are not a ref or a commit id")))?;
    Ok(HeadState::Direct(id))
}

fn parse_commit_id(text: &str, path: &Path) -> Result<ObjectId, MintError> {
    ObjectId::from_hex(text.trim()).map_err(|_| {
        MintError::Format(format!(
            "{} does not contain a valid commit identity",
            path.display()
        ))
    })
}

fn list_names(dir: &Path) -> Result<Vec<String>, MintError> {
    let mut names = Vec::new();
    if !dir.is_dir() {
        return Ok(names);
    }
    for entry in fs::read_dir(dir).map_err(|err| MintError::io(dir, err))? {
        let entry = entry.map_err(|err| MintError::io(dir, err))?;
        if entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::new_temp_dir;

    fn oid(byte: u8) -> ObjectId {
        ObjectId::from_digest(&[byte; 20])
    }

    #[test]
    fn init_sets_unborn_main_branch() {
        let dir = new_temp_dir();
        let refs = RefStore::init(dir.path()).unwrap();
        assert_eq!(
            refs.read_head().unwrap(),
            HeadState::Symbolic("refs/heads/main".to_owned())
        );
        assert_eq!(refs.resolve_head().unwrap(), None);
        assert_eq!(refs.current_branch().unwrap(), Some("main".to_owned()));
    }

    #[test]
    fn update_current_writes_symbolic_target() {
        let dir = new_temp_dir();
        let refs = RefStore::init(dir.path()).unwrap();
        let id = oid(1);
        refs.update_current(&id).unwrap();
        assert_eq!(refs.resolve_head().unwrap(), Some(id.clone()));
        assert_eq!(refs.read_branch("main").unwrap(), id);
    }

    #[test]
    fn detached_head_update_current_overwrites_head() {
        let dir = new_temp_dir();
        let refs = RefStore::init(dir.path()).unwrap();
        let first = oid(1);
        refs.set_head_direct(&first).unwrap();
        let second = oid(2);
        refs.update_current(&second).unwrap();
        assert_eq!(refs.resolve_head().unwrap(), Some(second));
        assert_eq!(refs.current_branch().unwrap(), None);
    }

    #[test]
    fn delete_and_rename_protect_current_branch() {
        let dir = new_temp_dir();
        let refs = RefStore::init(dir.path()).unwrap();
        refs.write_branch("main", &oid(1)).unwrap();
        assert!(matches!(
            refs.delete_branch("main").unwrap_err(),
            MintError::ProtectedBranch(_)
        ));
        assert!(matches!(
            refs.rename_branch("main", "other").unwrap_err(),
            MintError::ProtectedBranch(_)
        ));
    }

    #[test]
    fn rename_moves_branch_and_fails_on_collision() {
        let dir = new_temp_dir();
        let refs = RefStore::init(dir.path()).unwrap();
        refs.write_branch("main", &oid(1)).unwrap();
        refs.write_branch("feature", &oid(2)).unwrap();
        refs.set_head_symbolic("feature").unwrap();
        refs.rename_branch("main", "trunk").unwrap();
        assert_eq!(refs.read_branch("trunk").unwrap(), oid(1));
        assert!(refs.read_branch("main").is_err());

        let err = refs.rename_branch("trunk", "feature").unwrap_err();
        assert!(matches!(err, MintError::AlreadyExists(_)));
    }

    #[test]
    fn list_branches_is_sorted() {
        let dir = new_temp_dir();
        let refs = RefStore::init(dir.path()).unwrap();
        // `init` leaves `main` unborn (no branch file yet, matching the
        // legal unborn-branch state); only committed branches show up here.
        refs.write_branch("zeta", &oid(1)).unwrap();
        refs.write_branch("alpha", &oid(2)).unwrap();
        refs.write_branch("main", &oid(3)).unwrap();
        assert_eq!(refs.list_branches().unwrap(), vec!["alpha", "main", "zeta"]);
    }

    #[test]
    fn invalid_ref_name_is_rejected() {
        let dir = new_temp_dir();
        let refs = RefStore::init(dir.path()).unwrap();
        assert!(refs.write_branch("../escape", &oid(1)).is_err());
    }
}
