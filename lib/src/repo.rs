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

//! The `Repository` façade: one handle per CLI invocation wiring the object
//! store, refs, index, and working tree together.

use std::path::Path;
use std::path::PathBuf;

use tracing::info;
use tracing::instrument;

use crate::checkout;
use crate::config::RepoConfig;
use crate::errors::MintError;
use crate::hasher;
use crate::ignore::IgnoreList;
use crate::index::Index;
use crate::merge_engine;
use crate::merge_engine::MergeOutcome;
use crate::object_id::ObjectId;
use crate::objects::encode_blob;
use crate::objects::Signature;
use crate::refs::RefStore;
use crate::repo_path;
use crate::snapshot;
use crate::status::Status;
use crate::store::Store;
use crate::working_tree::WorkingTree;

/// The name of the repository directory, relative to the working directory
/// root it governs.
pub const REPO_DIR_NAME: &str = ".mintvcs";

/// A single handle onto a repository: its object store, refs, index, and
/// the working directory it tracks.
pub struct Repository {
    /// `<work_dir>/.mintvcs`.
    repo_root: PathBuf,
    work_dir: PathBuf,
    store: Store,
    refs: RefStore,
    config: RepoConfig,
}

impl Repository {
    /// Creates a new repository rooted at `work_dir`.
    ///
    /// Fails with [`MintError::AlreadyExists`] if `work_dir/.mintvcs`
    /// already exists.
    #[instrument(skip_all, fields(work_dir = %work_dir.display()))]
    pub fn init(work_dir: impl Into<PathBuf>) -> Result<Self, MintError> {
        let work_dir = work_dir.into();
        let repo_root = work_dir.join(REPO_DIR_NAME);
        if repo_root.is_dir() {
            return Err(MintError::AlreadyExists(format!(
                "repository at {}",
                repo_root.display()
            )));
        }
        std::fs::create_dir_all(&repo_root).map_err(|err| MintError::io(&repo_root, err))?;
        let store = Store::init(repo_root.join("objects"))?;
        let refs = RefStore::init(&repo_root)?;
        let config = RepoConfig::new(&repo_root);
        config.init()?;
        info!(repo_root = %repo_root.display(), "initialized repository");
        Ok(Self {
            repo_root,
            work_dir,
            store,
            refs,
            config,
        })
    }

    /// Opens the repository governing `start_dir`, walking upward through
    /// ancestors until `.mintvcs` is found.
    ///
    /// Fails with [`MintError::NotARepo`] if no ancestor contains one.
    pub fn open(start_dir: impl Into<PathBuf>) -> Result<Self, MintError> {
        let mut candidate = start_dir.into();
        loop {
            let repo_root = candidate.join(REPO_DIR_NAME);
            if repo_root.is_dir() {
                let store = Store::new(repo_root.join("objects"));
                let refs = RefStore::new(&repo_root);
                let config = RepoConfig::new(&repo_root);
                return Ok(Self {
                    repo_root,
                    work_dir: candidate,
                    store,
                    refs,
                    config,
                });
            }
            if !candidate.pop() {
                return Err(MintError::NotARepo);
            }
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn refs(&self) -> &RefStore {
        &self.refs
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    fn index_path(&self) -> PathBuf {
        crate::index::index_path(&self.repo_root)
    }

    fn load_index(&self) -> Result<Index, MintError> {
        Index::load(&self.index_path())
    }

    fn working_tree(&self) -> WorkingTree {
        WorkingTree::new(&self.work_dir)
    }

    fn ignores(&self) -> Result<IgnoreList, MintError> {
        IgnoreList::load(&self.work_dir)
    }

    /// Computes the identity of a file's content without storing it
    /// (`hash-object` without `-w`).
    pub fn hash_object(&self, content: &[u8]) -> ObjectId {
        hasher::hash_bytes(&encode_blob(content))
    }

    /// Computes and stores a file's content as a blob (`hash-object -w`).
    pub fn hash_object_write(&self, content: &[u8]) -> Result<ObjectId, MintError> {
        self.store.write_blob(content)
    }

    /// Stages `path` (a file or directory, or `.` for the whole working
    /// tree), recursing into directories and skipping ignored paths.
    #[instrument(skip(self))]
    pub fn add(&self, path: &str) -> Result<(), MintError> {
        let mut index = self.load_index()?;
        let working_tree = self.working_tree();
        let ignores = self.ignores()?;

        if path == "." {
            for normalized in working_tree.enumerate(&ignores)? {
                self.stage_one(&mut index, &working_tree, &normalized)?;
            }
        } else {
            let absolute = self.work_dir.join(path);
            if absolute.is_dir() {
                let normalized_dir = repo_path::normalize(&self.work_dir, Path::new(path))?;
                let prefix = format!("{normalized_dir}/");
                for normalized in working_tree.enumerate(&ignores)? {
                    if normalized.starts_with(&prefix) {
                        self.stage_one(&mut index, &working_tree, &normalized)?;
                    }
                }
            } else {
                let normalized = repo_path::normalize(&self.work_dir, Path::new(path))?;
                if ignores.is_ignored(&normalized) {
                    info!(path = %normalized, "skipping ignored path");
                } else {
                    self.stage_one(&mut index, &working_tree, &normalized)?;
                }
            }
        }

        index.save(&self.index_path())
    }

    fn stage_one(
        &self,
        index: &mut Index,
        working_tree: &WorkingTree,
        normalized_path: &str,
    ) -> Result<(), MintError> {
        let content = working_tree.read(normalized_path)?;
        let id = self.store.write_blob(&content)?;
        index.put(normalized_path, id);
        Ok(())
    }

    /// Commits whatever is staged, returning the new commit's identity.
    ///
    /// Fails with [`MintError::IndexEmpty`] if nothing is staged.
    #[instrument(skip(self, author, committer))]
    pub fn commit(
        &self,
        message: &str,
        author: &Signature,
        committer: &Signature,
    ) -> Result<ObjectId, MintError> {
        let index = self.load_index()?;
        if index.is_empty() {
            return Err(MintError::IndexEmpty);
        }
        let paths: Vec<(String, ObjectId)> = index
            .entries()
            .map(|entry| (entry.path, entry.id))
            .collect();
        let path_refs: Vec<(&str, &ObjectId)> =
            paths.iter().map(|(path, id)| (path.as_str(), id)).collect();
        let tree = snapshot::write_tree_from_paths(&self.store, path_refs)?;

        let parents: Vec<ObjectId> = self.refs.resolve_head()?.into_iter().collect();
        let commit = self
            .store
            .write_commit(&tree, &parents, author, committer, message)?;
        self.refs.update_current(&commit)?;
        info!(commit = %commit, "created commit");
        Ok(commit)
    }

    /// Walks the first-parent chain from HEAD, most recent first.
    pub fn log(&self) -> Result<Vec<ObjectId>, MintError> {
        let mut out = Vec::new();
        let mut current = self.refs.resolve_head()?;
        while let Some(commit) = current {
            let body = self.store.read_commit(&commit)?;
            out.push(commit);
            current = body.parents.first().cloned();
        }
        Ok(out)
    }

    /// Computes working-tree/index/HEAD status per §4.11.
    pub fn status(&self) -> Result<Status, MintError> {
        let index = self.load_index()?;
        let working_tree = self.working_tree();
        let ignores = self.ignores()?;
        let head_tree = match self.refs.resolve_head()? {
            Some(commit) => Some(self.store.read_commit(&commit)?.tree),
            None => None,
        };
        crate::status::compute(&self.store, &index, &working_tree, head_tree.as_ref(), &ignores)
    }

    /// Checks out `token`; see [`crate::checkout::checkout`].
    #[instrument(skip(self))]
    pub fn checkout(&self, token: &str) -> Result<ObjectId, MintError> {
        let mut index = self.load_index()?;
        let working_tree = self.working_tree();
        checkout::checkout(
            &self.store,
            &self.refs,
            &mut index,
            &self.index_path(),
            &working_tree,
            token,
        )
    }

    /// Merges `target_branch` into the commit HEAD resolves to.
    #[instrument(skip(self, author, committer))]
    pub fn merge(
        &self,
        target_branch: &str,
        author: &Signature,
        committer: &Signature,
    ) -> Result<MergeOutcome, MintError> {
        merge_engine::merge(&self.store, &self.refs, target_branch, author, committer)
    }

    /// Creates a branch pointing at the commit HEAD currently resolves to.
    pub fn branch_create(&self, name: &str) -> Result<(), MintError> {
        let commit = self
            .refs
            .resolve_head()?
            .ok_or_else(|| MintError::UnresolvedRef("HEAD".to_owned()))?;
        if self.refs.read_branch(name).is_ok() {
            return Err(MintError::AlreadyExists(format!("branch {name:?}")));
        }
        self.refs.write_branch(name, &commit)
    }

    pub fn branch_list(&self) -> Result<Vec<String>, MintError> {
        self.refs.list_branches()
    }

    pub fn branch_delete(&self, name: &str) -> Result<(), MintError> {
        self.refs.delete_branch(name)
    }

    pub fn branch_rename(&self, old: &str, new: &str) -> Result<(), MintError> {
        self.refs.rename_branch(old, new)
    }
}
