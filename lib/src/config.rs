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

//! `REPO/config` and `REPO/description`: opaque text the core reads and
//! writes but never semantically parses.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use crate::errors::MintError;

const CONFIG_FILE_NAME: &str = "config";
const DESCRIPTION_FILE_NAME: &str = "description";

/// The seed contents written to `REPO/config` at `init` time.
const DEFAULT_CONFIG: &str = "[core]\n\trepositoryformatversion = 0\n";

/// The seed contents written to `REPO/description` at `init` time.
const DEFAULT_DESCRIPTION: &str = "Unnamed repository; edit this file to name it for gitweb.\n";

/// Reads and writes the two free-text files every repository carries.
pub struct RepoConfig {
    config_path: PathBuf,
    description_path: PathBuf,
}

impl RepoConfig {
    pub fn new(repo_root: impl AsRef<Path>) -> Self {
        let repo_root = repo_root.as_ref();
        Self {
            config_path: repo_root.join(CONFIG_FILE_NAME),
            description_path: repo_root.join(DESCRIPTION_FILE_NAME),
        }
    }

    /// Seeds both files with their default content, not overwriting either
    /// if it already exists.
    pub fn init(&self) -> Result<(), MintError> {
        if !self.config_path.is_file() {
            fs::write(&self.config_path, DEFAULT_CONFIG)
                .map_err(|err| MintError::io(&self.config_path, err))?;
        }
        if !self.description_path.is_file() {
            fs::write(&self.description_path, DEFAULT_DESCRIPTION)
                .map_err(|err| MintError::io(&self.description_path, err))?;
        }
        Ok(())
    }

    /// Reads `config` as opaque text.
    pub fn read_config(&self) -> Result<String, MintError> {
        fs::read_to_string(&self.config_path).map_err(|err| MintError::io(&self.config_path, err))
    }

    /// Overwrites `config` with `text`.
    pub fn write_config(&self, text: &str) -> Result<(), MintError> {
        fs::write(&self.config_path, text).map_err(|err| MintError::io(&self.config_path, err))
    }

    /// Reads `description` as opaque text.
    pub fn read_description(&self) -> Result<String, MintError> {
        fs::read_to_string(&self.description_path)
            .map_err(|err| MintError::io(&self.description_path, err))
    }

    /// Overwrites `description` with `text`.
    pub fn write_description(&self, text: &str) -> Result<(), MintError> {
        fs::write(&self.description_path, text)
            .map_err(|err| MintError::io(&self.description_path, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::new_temp_dir;

    #[test]
    fn init_seeds_default_content() {
        let dir = new_temp_dir();
        let config = RepoConfig::new(dir.path());
        config.init().unwrap();
        assert_eq!(config.read_config().unwrap(), DEFAULT_CONFIG);
        assert_eq!(config.read_description().unwrap(), DEFAULT_DESCRIPTION);
    }

    #[test]
    fn init_does_not_clobber_existing_files() {
        let dir = new_temp_dir();
        let config = RepoConfig::new(dir.path());
        config.init().unwrap();
        config.write_config("[core]\n\tcustom = true\n").unwrap();
        config.init().unwrap();
        assert_eq!(config.read_config().unwrap(), "[core]\n\tcustom = true\n");
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = new_temp_dir();
        let config = RepoConfig::new(dir.path());
        config.init().unwrap();
        config.write_description("my project\n").unwrap();
        assert_eq!(config.read_description().unwrap(), "my project\n");
    }
}
