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

//! `.mintvcsignore` parsing and the exact-match (non-glob) rule it drives.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::errors::MintError;
use crate::repo_path::first_component;

/// The name of the repository-root ignore file.
pub const IGNORE_FILE_NAME: &str = ".mintvcsignore";

/// A parsed set of ignore patterns.
///
/// Matching is exact, never glob-based: a path is ignored if its first
/// component or its whole normalized path equals one of these patterns.
#[derive(Debug, Default, Clone)]
pub struct IgnoreList {
    patterns: HashSet<String>,
}

impl IgnoreList {
    /// An ignore list with no patterns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads `.mintvcsignore` from `root`, if present. A missing file yields
    /// an empty list.
    pub fn load(root: &Path) -> Result<Self, MintError> {
        let path = root.join(IGNORE_FILE_NAME);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::empty()),
            Err(err) => return Err(MintError::io(&path, err)),
        };
        Ok(Self::parse(&text))
    }

    /// Parses ignore-file text directly; exposed for testing and reuse by
    /// callers that already have the file's contents in hand.
    pub fn parse(text: &str) -> Self {
        let mut patterns = HashSet::new();
        for raw_line in text.lines() {
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let normalized = line.replace('\\', "/");
            let trimmed = normalized.trim_end_matches('/');
            if !trimmed.is_empty() {
                patterns.insert(trimmed.to_owned());
            }
        }
        Self { patterns }
    }

    /// True iff `normalized_path` (forward-slash, repo-relative) should be
    /// skipped by staging, status, and checkout.
    pub fn is_ignored(&self, normalized_path: &str) -> bool {
        self.patterns.contains(normalized_path)
            || self.patterns.contains(first_component(normalized_path))
    }
}
