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

//! Path normalization shared by the index, working tree, and ignore
//! matching: every path this crate stores or compares is a forward-slash,
//! repo-root-relative string, never an OS path.

use std::path::Component;
use std::path::Path;

use crate::errors::MintError;

/// Normalizes `candidate` (absolute or relative) to a forward-slash path
/// relative to `root`.
///
/// Fails with [`MintError::Format`] if `candidate` is not under `root` or
/// contains a `..` component that would escape it.
pub fn normalize(root: &Path, candidate: &Path) -> Result<String, MintError> {
    let joined = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        root.join(candidate)
    };

    let mut relative_parts: Vec<String> = Vec::new();
    let root_parts: Vec<Component> = root.components().collect();
    let joined_parts: Vec<Component> = joined.components().collect();

    if joined_parts.len() < root_parts.len() || joined_parts[..root_parts.len()] != root_parts[..]
    {
        return Err(MintError::Format(format!(
            "path {} is not inside the repository root",
            candidate.display()
        )));
    }

    for component in &joined_parts[root_parts.len()..] {
        match component {
            Component::Normal(part) => {
                relative_parts.push(part.to_string_lossy().into_owned());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(MintError::Format(format!(
                    "path {} escapes the repository root",
                    candidate.display()
                )));
            }
            Component::RootDir | Component::Prefix(_) => {}
        }
    }

    Ok(relative_parts.join("/"))
}

/// Returns the first forward-slash-separated component of a normalized path.
pub fn first_component(path: &str) -> &str {
    path.split('/').next().unwrap_or(path)
}

/// Validates a branch or tag name before it is used to build a path under
/// `refs/`.
///
/// Rejects empty names, names containing `..`, backslashes, control
/// characters, or a leading dash (which could be mistaken for a flag by
/// shells invoking the CLI).
pub fn validate_ref_name(name: &str) -> Result<(), MintError> {
    let invalid = |reason: &'static str| MintError::InvalidRef {
        name: name.to_owned(),
        reason,
    };
    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.starts_with('-') {
        return Err(invalid("name starts with a dash"));
    }
    if name.contains("..") {
        return Err(invalid("name contains a '..' path-traversal sequence"));
    }
    if name.contains('\\') {
        return Err(invalid("name contains a backslash"));
    }
    if name.chars().any(|c| c.is_control()) {
        return Err(invalid("name contains a control character"));
    }
    if name.split('/').any(|part| part.is_empty()) {
        return Err(invalid("name contains an empty path segment"));
    }
    Ok(())
}
