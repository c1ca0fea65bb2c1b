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

//! The CLI-only error wrapper: every command returns `Result<(), CommandError>`,
//! and `main` turns the error variant into one stderr line and an exit code.

use mintvcs_lib::MintError;

/// The exit code every failed command invocation reports.
pub const EXIT_FAILURE: i32 = 1;

/// A command-dispatch-boundary error. Wraps both the library's structured
/// [`MintError`] and any `anyhow::Error` raised purely from CLI-only logic
/// (argument combinations the library never sees).
#[derive(Debug)]
pub struct CommandError {
    inner: anyhow::Error,
}

impl CommandError {
    /// The line to print to stderr for this failure.
    pub fn message(&self) -> String {
        format!("error: {:#}", self.inner)
    }

    /// The process exit code this failure should produce.
    pub fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }
}

impl From<MintError> for CommandError {
    fn from(err: MintError) -> Self {
        Self { inner: err.into() }
    }
}

impl From<anyhow::Error> for CommandError {
    fn from(err: anyhow::Error) -> Self {
        Self { inner: err }
    }
}
