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

//! The terminal output surface every command writes through, so tests can
//! swap stdout/stderr for in-memory buffers.

use std::io::Write as _;

/// Wraps the process's stdout and stderr streams.
pub struct Ui {
    stdout: Box<dyn Write>,
    stderr: Box<dyn Write>,
}

impl Ui {
    /// A `Ui` writing directly to the process's real stdout/stderr.
    pub fn for_terminal() -> Self {
        Self {
            stdout: Box::new(std::io::stdout()),
            stderr: Box::new(std::io::stderr()),
        }
    }

    /// Writes a line to stdout.
    pub fn println(&mut self, line: impl AsRef<str>) {
        let _ = writeln!(self.stdout, "{}", line.as_ref());
    }

    /// Writes a line to stderr.
    pub fn eprintln(&mut self, line: impl AsRef<str>) {
        let _ = writeln!(self.stderr, "{}", line.as_ref());
    }
}
