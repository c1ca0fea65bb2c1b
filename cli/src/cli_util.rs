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

//! Shared helpers every command needs: locating the repository, building
//! the author/committer signature for the current invocation, and wiring up
//! the `tracing` filter from `-v`/`RUST_LOG`.

use mintvcs_lib::objects::Signature;
use mintvcs_lib::Repository;

use crate::command_error::CommandError;

/// Opens the repository governing the current working directory.
pub fn open_repository() -> Result<Repository, CommandError> {
    let cwd = std::env::current_dir().map_err(|err| anyhow::anyhow!("cannot read cwd: {err}"))?;
    Ok(Repository::open(cwd)?)
}

/// Builds the author/committer signature for a command invocation from the
/// environment (`MINTVCS_AUTHOR_NAME`/`MINTVCS_AUTHOR_EMAIL`, falling back
/// to `$USER`) and the current time.
pub fn current_signature() -> Signature {
    let name = std::env::var("MINTVCS_AUTHOR_NAME")
        .or_else(|_| std::env::var("USER"))
        .unwrap_or_else(|_| "unknown".to_owned());
    let email = std::env::var("MINTVCS_AUTHOR_EMAIL")
        .unwrap_or_else(|_| format!("{name}@localhost"));
    let now = chrono::Local::now();
    Signature::new(
        format!("{name} <{email}>"),
        now.timestamp(),
        now.offset().local_minus_utc() / 60,
    )
}

/// Installs a `tracing-subscriber` filter driven by `RUST_LOG`, raised by
/// one level per `-v` flag.
pub fn install_tracing(verbosity: u8) {
    use tracing_subscriber::filter::EnvFilter;

    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
