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

use std::path::PathBuf;

use crate::cli_util;
use crate::command_error::CommandError;
use crate::ui::Ui;

/// Compute the object identity of a file, optionally storing it
#[derive(clap::Args, Debug)]
pub struct HashObjectArgs {
    /// Also store the blob in the object store
    #[arg(short = 'w', long)]
    write: bool,

    /// The file to hash
    file: PathBuf,
}

pub fn run(ui: &mut Ui, args: &HashObjectArgs) -> Result<(), CommandError> {
    let content = std::fs::read(&args.file)
        .map_err(|err| anyhow::anyhow!("cannot read {}: {err}", args.file.display()))?;

    let id = if args.write {
        let repo = cli_util::open_repository()?;
        repo.hash_object_write(&content)?
    } else {
        // `hash_object` without `-w` should still work outside a repository,
        // so this path never touches the object store.
        mintvcs_lib::hasher::hash_bytes(&mintvcs_lib::objects::encode_blob(&content))
    };
    ui.println(id.to_string());
    Ok(())
}
