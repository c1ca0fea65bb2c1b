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

use crate::cli_util;
use crate::command_error::CommandError;
use crate::ui::Ui;

/// Rename a branch (refusing the branch HEAD currently points at)
#[derive(clap::Args, Debug)]
pub struct RenameArgs {
    old_name: String,
    new_name: String,
}

pub fn run(ui: &mut Ui, args: &RenameArgs) -> Result<(), CommandError> {
    let repo = cli_util::open_repository()?;
    repo.branch_rename(&args.old_name, &args.new_name)?;
    ui.println(format!(
        "renamed branch {} to {}",
        args.old_name, args.new_name
    ));
    Ok(())
}
