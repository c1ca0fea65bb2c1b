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

/// Show staged, modified, deleted, and untracked paths
#[derive(clap::Args, Debug)]
pub struct StatusArgs {}

pub fn run(ui: &mut Ui, _args: &StatusArgs) -> Result<(), CommandError> {
    let repo = cli_util::open_repository()?;
    let status = repo.status()?;

    if status.is_clean() {
        ui.println("nothing to commit, working tree clean".to_owned());
        return Ok(());
    }

    print_section(ui, "Staged", &status.staged);
    print_section(ui, "Modified", &status.modified);
    print_section(ui, "Deleted", &status.deleted);
    print_section(ui, "Untracked", &status.untracked);
    Ok(())
}

fn print_section(ui: &mut Ui, label: &str, paths: &std::collections::BTreeSet<String>) {
    if paths.is_empty() {
        return;
    }
    ui.println(format!("{label}:"));
    for path in paths {
        ui.println(format!("    {path}"));
    }
}
