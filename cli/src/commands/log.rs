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

/// Walk the first-parent chain from HEAD
#[derive(clap::Args, Debug)]
pub struct LogArgs {}

pub fn run(ui: &mut Ui, _args: &LogArgs) -> Result<(), CommandError> {
    let repo = cli_util::open_repository()?;
    for commit_id in repo.log()? {
        let body = repo.store().read_commit(&commit_id)?;
        ui.println(format!("commit {commit_id}"));
        ui.println(format!("Author: {}", body.author.identity));
        ui.println(String::new());
        for line in body.message.lines() {
            ui.println(format!("    {line}"));
        }
        ui.println(String::new());
    }
    Ok(())
}
