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

use mintvcs_lib::MergeOutcome;

use crate::cli_util;
use crate::command_error::CommandError;
use crate::ui::Ui;

/// Merge a branch into the commit HEAD currently resolves to
#[derive(clap::Args, Debug)]
pub struct MergeArgs {
    /// The branch to merge in
    target_branch: String,
}

pub fn run(ui: &mut Ui, args: &MergeArgs) -> Result<(), CommandError> {
    let repo = cli_util::open_repository()?;
    let signature = cli_util::current_signature();
    let outcome = repo.merge(&args.target_branch, &signature, &signature)?;

    match outcome {
        MergeOutcome::AlreadyUpToDate => {
            ui.println("already up to date".to_owned());
        }
        MergeOutcome::Merged { commit, conflicts } => {
            ui.println(format!("created merge commit {commit}"));
            if !conflicts.is_empty() {
                ui.println(format!("{} conflicting path(s):", conflicts.len()));
                for path in &conflicts {
                    ui.println(format!("    {path}"));
                }
            }
        }
    }
    Ok(())
}
