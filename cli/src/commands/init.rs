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

use mintvcs_lib::Repository;

use crate::command_error::CommandError;
use crate::ui::Ui;

/// Create an empty repository in the current directory
#[derive(clap::Args, Debug)]
pub struct InitArgs {}

pub fn run(ui: &mut Ui, _args: &InitArgs) -> Result<(), CommandError> {
    let cwd = std::env::current_dir().map_err(|err| anyhow::anyhow!("cannot read cwd: {err}"))?;
    let repo = Repository::init(&cwd)?;
    ui.println(format!(
        "Initialized empty mintvcs repository in {}",
        repo.work_dir().join(mintvcs_lib::repo::REPO_DIR_NAME).display()
    ));
    Ok(())
}
