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

mod create;
mod delete;
mod list;
mod rename;

use crate::command_error::CommandError;
use crate::ui::Ui;

/// Create, list, delete, or rename branches
#[derive(clap::Subcommand, Debug)]
pub enum BranchCommands {
    Create(create::CreateArgs),
    List(list::ListArgs),
    Delete(delete::DeleteArgs),
    Rename(rename::RenameArgs),
}

pub fn run(ui: &mut Ui, cmd: BranchCommands) -> Result<(), CommandError> {
    match cmd {
        BranchCommands::Create(args) => create::run(ui, &args),
        BranchCommands::List(args) => list::run(ui, &args),
        BranchCommands::Delete(args) => delete::run(ui, &args),
        BranchCommands::Rename(args) => rename::run(ui, &args),
    }
}
