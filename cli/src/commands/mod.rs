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

//! Subcommand argument parsing and dispatch.

mod add;
mod branch;
mod checkout;
mod commit;
mod hash_object;
mod init;
mod log;
mod merge;
mod status;

use crate::command_error::CommandError;
use crate::ui::Ui;

/// A local, content-addressed version control tool.
#[derive(clap::Parser, Debug)]
#[command(name = "mintvcs", version)]
pub struct Cli {
    /// Raise the tracing filter level; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    Init(init::InitArgs),
    HashObject(hash_object::HashObjectArgs),
    Add(add::AddArgs),
    Commit(commit::CommitArgs),
    Log(log::LogArgs),
    Status(status::StatusArgs),
    Checkout(checkout::CheckoutArgs),
    #[command(subcommand)]
    Branch(branch::BranchCommands),
    Merge(merge::MergeArgs),
}

/// Dispatches a parsed [`Cli`] to its command implementation.
pub fn run(ui: &mut Ui, cli: Cli) -> Result<(), CommandError> {
    match cli.command {
        Commands::Init(args) => init::run(ui, &args),
        Commands::HashObject(args) => hash_object::run(ui, &args),
        Commands::Add(args) => add::run(ui, &args),
        Commands::Commit(args) => commit::run(ui, &args),
        Commands::Log(args) => log::run(ui, &args),
        Commands::Status(args) => status::run(ui, &args),
        Commands::Checkout(args) => checkout::run(ui, &args),
        Commands::Branch(cmd) => branch::run(ui, cmd),
        Commands::Merge(args) => merge::run(ui, &args),
    }
}
