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

mod cli_util;
mod command_error;
mod commands;
mod ui;

use clap::Parser as _;

fn main() {
    let cli = commands::Cli::parse();
    cli_util::install_tracing(cli.verbose);

    let mut ui = ui::Ui::for_terminal();
    if let Err(err) = commands::run(&mut ui, cli) {
        ui.eprintln(err.message());
        std::process::exit(err.exit_code());
    }
}
