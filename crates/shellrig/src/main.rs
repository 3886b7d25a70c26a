mod cli;
mod commands;
mod error;
mod logging;
mod settings;

use clap::Parser;
use std::process::ExitCode;

use crate::cli::Cli;
use crate::commands::{Context, Status};
use crate::settings::AppSettings;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = AppSettings::load();
    logging::init_logging(settings.debug_logging, cli.verbose, settings.max_log_size_bytes);

    let result = Context::new(cli.home, cli.backup_root, settings).and_then(|context| {
        let mut stdout = std::io::stdout().lock();
        commands::run(cli.command, &context, &mut stdout)
    });

    match result {
        Ok(Status::Clean) => ExitCode::SUCCESS,
        Ok(Status::HadErrors) => ExitCode::from(1),
        Err(error) => {
            log::error!("{error}");
            eprintln!("error: {error}");
            ExitCode::from(2)
        }
    }
}
