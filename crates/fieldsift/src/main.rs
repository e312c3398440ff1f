use std::process::ExitCode;

use clap::Parser;
use fieldsift::{cli::Cli, logger, run};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let stdout = std::io::stdout();
    match run(cli, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
