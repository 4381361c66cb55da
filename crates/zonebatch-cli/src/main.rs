use zonebatch_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Workers launched by `check` log to the same file as the driver.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("zonebatch error: {:#}", err);
        std::process::exit(1);
    }
}
