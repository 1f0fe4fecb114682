mod cli;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use cowcli::prompt::ExecuteError;
use tracing_subscriber::EnvFilter;

/// Exit code when the user answers a confirmation prompt negatively.
const EXIT_USER_DECLINED: i32 = 100;

/// Exit code for any error during execution.
const EXIT_FAILURE: i32 = 200;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = Cli::parse().run() {
        if matches!(
            err.downcast_ref::<ExecuteError>(),
            Some(ExecuteError::UserDeclined)
        ) {
            println!(
                "{}",
                "Nothing was submitted. See you next time!".bright_yellow()
            );
            std::process::exit(EXIT_USER_DECLINED);
        }

        eprintln!("Error: {err:?}");
        std::process::exit(EXIT_FAILURE);
    }
}
