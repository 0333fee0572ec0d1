//! Entry point for the `turnstile` CLI. Parses arguments, dispatches to the
//! command layer, and maps the outcome to an exit code: the wrapped
//! command's own code on success, turnstile's error codes otherwise.

use std::process::ExitCode;
use turnstile::cli::Cli;
use turnstile::commands;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match commands::dispatch(cli.command) {
        Ok(code) => ExitCode::from(code.clamp(0, 255) as u8),
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(err.exit_code().clamp(0, 255) as u8)
        }
    }
}
