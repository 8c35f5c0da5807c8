//! resolve - map directory owners to email addresses
//!
//! Reads owner UIDs from the filesystem, looks them up in LDAP and prints a
//! JSON report on stdout. Diagnostics go to stderr.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match dirowner_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("resolve: {error:#}");
            ExitCode::from(dirowner_cli::exit_code(&error))
        }
    }
}
