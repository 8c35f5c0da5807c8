//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use std::time::Duration;

use anyhow::Result;
use args::Cli;
use clap::Parser;
use dirowner::{DirOwnerError, Topology};
use tracing::info;

use crate::config::Config;
use crate::output::OutputStyle;

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "DIROWNER_LOG";

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    let topology = Topology::select(cli.extract_only, cli.uid_map.clone())?;
    info!(%topology, "starting");

    if topology.needs_paths() && cli.paths.is_empty() {
        return Err(DirOwnerError::Usage("at least one PATH is required".into()).into());
    }

    // Flags and environment win over the config file
    let ldap = config.ldap_config(&cli.ldap);
    if topology.needs_directory() {
        // Reject a bad endpoint before touching the filesystem or stdin
        ldap.validate()?;
    }
    let connect_timeout = cli
        .ldap
        .connect_timeout
        .or(config.ldap.connect_timeout)
        .map(Duration::from_secs);

    let ctx = commands::Context {
        ldap,
        connect_timeout,
        starttls: cli.ldap.starttls || config.ldap.starttls.unwrap_or(false),
        reader: cli.scan.reader,
        probe: cli.scan.probe.zip(cli.scan.probe_uid),
        output_style: if cli.compact {
            OutputStyle::Compact
        } else {
            OutputStyle::Pretty
        },
    };

    match topology {
        Topology::SingleStage => commands::resolve::execute(ctx, cli.paths).await,
        Topology::ExtractOnly => commands::extract::execute(&ctx, &cli.paths),
        Topology::ResolveOnly(source) => commands::resolve_map::execute(ctx, source).await,
    }
}

/// Process exit status for a failed run.
///
/// Usage errors exit 2 and directory connectivity failures exit 3;
/// anything else exits 1.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    error
        .downcast_ref::<DirOwnerError>()
        .map_or(1, DirOwnerError::exit_code)
        .try_into()
        .unwrap_or(1)
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // stdout is reserved for the JSON document
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
