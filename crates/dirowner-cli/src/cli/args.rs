//! Command-line argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser};
use dirowner::{ReaderKind, UidMapSource};

/// Map directory ownership to email addresses
///
/// Reads the owning UID of each directory, looks the UID up in LDAP
/// (uidNumber -> mail) and prints a JSON report on stdout:
///
///   {"/data/alice": {"uid": 30001, "email": "alice@example.com"}}
///
/// When this process cannot see true host UIDs (user-namespace remapping),
/// run `resolve --extract-only` on the host and feed its output to
/// `resolve --uid-map -` here.
#[derive(Parser, Debug)]
#[command(name = "resolve")]
#[command(author, version, about, long_about)]
pub struct Cli {
    /// Directories to resolve; keys in the report match these exactly
    #[arg(
        value_name = "PATH",
        required_unless_present = "uid_map",
        conflicts_with = "uid_map"
    )]
    pub paths: Vec<String>,

    /// Only extract owner UIDs and print the intermediate {path: uid} map
    #[arg(long)]
    pub extract_only: bool,

    /// Resolve a UID map written by --extract-only (`-` reads stdin)
    #[arg(long, value_name = "FILE", conflicts_with = "extract_only")]
    pub uid_map: Option<UidMapSource>,

    #[command(flatten)]
    pub ldap: LdapArgs,

    #[command(flatten)]
    pub scan: ScanArgs,

    /// Configuration file (TOML, [ldap] table)
    #[arg(long, env = "DIROWNER_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print single-line JSON instead of indented JSON
    #[arg(long)]
    pub compact: bool,

    /// Log debug detail to stderr
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors to stderr
    #[arg(short, long)]
    pub quiet: bool,
}

// ============================================================================
// Directory service
// ============================================================================

#[derive(Args, Debug, Default)]
pub struct LdapArgs {
    /// Directory endpoint [default: ldap://localhost:389]
    #[arg(long = "ldap-url", env = "LDAP_URL", value_name = "URL")]
    pub url: Option<String>,

    /// Bind principal [default: cn=admin,dc=example,dc=com]
    #[arg(long, env = "LDAP_BIND_DN", value_name = "DN")]
    pub bind_dn: Option<String>,

    /// Bind credential [default: admin]
    #[arg(long = "bind-pass", env = "LDAP_BIND_PASS", value_name = "PASSWORD", hide_env_values = true)]
    pub bind_password: Option<String>,

    /// Search base [default: dc=example,dc=com]
    #[arg(long, env = "LDAP_BASE_DN", value_name = "DN")]
    pub base_dn: Option<String>,

    /// Give up connecting after this many seconds (no limit by default)
    #[arg(long, value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// Upgrade ldap:// connections with StartTLS
    #[arg(long)]
    pub starttls: bool,
}

// ============================================================================
// Owner extraction
// ============================================================================

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// How to read owner UIDs: auto, metadata or stat
    #[arg(long, default_value = "auto", value_name = "READER")]
    pub reader: ReaderKind,

    /// File whose true host owner is known, checked before reading UIDs
    #[arg(long, value_name = "PATH", requires = "probe_uid", conflicts_with = "uid_map")]
    pub probe: Option<String>,

    /// Expected host UID of --probe
    #[arg(long, value_name = "UID", requires = "probe")]
    pub probe_uid: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn paths_are_kept_verbatim() {
        let cli = Cli::try_parse_from(["resolve", "/data/alice/", "./bob"]).unwrap();
        assert_eq!(cli.paths, ["/data/alice/", "./bob"]);
        assert!(!cli.extract_only);
        assert_eq!(cli.scan.reader, ReaderKind::Auto);
    }

    #[test]
    fn paths_are_required_without_uid_map() {
        assert!(Cli::try_parse_from(["resolve"]).is_err());
        assert!(Cli::try_parse_from(["resolve", "--extract-only"]).is_err());

        let cli = Cli::try_parse_from(["resolve", "--uid-map", "-"]).unwrap();
        assert_eq!(cli.uid_map, Some(UidMapSource::Stdin));
    }

    #[test]
    fn stages_are_exclusive() {
        assert!(Cli::try_parse_from(["resolve", "--uid-map", "m.json", "/data"]).is_err());
        assert!(Cli::try_parse_from(["resolve", "--uid-map", "m.json", "--extract-only"]).is_err());
    }

    #[test]
    fn probe_needs_expected_uid() {
        assert!(Cli::try_parse_from(["resolve", "--probe", "/etc/probe", "/data"]).is_err());
        let cli = Cli::try_parse_from(["resolve", "--probe", "/etc/probe", "--probe-uid", "0", "/data"])
            .unwrap();
        assert_eq!(cli.scan.probe_uid, Some(0));
    }
}
