//! Resolve directory ownership (numeric UIDs) to email addresses through LDAP.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dirowner::{DirectoryClient, Extractor, LdapConfig, ReaderKind, Resolver};
//!
//! #[tokio::main]
//! async fn main() -> dirowner::Result<()> {
//!     let client = DirectoryClient::builder(LdapConfig::default()).connect().await?;
//!     let mut resolver = Resolver::connect(client).await?;
//!     let extractor = Extractor::new(ReaderKind::Auto.build());
//!
//!     let report = dirowner::single_stage(&extractor, &mut resolver, ["/data/alice"]).await?;
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!     Ok(())
//! }
//! ```
//!
//! # Topologies
//!
//! When the resolving process cannot see true host UIDs (for example inside
//! a user-namespace-remapped container), split the run in two:
//!
//! 1. On the host: [`extract_stage`] produces a [`UidMap`]
//! 2. Anywhere: [`resolve_stage`] turns that map into a [`Report`]
//!
//! Both halves use the same [`Resolver`], so the final report is identical
//! to a [`single_stage`] run given the same UIDs and directory contents.
//!
//! # Features
//!
//! - `default` - Uses rustls for `ldaps://` and StartTLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/dirowner/0.3.0")]

mod pipeline;
mod topology;

pub use pipeline::{extract_stage, resolve_stage, single_stage, Resolver};
pub use topology::{probe_visibility, Topology, UidMapSource};

// Re-export core types
pub use dirowner_core::*;

// Re-export the filesystem and directory halves
pub use dirowner_ldap::{DirectoryClient, DirectoryClientBuilder, LdapConfig, StaticDirectory};
pub use dirowner_scan::{
    Extractor, FallbackReader, MetadataReader, OwnerUidReader, ReaderKind, ScanError,
    StatCommandReader,
};

// Re-export runtime for convenience
pub use serde_json;
pub use tokio;
