//! Command implementations, one per topology.

pub mod extract;
pub mod resolve;
pub mod resolve_map;

use std::time::Duration;

use anyhow::Result;
use dirowner::{
    probe_visibility, DirectoryClient, Extractor, LdapConfig, OwnerUidReader, ReaderKind, Resolver,
};
use tracing::info;

use crate::output::OutputStyle;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory connection settings
    pub ldap: LdapConfig,

    /// Connection timeout, if any
    pub connect_timeout: Option<Duration>,

    /// Whether to negotiate StartTLS
    pub starttls: bool,

    /// Owner UID reader selection
    pub reader: ReaderKind,

    /// Visibility probe: a file and its expected host UID
    pub probe: Option<(String, u32)>,

    /// JSON layout on stdout
    pub output_style: OutputStyle,
}

impl Context {
    /// Connect, bind and run the preflight.
    ///
    /// Any failure here aborts the run before output is produced.
    pub async fn resolver(&self) -> Result<Resolver<DirectoryClient>> {
        let mut builder = DirectoryClient::builder(self.ldap.clone()).starttls(self.starttls);
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        let client = builder.connect().await?;
        let resolver = Resolver::connect(client).await?;
        info!(url = %self.ldap.url, base = %self.ldap.base_dn, "directory reachable");
        Ok(resolver)
    }

    /// Build the extractor, checking UID visibility first when a probe is set
    pub fn extractor(&self) -> Result<Extractor> {
        let reader = self.reader.build();
        if let Some((probe, expected)) = &self.probe {
            probe_visibility(reader.as_ref(), probe, *expected)?;
            info!(probe = %probe, uid = expected, reader = reader.name(), "host UIDs visible");
        }
        Ok(Extractor::new(reader))
    }
}
