//! Authenticated LDAP directory client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dirowner_core::{DirOwnerError, DirectoryLookup, LookupOutcome, Result};
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Scope, SearchEntry};
use tracing::{debug, warn};

use crate::config::LdapConfig;

/// Attribute holding the email address
pub const MAIL_ATTRIBUTE: &str = "mail";

/// Attribute holding the numeric UID
const UID_NUMBER_ATTRIBUTE: &str = "uidNumber";

/// Filter matching every entry, used for the base-level preflight
const PREFLIGHT_FILTER: &str = "(objectClass=*)";

/// "No attributes" marker from RFC 4511
const NO_ATTRIBUTES: &str = "1.1";

/// Search filter selecting entries whose numeric UID equals `uid`
#[must_use]
pub fn uid_filter(uid: u32) -> String {
    format!("({UID_NUMBER_ATTRIBUTE}={uid})")
}

/// Parameters of one directory search
struct SearchSpec<'a> {
    base: &'a str,
    scope: Scope,
    filter: String,
    attrs: Vec<&'static str>,
}

impl<'a> SearchSpec<'a> {
    /// Base-level read of the search base itself, returning no attributes
    fn preflight(base_dn: &'a str) -> Self {
        Self {
            base: base_dn,
            scope: Scope::Base,
            filter: PREFLIGHT_FILTER.to_string(),
            attrs: vec![NO_ATTRIBUTES],
        }
    }

    /// Subtree search for entries owning `uid`, returning only their mail
    fn uid(base_dn: &'a str, uid: u32) -> Self {
        Self {
            base: base_dn,
            scope: Scope::Subtree,
            filter: uid_filter(uid),
            attrs: vec![MAIL_ATTRIBUTE],
        }
    }

    async fn run(self, ldap: &mut Ldap) -> ldap3::result::Result<Vec<SearchEntry>> {
        let (entries, _) = ldap
            .search(self.base, self.scope, &self.filter, self.attrs)
            .await?
            .success()?;
        Ok(entries.into_iter().map(SearchEntry::construct).collect())
    }
}

/// Connection to an LDAP-compatible directory.
///
/// One connection is opened and bound per client and shared by every
/// search; cloning the client shares the connection.
#[derive(Clone)]
pub struct DirectoryClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    ldap: Ldap,
    config: LdapConfig,
}

impl DirectoryClient {
    /// Create a builder for custom connection settings
    #[must_use]
    pub fn builder(config: LdapConfig) -> DirectoryClientBuilder {
        DirectoryClientBuilder::new(config)
    }

    /// Search for `uid` and report what was found.
    ///
    /// Only the first matching entry is considered.
    pub async fn find_email(&self, uid: u32) -> Result<LookupOutcome> {
        let search = SearchSpec::uid(&self.inner.config.base_dn, uid);
        debug!(base = search.base, filter = %search.filter, "searching directory");

        let mut ldap = self.inner.ldap.clone();
        let entries = search
            .run(&mut ldap)
            .await
            .map_err(|e| DirOwnerError::Search(e.to_string()))?;

        Ok(outcome_from_entries(entries.into_iter()))
    }

    /// Close the connection politely
    pub async fn unbind(&self) -> Result<()> {
        let mut ldap = self.inner.ldap.clone();
        ldap.unbind()
            .await
            .map_err(|e| DirOwnerError::Search(format!("unbind failed: {e}")))
    }
}

#[async_trait]
impl DirectoryLookup for DirectoryClient {
    async fn preflight(&self) -> Result<()> {
        let config = &self.inner.config;
        debug!(url = %config.url, base = %config.base_dn, "directory preflight");

        let mut ldap = self.inner.ldap.clone();
        SearchSpec::preflight(&config.base_dn)
            .run(&mut ldap)
            .await
            .map(|_| ())
            .map_err(|e| DirOwnerError::Connectivity {
                url: config.url.clone(),
                reason: format!("base search on {} failed: {e}", config.base_dn),
            })
    }

    async fn lookup(&self, uid: u32) -> LookupOutcome {
        match self.find_email(uid).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(uid, error = %e, "directory query failed");
                LookupOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Reduce search results to a lookup outcome, consuming at most one entry
fn outcome_from_entries(mut entries: impl Iterator<Item = SearchEntry>) -> LookupOutcome {
    let Some(entry) = entries.next() else {
        return LookupOutcome::NoEntry;
    };

    entry
        .attrs
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(MAIL_ATTRIBUTE))
        .and_then(|(_, values)| values.first())
        .filter(|mail| !mail.is_empty())
        .map_or(LookupOutcome::EntryWithoutEmail, |mail| {
            LookupOutcome::Found(mail.clone())
        })
}

/// Builder for configuring a [`DirectoryClient`]
pub struct DirectoryClientBuilder {
    config: LdapConfig,
    connect_timeout: Option<Duration>,
    starttls: bool,
}

impl DirectoryClientBuilder {
    /// Create a new builder for the given configuration
    #[must_use]
    pub const fn new(config: LdapConfig) -> Self {
        Self {
            config,
            connect_timeout: None,
            starttls: false,
        }
    }

    /// Bound the time spent establishing the TCP/TLS connection.
    ///
    /// Unset by default: the surrounding scheduler owns wall-clock limits.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Upgrade a plain `ldap://` connection with StartTLS
    #[must_use]
    pub const fn starttls(mut self, enabled: bool) -> Self {
        self.starttls = enabled;
        self
    }

    /// Open the connection and perform the authenticated bind.
    ///
    /// # Errors
    ///
    /// [`DirOwnerError::Config`] for an unusable configuration,
    /// [`DirOwnerError::Connectivity`] if the endpoint cannot be reached and
    /// [`DirOwnerError::Bind`] if the credentials are rejected.
    pub async fn connect(self) -> Result<DirectoryClient> {
        self.config.validate()?;

        let mut settings = LdapConnSettings::new().set_starttls(self.starttls);
        if let Some(timeout) = self.connect_timeout {
            settings = settings.set_conn_timeout(timeout);
        }

        debug!(url = %self.config.url, "connecting to directory");
        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &self.config.url)
            .await
            .map_err(|e| DirOwnerError::Connectivity {
                url: self.config.url.clone(),
                reason: e.to_string(),
            })?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "directory connection terminated");
            }
        });

        let bind = ldap
            .simple_bind(&self.config.bind_dn, &self.config.bind_password)
            .await
            .map_err(|e| DirOwnerError::Connectivity {
                url: self.config.url.clone(),
                reason: e.to_string(),
            })?;
        bind.success().map_err(|e| DirOwnerError::Bind {
            bind_dn: self.config.bind_dn.clone(),
            reason: e.to_string(),
        })?;
        debug!(bind_dn = %self.config.bind_dn, "bound to directory");

        Ok(DirectoryClient {
            inner: Arc::new(ClientInner {
                ldap,
                config: self.config,
            }),
        })
    }
}
