//! Directory connection configuration.

use std::fmt;

use dirowner_core::{DirOwnerError, Result};
use url::Url;

/// Default directory endpoint
pub const DEFAULT_URL: &str = "ldap://localhost:389";

/// Default bind principal
pub const DEFAULT_BIND_DN: &str = "cn=admin,dc=example,dc=com";

/// Default bind credential
pub const DEFAULT_BIND_PASSWORD: &str = "admin";

/// Default search base
pub const DEFAULT_BASE_DN: &str = "dc=example,dc=com";

/// Everything needed to bind to and search a directory.
///
/// Built once at startup and handed to [`DirectoryClient`](crate::DirectoryClient).
#[derive(Clone, PartialEq, Eq)]
pub struct LdapConfig {
    /// Endpoint URL (`ldap://`, `ldaps://` or `ldapi://`)
    pub url: String,

    /// Distinguished name to bind as
    pub bind_dn: String,

    /// Bind credential
    pub bind_password: String,

    /// Search base distinguished name
    pub base_dn: String,
}

impl Default for LdapConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            bind_dn: DEFAULT_BIND_DN.to_string(),
            bind_password: DEFAULT_BIND_PASSWORD.to_string(),
            base_dn: DEFAULT_BASE_DN.to_string(),
        }
    }
}

impl fmt::Debug for LdapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LdapConfig")
            .field("url", &self.url)
            .field("bind_dn", &self.bind_dn)
            .field("bind_password", &"<redacted>")
            .field("base_dn", &self.base_dn)
            .finish()
    }
}

impl LdapConfig {
    /// Create a configuration with the built-in defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint URL
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the bind principal
    #[must_use]
    pub fn bind_dn(mut self, dn: impl Into<String>) -> Self {
        self.bind_dn = dn.into();
        self
    }

    /// Set the bind credential
    #[must_use]
    pub fn bind_password(mut self, password: impl Into<String>) -> Self {
        self.bind_password = password.into();
        self
    }

    /// Set the search base
    #[must_use]
    pub fn base_dn(mut self, dn: impl Into<String>) -> Self {
        self.base_dn = dn.into();
        self
    }

    /// Check the endpoint scheme and that the DNs are present
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.url)
            .map_err(|e| DirOwnerError::Config(format!("invalid LDAP URL {:?}: {e}", self.url)))?;

        match url.scheme() {
            "ldap" | "ldaps" | "ldapi" => {}
            other => {
                return Err(DirOwnerError::Config(format!(
                    "unsupported LDAP URL scheme {other:?} (expected ldap, ldaps or ldapi)"
                )))
            }
        }

        if self.bind_dn.trim().is_empty() {
            return Err(DirOwnerError::Config("bind DN must not be empty".into()));
        }
        if self.base_dn.trim().is_empty() {
            return Err(DirOwnerError::Config("base DN must not be empty".into()));
        }

        Ok(())
    }
}
