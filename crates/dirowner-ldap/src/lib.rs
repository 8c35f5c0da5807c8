//! LDAP directory client for UID to email resolution.
//!
//! This crate provides [`DirectoryClient`], an authenticated connection to an
//! LDAP-compatible directory implementing
//! [`DirectoryLookup`](dirowner_core::DirectoryLookup), and
//! [`StaticDirectory`], an in-memory directory with the same interface.

#![doc(html_root_url = "https://docs.rs/dirowner-ldap/0.3.0")]

mod client;
mod config;
mod memory;

pub use client::{uid_filter, DirectoryClient, DirectoryClientBuilder, MAIL_ATTRIBUTE};
pub use config::*;
pub use dirowner_core::{DirOwnerError, DirectoryLookup, LookupOutcome, Result};
pub use memory::StaticDirectory;
