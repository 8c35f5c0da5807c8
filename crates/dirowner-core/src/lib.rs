//! Core types and traits for directory ownership resolution.
//!
//! This crate provides the foundational types used across the dirowner crates:
//!
//! - **Types**: ownership records, identity records and the final [`Report`]
//! - **Artifacts**: the intermediate [`UidMap`] exchanged between stages
//! - **Traits**: [`DirectoryLookup`], the seam between the pipeline and a
//!   directory service
//! - **Errors**: error handling with [`DirOwnerError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use dirowner_core::{IdentityRecord, LookupOutcome, OwnershipRecord, Report};
//!
//! let owner = OwnershipRecord::new("/data/alice", 30001);
//! let identity = IdentityRecord::new(30001, LookupOutcome::Found("alice@example.com".into()));
//!
//! let mut report = Report::new();
//! report.insert(owner.join(identity));
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

mod error;
mod lookup;
pub mod types;

pub use error::{DirOwnerError, Result};
pub use lookup::DirectoryLookup;
pub use types::*;
