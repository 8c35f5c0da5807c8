//! Directory validation and owner UID extraction.
//!
//! This crate covers the filesystem half of the pipeline:
//!
//! - [`validate`] filters caller-supplied paths down to existing directories
//! - [`reader`] reads the owning UID through an [`OwnerUidReader`]
//! - [`Extractor`] turns a validated path into an
//!   [`OwnershipRecord`](dirowner_core::OwnershipRecord)
//!
//! Nothing here contacts a directory service, so extraction can run alone
//! on a host whose UIDs are not visible from the resolving context.

#![doc(html_root_url = "https://docs.rs/dirowner-scan/0.3.0")]

mod error;
mod extract;
pub mod reader;
pub mod validate;

pub use error::{ScanError, ScanResult};
pub use extract::Extractor;
pub use reader::{FallbackReader, MetadataReader, OwnerUidReader, ReaderKind, StatCommandReader};
pub use validate::{validate_path, validate_paths, SkippedPath, Validation};
