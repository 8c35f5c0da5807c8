//! Data model for the ownership-resolution pipeline.

mod identity;
mod ownership;
mod report;

pub use identity::*;
pub use ownership::*;
pub use report::*;
