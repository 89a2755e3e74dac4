//! OPAC metadata acquisition pipeline
//!
//! Turns a raw ISBN string into a storage-ready [`crate::models::Book`]:
//!
//! 1. [`isbn`] canonicalizes and checksum-validates the input,
//! 2. [`fetcher`] runs the two-phase HTTP lookup against the National
//!    Library of China OPAC and returns raw HTML,
//! 3. [`parser`] extracts a flat label/value table from the markup into
//!    [`parser::RawMetadata`],
//! 4. [`normalizer`] maps the parsed fields onto the fixed book schema.
//!
//! The pipeline is stateless; orchestration and persistence live in
//! [`crate::services::acquisition`].

pub mod fetcher;
pub mod headers;
pub mod isbn;
pub mod normalizer;
pub mod parser;

pub use fetcher::{FetchError, MetadataSource, OpacClient};
pub use parser::RawMetadata;
