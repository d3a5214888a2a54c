//! Filename-driven correspondence between images, ROI archives and tables

/// Key-based pairing of file sets with FIFO handling of duplicate keys
pub mod correspondence;
/// Canonical sample keys derived from filenames
pub mod key;
/// Directory listing rules per artifact kind
pub mod listing;

pub use correspondence::{Correspondence, FileGroup};
pub use key::{SampleKey, normalize};
