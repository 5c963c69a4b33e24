//! Utility functions for link keys and request handling.
//!
//! - [`key_codec`] - Key normalization for case-sensitive and case-insensitive domains
//! - [`extract_domain`] - Domain extraction from HTTP headers

pub mod extract_domain;
pub mod key_codec;
