//! Network and decoding helpers used by the byte sources.

pub mod fetch;
pub mod image;
