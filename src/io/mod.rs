//! File outputs.

pub mod export;
