//! Shared utilities for the md3toobj CLI

pub mod table;

pub use table::*;
