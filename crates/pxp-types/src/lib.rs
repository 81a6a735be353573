//! Shared types, adapter traits, and core utilities for the PXP platform.
//!
//! This crate contains the foundational types that are shared between the
//! core crate and the storage adapter implementations, so adapters can be
//! built without pulling in the HTTP layer.

pub mod error;
pub mod meta_adapter;
pub mod prelude;
pub mod types;

// vim: ts=4
