pub use pxp_core::prelude::*;

// vim: ts=4
