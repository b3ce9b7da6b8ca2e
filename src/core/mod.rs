//! Core loading pipeline — diagnostics, traversals, the canonical resource
//! model, and both front ends.

pub mod diag;
pub mod resource;
pub mod schema;
pub mod script;
pub mod traversal;
pub mod version;
