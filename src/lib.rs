//! Solera — dual-syntax infrastructure configuration front end.
//!
//! Scripted and declarative definition files converge on one canonical
//! resource model, ready for a downstream dependency-graph builder.

pub mod cli;
pub mod core;
