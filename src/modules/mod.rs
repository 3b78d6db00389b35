//! Modules layer - Infrastructure components behind the repository traits
//!
//! Contains adapters that are not tied to a single feature, such as the
//! in-memory store.

pub mod memory;
