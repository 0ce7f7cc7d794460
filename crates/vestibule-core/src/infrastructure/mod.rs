//! Infrastructure layer
//!
//! Concrete backends for the domain seams: REST clients for the managed
//! identity platform and the remote document store, and in-memory twins
//! for tests and offline runs.

pub mod fanout;
pub mod identity;
pub mod memory;
pub mod profile;
