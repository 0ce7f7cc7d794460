//! Profile store implementations

pub mod rest;

pub use rest::RestProfileStore;
