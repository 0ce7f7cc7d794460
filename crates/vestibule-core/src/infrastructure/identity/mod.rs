//! Identity provider implementations

pub mod rest;

pub use rest::RestIdentityProvider;
