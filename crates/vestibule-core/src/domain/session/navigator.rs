//! Navigation seam
//!
//! Operations trigger a post-success route change; the actual routing
//! machinery belongs to the UI layer and is injected through this trait.

use std::fmt;

/// Destination of a post-operation navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The signed-in landing view, navigated to after register and login
    Landing,
    /// The root view, navigated to after logout
    Root,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Landing => write!(f, "landing"),
            Self::Root => write!(f, "root"),
        }
    }
}

/// Receiver of post-operation navigation requests
pub trait Navigator: Send + Sync {
    /// Request a route change
    fn navigate(&self, route: Route);
}

/// Navigator that drops every request, for consumers without routing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNavigator;

impl Navigator for NullNavigator {
    fn navigate(&self, _route: Route) {}
}
