//! Caller access resolution and scope selection.

pub mod resolver;
pub mod scope;

pub use resolver::{AccessContextResolver, AccessScope, CallerIdentity, ResolveError};
pub use scope::{normalize_scope, Scope, ScopeError};
