//! Tool handlers and the handler registry.
//!
//! Each tool Gigi exposes is one handler behind the [`ToolHandler`] trait.
//! The catalog's definitions reference handlers by string key; the
//! registry resolves those keys once at startup and is verified against
//! the catalog before anything is dispatched.

pub mod builtin;
pub mod handlers;
pub mod registry;
pub mod traits;

pub use builtin::{build_registry, builtin_definitions, Resources};
pub use registry::{HandlerRegistry, RegistryError};
pub use traits::ToolHandler;
