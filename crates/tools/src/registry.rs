use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::traits::ToolHandler;
use gigi_catalog::Catalog;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("no handler registered for key '{key}' (tool '{tool}')")]
    MissingHandler { key: String, tool: String },
}

/// Name-keyed table of handler implementations, resolved once at startup.
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, key: &str, handler: Arc<dyn ToolHandler>) -> &mut Self {
        self.handlers.insert(key.to_string(), handler);
        self
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn ToolHandler>> {
        self.handlers.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Startup integrity check: every catalog definition must resolve to a
    /// registered handler. A miss is a programming error and callers abort
    /// startup, same as a duplicate catalog name.
    pub fn verify(&self, catalog: &Catalog) -> Result<(), RegistryError> {
        for def in catalog.iter() {
            if !self.handlers.contains_key(def.handler) {
                return Err(RegistryError::MissingHandler {
                    key: def.handler.to_string(),
                    tool: def.name.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
