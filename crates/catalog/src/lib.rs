//! Static tool catalog: the single source of truth for what Gigi can do.
//!
//! Every channel sees a filtered view of one shared list, never a forked
//! copy, so a new capability reaches every channel unless explicitly
//! excluded.

pub mod definition;

pub use definition::{ParamKind, ParamSpec, ToolDefinition};

use std::collections::HashMap;
use thiserror::Error;

use gigi_core::Channel;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("duplicate tool name in catalog: {0}")]
    DuplicateName(String),
}

/// Immutable name → definition map, built once at process start.
pub struct Catalog {
    definitions: Vec<ToolDefinition>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds the catalog, refusing duplicate names. A duplicate is a
    /// programming error; callers are expected to abort startup on it.
    pub fn build(definitions: Vec<ToolDefinition>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(definitions.len());
        for (i, def) in definitions.iter().enumerate() {
            if index.insert(def.name.clone(), i).is_some() {
                return Err(CatalogError::DuplicateName(def.name.clone()));
            }
        }
        Ok(Self { definitions, index })
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&i| &self.definitions[i])
    }

    /// Definitions declared for `channel`, in declaration order. This is
    /// the `channels`-set filter only; per-channel override exclusions are
    /// layered on by the policy crate.
    pub fn list_for_channel(&self, channel: Channel) -> Vec<&ToolDefinition> {
        self.definitions
            .iter()
            .filter(|d| d.channels.contains(&channel))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.definitions.iter()
    }
}
