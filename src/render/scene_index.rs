//! Side table from engine node handles to brand items.
//!
//! Nothing else in the crate maps scene nodes back to domain data. Lookups
//! walk up the containment chain, so a hit on any sub-part of a registered
//! composite resolves to the composite's item.

use std::collections::HashMap;
use std::sync::Arc;

use super::scene::{NodeHandle, SceneHierarchy};
use crate::catalog::BrandItem;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("handle {handle:?} is already bound to {existing:?}, cannot bind it to {requested:?}")]
    Conflict {
        handle: NodeHandle,
        existing: String,
        requested: String,
    },
}

#[derive(Debug, Default, Clone)]
pub struct SceneIndex {
    by_handle: HashMap<NodeHandle, Arc<BrandItem>>,
    by_item: HashMap<String, Vec<NodeHandle>>,
}

impl SceneIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handle` to `item`. Re-binding to the same item is a no-op;
    /// binding to a different item is refused.
    pub fn register(&mut self, handle: NodeHandle, item: Arc<BrandItem>) -> Result<(), IndexError> {
        if let Some(existing) = self.by_handle.get(&handle) {
            if existing.id == item.id {
                return Ok(());
            }
            return Err(IndexError::Conflict {
                handle,
                existing: existing.id.clone(),
                requested: item.id.clone(),
            });
        }
        self.by_item.entry(item.id.clone()).or_default().push(handle);
        self.by_handle.insert(handle, item);
        Ok(())
    }

    /// Item bound to `handle` exactly, without walking.
    pub fn lookup_exact(&self, handle: NodeHandle) -> Option<&Arc<BrandItem>> {
        self.by_handle.get(&handle)
    }

    /// Item bound to `handle` or its nearest registered ancestor.
    pub fn lookup(&self, hierarchy: &dyn SceneHierarchy, handle: NodeHandle) -> Option<Arc<BrandItem>> {
        let mut current = Some(handle);
        // Bounded in case the hierarchy has a cycle
        for _ in 0..=hierarchy.node_count() {
            let h = current?;
            if let Some(item) = self.by_handle.get(&h) {
                return Some(item.clone());
            }
            current = hierarchy.parent(h);
        }
        None
    }

    pub fn handles_for(&self, item_id: &str) -> &[NodeHandle] {
        self.by_item.get(item_id).map_or(&[], Vec::as_slice)
    }

    pub fn unregister_all(&mut self) {
        self.by_handle.clear();
        self.by_item.clear();
    }

    /// Number of registered handles.
    pub fn len(&self) -> usize {
        self.by_handle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_handle.is_empty()
    }

    /// Number of distinct items with at least one handle.
    pub fn item_count(&self) -> usize {
        self.by_item.len()
    }
}
