//! Per-session list of favorite products.

use crate::error::CommerceError;
use crate::ids::ProductId;
use std::collections::HashMap;
use tracing::warn;

/// Storage key holding the JSON array of favorite ids.
pub const FAVORITES_KEY: &str = "favoriteProductsSession";

/// Key-value storage scoped to the browsing session.
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CommerceError>;
}

/// Session storage kept in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CommerceError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// What a favorites operation did, for the notice shown to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    Added,
    Removed,
    Unchanged,
}

/// Ordered, duplicate-free favorites backed by session storage.
#[derive(Debug)]
pub struct Favorites<S: SessionStorage> {
    ids: Vec<ProductId>,
    storage: S,
}

impl<S: SessionStorage> Favorites<S> {
    /// Restore favorites from storage. Missing or unreadable data gives an
    /// empty list.
    pub fn restore(storage: S) -> Self {
        let ids = storage
            .get_item(FAVORITES_KEY)
            .and_then(|raw| match serde_json::from_str::<Vec<ProductId>>(&raw) {
                Ok(ids) => Some(ids),
                Err(e) => {
                    warn!(error = %e, "discarding unreadable favorites");
                    None
                }
            })
            .unwrap_or_default();

        let mut favorites = Self {
            ids: Vec::with_capacity(ids.len()),
            storage,
        };
        for id in ids {
            if !favorites.contains(&id) {
                favorites.ids.push(id);
            }
        }
        favorites
    }

    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.ids.contains(id)
    }

    pub fn add(&mut self, id: impl Into<ProductId>) -> FavoriteChange {
        let id = id.into();
        if self.contains(&id) {
            return FavoriteChange::Unchanged;
        }
        self.ids.push(id);
        self.persist();
        FavoriteChange::Added
    }

    pub fn remove(&mut self, id: &ProductId) -> FavoriteChange {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        if self.ids.len() == before {
            return FavoriteChange::Unchanged;
        }
        self.persist();
        FavoriteChange::Removed
    }

    pub fn toggle(&mut self, id: impl Into<ProductId>) -> FavoriteChange {
        let id = id.into();
        if self.contains(&id) {
            self.remove(&id)
        } else {
            self.add(id)
        }
    }

    /// The `ids` parameter for the favorites lookup.
    pub fn ids_param(&self) -> String {
        self.ids
            .iter()
            .map(ProductId::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.ids)
            .map_err(CommerceError::from)
            .and_then(|json| self.storage.set_item(FAVORITES_KEY, &json));
        if let Err(e) = result {
            warn!(error = %e, "failed to save favorites");
        }
    }
}
