//! Category types for product organization.
//!
//! The storefront uses a two-level hierarchy: root categories and their
//! direct subcategories.

use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
    /// URL-friendly slug.
    pub slug: String,
    /// Category description.
    #[serde(default)]
    pub description: Option<String>,
    /// Parent category ID (None for root categories).
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Category {
    /// Create a new root category.
    pub fn new_root(
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            description: None,
            parent_id: None,
            created_at: None,
        }
    }

    /// Create a new child category.
    pub fn new_child(
        parent: &Category,
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        let mut child = Self::new_root(id, name, slug);
        child.parent_id = Some(parent.id.clone());
        child
    }

    /// Check if this is a root category.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A root category together with its direct subcategories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup<'a> {
    pub root: &'a Category,
    pub subcategories: Vec<&'a Category>,
}

/// What a category slug refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlugRole<'a> {
    Root(&'a Category),
    Subcategory(&'a Category),
}

/// Read-only view over a flat category list.
#[derive(Debug, Clone, Copy)]
pub struct CategoryTree<'a> {
    categories: &'a [Category],
}

impl<'a> CategoryTree<'a> {
    pub fn new(categories: &'a [Category]) -> Self {
        Self { categories }
    }

    /// Group categories as roots with their children, preserving order.
    pub fn groups(&self) -> Vec<CategoryGroup<'a>> {
        self.categories
            .iter()
            .filter(|c| c.is_root())
            .map(|root| CategoryGroup {
                root,
                subcategories: self.children_of(&root.id),
            })
            .collect()
    }

    pub fn children_of(&self, id: &CategoryId) -> Vec<&'a Category> {
        self.categories
            .iter()
            .filter(|c| c.parent_id.as_ref() == Some(id))
            .collect()
    }

    pub fn by_slug(&self, slug: &str) -> Option<&'a Category> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    pub fn by_id(&self, id: &CategoryId) -> Option<&'a Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    /// Resolve a slug to its role in the hierarchy.
    pub fn role_of(&self, slug: &str) -> Option<SlugRole<'a>> {
        self.by_slug(slug).map(|c| {
            if c.is_root() {
                SlugRole::Root(c)
            } else {
                SlugRole::Subcategory(c)
            }
        })
    }

    /// The slug itself plus the slugs of its direct children.
    pub fn family_slugs(&self, root: &Category) -> Vec<&'a str> {
        self.categories
            .iter()
            .filter(|c| c.id == root.id || c.parent_id.as_ref() == Some(&root.id))
            .map(|c| c.slug.as_str())
            .collect()
    }

    /// Categories whose name or slug contains `needle` (case-insensitive).
    pub fn matching(&self, needle: &str) -> Vec<&'a Category> {
        let needle = needle.to_lowercase();
        self.categories
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle) || c.slug.to_lowercase().contains(&needle)
            })
            .collect()
    }
}
