//! Product listing and text search over the catalog.

use crate::catalog::{Category, CategoryTree, Product, SlugRole};
use crate::ids::CategoryId;
use crate::search::{CatalogQuery, SortField, SortOrder};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Run a catalog query.
///
/// With search text, title matches come first, then products filed under a
/// category whose name or slug matches; duplicates keep their first
/// position and at most `limit` products are returned. Without text, the
/// `category` slug narrows the listing and there is no cap.
pub fn search_catalog(
    categories: &[Category],
    products: &[Product],
    query: &CatalogQuery,
    limit: usize,
) -> Vec<Product> {
    let tree = CategoryTree::new(categories);

    match query.text() {
        Some(text) => {
            let needle = text.to_lowercase();
            let by_title = refine(
                &tree,
                products
                    .iter()
                    .filter(|p| p.title.to_lowercase().contains(&needle)),
                query,
            );

            let matched: HashSet<&CategoryId> =
                tree.matching(text).into_iter().map(|c| &c.id).collect();
            let by_category = refine(
                &tree,
                products.iter().filter(|p| {
                    p.category_id
                        .as_ref()
                        .is_some_and(|id| matched.contains(id))
                }),
                query,
            );

            let mut seen = HashSet::new();
            by_title
                .into_iter()
                .chain(by_category)
                .filter(|p| seen.insert(p.id.clone()))
                .take(limit)
                .collect()
        }
        None => {
            let scope = query
                .category
                .as_deref()
                .and_then(|slug| category_scope(&tree, slug));
            refine(
                &tree,
                products.iter().filter(|p| match &scope {
                    Some(ids) => p.category_id.as_ref().is_some_and(|id| ids.contains(id)),
                    None => true,
                }),
                query,
            )
        }
    }
}

/// Category ids a `category` slug restricts the listing to; `None` when the
/// slug is unknown.
fn category_scope<'a>(tree: &CategoryTree<'a>, slug: &str) -> Option<HashSet<&'a CategoryId>> {
    match tree.role_of(slug)? {
        SlugRole::Subcategory(sub) => Some(HashSet::from([&sub.id])),
        SlugRole::Root(root) => {
            let mut ids: HashSet<&CategoryId> =
                tree.children_of(&root.id).into_iter().map(|c| &c.id).collect();
            ids.insert(&root.id);
            Some(ids)
        }
    }
}

/// Apply the price and subcategory filters, then sort.
fn refine<'p, I>(tree: &CategoryTree<'_>, products: I, query: &CatalogQuery) -> Vec<Product>
where
    I: Iterator<Item = &'p Product>,
{
    let mut result: Vec<Product> = products
        .filter(|p| passes_filters(tree, p, query))
        .cloned()
        .collect();
    if let Some((field, order)) = query.sort() {
        sort_products(&mut result, field, order);
    }
    result
}

fn passes_filters(tree: &CategoryTree<'_>, product: &Product, query: &CatalogQuery) -> bool {
    if let Some(min) = query.min_price {
        if !product.base_price.is_some_and(|p| p >= min) {
            return false;
        }
    }
    if let Some(max) = query.max_price {
        if !product.base_price.is_some_and(|p| p <= max) {
            return false;
        }
    }
    if let Some(sub) = query.subcategory.as_deref() {
        let slug = product
            .category_id
            .as_ref()
            .and_then(|id| tree.by_id(id))
            .map(|c| c.slug.as_str());
        if slug != Some(sub) {
            return false;
        }
    }
    true
}

/// Stable sort; products missing the key go last in either direction.
pub fn sort_products(products: &mut [Product], field: SortField, order: SortOrder) {
    products.sort_by(|a, b| {
        let ordering = match field {
            SortField::Title => Some(a.title.to_lowercase().cmp(&b.title.to_lowercase())),
            SortField::BasePrice => compare_present(a.base_price, b.base_price),
            SortField::CreatedAt => {
                compare_present(a.created_at.as_deref(), b.created_at.as_deref())
            }
        };
        match ordering {
            Some(o) if order == SortOrder::Desc => o.reverse(),
            Some(o) => o,
            None => missing_last(&field, a, b),
        }
    });
}

fn compare_present<T: Ord>(a: Option<T>, b: Option<T>) -> Option<Ordering> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => None,
    }
}

fn missing_last(field: &SortField, a: &Product, b: &Product) -> Ordering {
    let has = |p: &Product| match field {
        SortField::Title => true,
        SortField::BasePrice => p.base_price.is_some(),
        SortField::CreatedAt => p.created_at.is_some(),
    };
    has(b).cmp(&has(a))
}
