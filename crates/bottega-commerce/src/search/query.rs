//! Catalog page query parameters.

use crate::variant::form_decode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Field to sort products by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Title,
    BasePrice,
    CreatedAt,
}

impl SortField {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "title" => Some(SortField::Title),
            "base_price" => Some(SortField::BasePrice),
            "created_at" => Some(SortField::CreatedAt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::BasePrice => "base_price",
            SortField::CreatedAt => "created_at",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortField::Title => "Nome",
            SortField::BasePrice => "Prezzo",
            SortField::CreatedAt => "Novità",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `desc` is descending; anything else ascends.
    pub fn parse(s: &str) -> Self {
        if s == "desc" {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Filters and ordering requested by the catalog page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Root or subcategory slug.
    pub category: Option<String>,
    /// Subcategory slug.
    pub subcategory: Option<String>,
    /// Free-text search.
    pub q: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
}

impl CatalogQuery {
    /// Build a query from decoded `(name, value)` parameters.
    ///
    /// Empty values and `all` mean unset. Prices that do not parse are
    /// ignored, as are unknown parameters and sort fields.
    pub fn from_params<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = Self::default();
        for (name, value) in params {
            let value = value.trim();
            if value.is_empty() || value == "all" {
                continue;
            }
            match name {
                "category" => query.category = Some(value.to_string()),
                "subcategory" => query.subcategory = Some(value.to_string()),
                "q" => query.q = Some(value.to_string()),
                "minPrice" => query.min_price = Decimal::from_str(value).ok(),
                "maxPrice" => query.max_price = Decimal::from_str(value).ok(),
                "sortBy" => query.sort_by = SortField::parse(value),
                "sortOrder" => query.sort_order = Some(SortOrder::parse(value)),
                _ => {}
            }
        }
        query
    }

    /// Parse a raw `a=1&b=2` query string.
    pub fn from_query_string(raw: &str) -> Self {
        let decoded: Vec<(String, String)> = raw
            .trim_start_matches('?')
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((k, v)) => (form_decode(k), form_decode(v)),
                None => (form_decode(pair), String::new()),
            })
            .collect();
        Self::from_params(decoded.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// The trimmed search text, when there is any.
    pub fn text(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    /// Sorting applies only when both field and direction are given.
    pub fn sort(&self) -> Option<(SortField, SortOrder)> {
        self.sort_by.zip(self.sort_order)
    }

    pub fn with_text(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    pub fn with_category(mut self, slug: impl Into<String>) -> Self {
        self.category = Some(slug.into());
        self
    }

    pub fn with_subcategory(mut self, slug: impl Into<String>) -> Self {
        self.subcategory = Some(slug.into());
        self
    }

    pub fn with_price_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn sorted(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = Some(field);
        self.sort_order = Some(order);
        self
    }
}
