//! Catalog Query Service: product search against the storefront REST API.
//!
//! The service answers `GET {base}/productos/?search=...` with a paginated
//! body whose `results` field holds the matching items. Everything here is
//! UI-agnostic; rendering lives in [`crate::search`].

pub mod http;

pub use http::HttpCatalogService;

use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Catalog service abstraction - the HTTP client and test fakes plug in here
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Search items matching a free-text query
    async fn search(&self, query: &Query, options: &SearchOptions) -> Result<SearchResult, CatalogError>;

    /// List items using only the filters in `options` (no search term)
    async fn browse(&self, options: &SearchOptions) -> Result<SearchResult, CatalogError>;

    /// Fetch a single item by identifier
    async fn item(&self, id: &ItemId) -> Result<Item, CatalogError>;
}

/// A trimmed, non-empty search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Trim `raw`; whitespace-only input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque item identifier. The API sends integers, but nothing here relies on that.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemId(String);

impl ItemId {
    /// `None` for blank identifiers.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog item as returned by the service
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawItem")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Current price; zero when the service has none
    pub price: f64,
    pub category: Option<String>,
}

/// Wire shape of an item. Field names follow the API.
#[derive(Debug, Deserialize)]
struct RawItem {
    id: Value,
    #[serde(default)]
    nombre: Option<String>,
    #[serde(default)]
    descripcion: Option<String>,
    #[serde(default)]
    imagen_url: Option<String>,
    #[serde(default)]
    precio_actual: Value,
    #[serde(default)]
    categoria_id: Value,
    #[serde(default)]
    categoria: Value,
}

impl TryFrom<RawItem> for Item {
    type Error = String;

    fn try_from(raw: RawItem) -> Result<Self, Self::Error> {
        let id = scalar_to_string(&raw.id)
            .and_then(ItemId::new)
            .ok_or_else(|| format!("item id must be a string or number, got {}", raw.id))?;

        Ok(Self {
            id,
            name: raw.nombre.unwrap_or_default(),
            description: raw.descripcion.filter(|d| !d.is_empty()),
            image_url: raw.imagen_url.filter(|u| !u.trim().is_empty()),
            price: parse_price(&raw.precio_actual),
            category: scalar_to_string(&raw.categoria_id).or_else(|| scalar_to_string(&raw.categoria)),
        })
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Prices arrive as JSON numbers or as decimal strings (`"15990.00"`).
fn parse_price(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Ordered items for one query, plus pagination hints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    pub items: Vec<Item>,
    /// Total number of matches (if the service reports it)
    pub total: Option<u64>,
    /// Whether the service advertises a next page
    pub has_more: bool,
}

impl SearchResult {
    /// Decode a response body. A body without `results` is an empty result.
    pub fn from_body(body: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(body)?;

        let items = match value.get("results") {
            None | Some(Value::Null) => Vec::new(),
            Some(results) => Vec::<Value>::deserialize(results)?
                .into_iter()
                .enumerate()
                .filter_map(|(position, raw)| match Item::deserialize(raw) {
                    Ok(item) => Some(item),
                    Err(e) => {
                        // One unusable entry does not sink the listing.
                        tracing::warn!(position, error = %e, "skipping catalog item");
                        None
                    }
                })
                .collect(),
        };

        Ok(Self {
            items,
            total: value.get("count").and_then(Value::as_u64),
            has_more: value.get("next").map(|n| !n.is_null()).unwrap_or(false),
        })
    }
}

/// Sort orders understood by the service's `orden` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::PriceAsc => "precio_asc",
            SortOrder::PriceDesc => "precio_desc",
            SortOrder::NameAsc => "nombre_asc",
            SortOrder::NameDesc => "nombre_desc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "precio_asc" => Some(SortOrder::PriceAsc),
            "precio_desc" => Some(SortOrder::PriceDesc),
            "nombre_asc" => Some(SortOrder::NameAsc),
            "nombre_desc" => Some(SortOrder::NameDesc),
            _ => None,
        }
    }
}

/// Optional filters sent along with a search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub order: Option<SortOrder>,
}

impl SearchOptions {
    /// Query-string pairs for the set filters, in a stable order
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = &self.category {
            pairs.push(("categoria", category.clone()));
        }
        if let Some(brand) = &self.brand {
            pairs.push(("marca", brand.clone()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("precio_min", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("precio_max", max.to_string()));
        }
        if let Some(order) = self.order {
            pairs.push(("orden", order.as_param().to_string()));
        }
        pairs
    }
}

/// Catalog errors. All of them surface to the user as a search failure.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Up to `limit` items sharing `item`'s category, excluding `item` itself.
pub async fn recommendations(
    service: &dyn CatalogService,
    item: &Item,
    limit: usize,
) -> Result<Vec<Item>, CatalogError> {
    let Some(category) = item.category.clone() else {
        return Ok(Vec::new());
    };

    let options = SearchOptions {
        category: Some(category),
        ..SearchOptions::default()
    };
    let result = service.browse(&options).await?;

    Ok(result
        .items
        .into_iter()
        .filter(|candidate| candidate.id != item.id)
        .take(limit)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_rejects_blank_input() {
        assert!(Query::parse("").is_none());
        assert!(Query::parse("   \t\n").is_none());
        assert_eq!(Query::parse("  lamp ").unwrap().as_str(), "lamp");
    }

    #[test]
    fn test_item_without_usable_id_is_skipped() {
        let body = r#"{"results": [
            {"id": 1, "nombre": "Anillo", "precio_actual": "10"},
            {"id": "", "nombre": "Sin id"},
            {"id": null, "nombre": "Nulo"},
            {"nombre": "Ausente"},
            {"id": "x9", "nombre": "Aros", "precio_actual": 5}
        ]}"#;

        let result = SearchResult::from_body(body).unwrap();

        let names: Vec<&str> = result.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Anillo", "Aros"]);
    }

    #[test]
    fn test_results_that_are_not_a_list_fail() {
        let err = SearchResult::from_body(r#"{"results": {"id": 1}}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_missing_results_is_empty() {
        let result = SearchResult::from_body(r#"{"detail": "Not found."}"#).unwrap();
        assert!(result.items.is_empty());

        let result = SearchResult::from_body("[]").unwrap();
        assert!(result.items.is_empty());
    }

    #[test]
    fn test_item_defaults_and_id_forms() {
        let body = r#"{
            "count": 2,
            "next": null,
            "results": [
                {"id": 7, "nombre": "Anillo", "precio_actual": "15990.00", "categoria": 3},
                {"id": "abc", "nombre": "Reloj", "descripcion": "", "imagen_url": null}
            ]
        }"#;
        let result = SearchResult::from_body(body).unwrap();

        assert_eq!(result.total, Some(2));
        assert!(!result.has_more);
        assert_eq!(result.items[0].id.as_str(), "7");
        assert_eq!(result.items[0].price, 15990.0);
        assert_eq!(result.items[0].category.as_deref(), Some("3"));
        assert_eq!(result.items[1].id.as_str(), "abc");
        assert_eq!(result.items[1].price, 0.0);
        assert_eq!(result.items[1].description, None);
        assert_eq!(result.items[1].image_url, None);
    }

    #[test]
    fn test_item_without_id_is_a_parse_error() {
        let err = SearchResult::from_body(r#"{"results": [{"nombre": "x"}]}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_non_json_body_is_a_parse_error() {
        let err = SearchResult::from_body("<html>500</html>").unwrap_err();
        assert!(err.to_string().starts_with("Malformed response"));
    }

    #[test]
    fn test_options_query_pairs() {
        let options = SearchOptions {
            category: Some("3".to_string()),
            max_price: Some(50000.0),
            order: Some(SortOrder::NameDesc),
            ..SearchOptions::default()
        };
        assert_eq!(
            options.query_pairs(),
            vec![
                ("categoria", "3".to_string()),
                ("precio_max", "50000".to_string()),
                ("orden", "nombre_desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_sort_order_param_names() {
        for order in [
            SortOrder::PriceAsc,
            SortOrder::PriceDesc,
            SortOrder::NameAsc,
            SortOrder::NameDesc,
        ] {
            assert_eq!(SortOrder::parse(order.as_param()), Some(order));
        }
        assert_eq!(SortOrder::parse("relevance"), None);
    }
}
