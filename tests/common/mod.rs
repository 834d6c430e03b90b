//! Common test utilities: in-memory services and sample API bodies

#![allow(dead_code)]

use std::sync::Mutex;
use tienda::cart::{CartError, CartService};
use tienda::catalog::{
    CatalogError, CatalogService, Item, ItemId, Query, SearchOptions, SearchResult,
};
use tienda::search::CardLinks;

pub const SITE: &str = "https://joyeria.test";
pub const PLACEHOLDER: &str = "https://joyeria.test/static/images/no-image.jpg";

/// Card links matching [`SITE`]
pub fn links() -> CardLinks {
    CardLinks {
        site_base_url: SITE.to_string(),
        placeholder_image: PLACEHOLDER.to_string(),
    }
}

pub fn id(raw: &str) -> ItemId {
    ItemId::new(raw).expect("valid item id")
}

/// Build an item with the fields tests care about
pub fn item(raw_id: &str, name: &str, price: f64, category: Option<&str>) -> Item {
    Item {
        id: id(raw_id),
        name: name.to_string(),
        description: Some(format!("Descripción de {name}")),
        image_url: Some(format!("{SITE}/media/{raw_id}.jpg")),
        price,
        category: category.map(str::to_string),
    }
}

/// A call observed by [`FakeCatalog`]
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogCall {
    Search(String, SearchOptions),
    Browse(SearchOptions),
    Item(String),
}

/// In-memory catalog. Searches return every item; browsing filters by category.
pub struct FakeCatalog {
    items: Vec<Item>,
    failure: Option<String>,
    calls: Mutex<Vec<CatalogCall>>,
}

impl FakeCatalog {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every request fails with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            items: Vec::new(),
            failure: Some(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<CatalogCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: CatalogCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_failure(&self) -> Result<(), CatalogError> {
        match &self.failure {
            Some(message) => Err(CatalogError::Other(anyhow::anyhow!(message.clone()))),
            None => Ok(()),
        }
    }

    fn result(items: Vec<Item>) -> SearchResult {
        SearchResult {
            total: Some(items.len() as u64),
            items,
            has_more: false,
        }
    }
}

#[async_trait::async_trait]
impl CatalogService for FakeCatalog {
    async fn search(
        &self,
        query: &Query,
        options: &SearchOptions,
    ) -> Result<SearchResult, CatalogError> {
        self.record(CatalogCall::Search(
            query.as_str().to_string(),
            options.clone(),
        ));
        self.check_failure()?;
        Ok(Self::result(self.items.clone()))
    }

    async fn browse(&self, options: &SearchOptions) -> Result<SearchResult, CatalogError> {
        self.record(CatalogCall::Browse(options.clone()));
        self.check_failure()?;
        let items = self
            .items
            .iter()
            .filter(|item| match &options.category {
                Some(category) => item.category.as_ref() == Some(category),
                None => true,
            })
            .cloned()
            .collect();
        Ok(Self::result(items))
    }

    async fn item(&self, item_id: &ItemId) -> Result<Item, CatalogError> {
        self.record(CatalogCall::Item(item_id.to_string()));
        self.check_failure()?;
        self.items
            .iter()
            .find(|item| &item.id == item_id)
            .cloned()
            .ok_or_else(|| CatalogError::Status {
                status: 404,
                body: r#"{"detail":"No encontrado."}"#.to_string(),
            })
    }
}

/// In-memory cart that accepts everything, or rejects with a status
pub struct FakeCart {
    reject_with: Option<u16>,
    added: Mutex<Vec<String>>,
}

impl FakeCart {
    pub fn accepting() -> Self {
        Self {
            reject_with: None,
            added: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(status: u16) -> Self {
        Self {
            reject_with: Some(status),
            added: Mutex::new(Vec::new()),
        }
    }

    pub fn added(&self) -> Vec<String> {
        self.added.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CartService for FakeCart {
    async fn add(&self, item: &ItemId) -> Result<(), CartError> {
        self.added.lock().unwrap().push(item.to_string());
        match self.reject_with {
            Some(status) => Err(CartError::AddFailed { status }),
            None => Ok(()),
        }
    }
}

/// Paginated listing body as the storefront API returns it
pub fn listing_body(items: &[(u64, &str, &str)]) -> String {
    let results: Vec<serde_json::Value> = items
        .iter()
        .map(|(id, name, price)| {
            serde_json::json!({
                "id": id,
                "nombre": name,
                "descripcion": format!("{name} de plata"),
                "imagen_url": null,
                "precio_actual": price,
                "categoria_id": 3,
            })
        })
        .collect();

    serde_json::json!({
        "count": items.len(),
        "next": null,
        "previous": null,
        "results": results,
    })
    .to_string()
}
