use crate::catalog::{CatalogError, CatalogService, Item, ItemId, Query, SearchOptions, SearchResult};
use crate::session::StoreSession;
use reqwest::{Client, Url};

/// Catalog client for the storefront REST API
///
/// Endpoints:
/// - `GET {base}/productos/?search={query}&...filters` (paginated listing)
/// - `GET {base}/productos/{id}/` (single item)
pub struct HttpCatalogService {
    client: Client,
    api_base: String,
}

impl HttpCatalogService {
    pub fn new(session: &StoreSession, api_base: impl Into<String>) -> Self {
        Self {
            client: session.client().clone(),
            api_base: api_base.into(),
        }
    }

    /// Build a client without a shared session (plain `reqwest::Client`)
    pub fn with_client(client: Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        build_api_url(&self.api_base, path)
    }

    /// `productos/{id}/` with the id as a single escaped path segment
    fn item_url(&self, id: &ItemId) -> Result<Url, CatalogError> {
        let mut url = self.endpoint("productos/")?;
        url.path_segments_mut()
            .map_err(|_| CatalogError::InvalidUrl(format!("{} cannot take a path", self.api_base)))?
            .pop_if_empty()
            .push(id.as_str())
            .push("");
        Ok(url)
    }

    async fn list(&self, pairs: Vec<(&'static str, String)>) -> Result<SearchResult, CatalogError> {
        let url = self.endpoint("productos/")?;

        tracing::debug!(url = %url, params = ?pairs, "catalog list request");

        let response = self.client.get(url).query(&pairs).send().await?;

        let status = response.status();
        if !status.is_success() {
            // The body still decides the outcome: a JSON error body has no
            // `results` and renders as an empty listing.
            tracing::warn!(status = %status, "catalog list returned non-success status");
        }

        let body = response.text().await?;
        let result = SearchResult::from_body(&body)?;

        tracing::debug!(
            result_count = result.items.len(),
            total = ?result.total,
            has_more = result.has_more,
            "catalog list completed"
        );

        Ok(result)
    }
}

#[async_trait::async_trait]
impl CatalogService for HttpCatalogService {
    async fn search(&self, query: &Query, options: &SearchOptions) -> Result<SearchResult, CatalogError> {
        let mut pairs = vec![("search", query.as_str().to_string())];
        pairs.extend(options.query_pairs());
        self.list(pairs).await
    }

    async fn browse(&self, options: &SearchOptions) -> Result<SearchResult, CatalogError> {
        self.list(options.query_pairs()).await
    }

    async fn item(&self, id: &ItemId) -> Result<Item, CatalogError> {
        let url = self.item_url(id)?;

        tracing::debug!(url = %url, "catalog item request");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, item_id = %id, "catalog item request failed");
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Join an API base and an endpoint with exactly one `/` between them.
pub fn build_api_url(base: &str, endpoint: &str) -> Result<Url, CatalogError> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| CatalogError::InvalidUrl(format!("{joined}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_api_url_normalizes_slashes() {
        let url = build_api_url("https://api.shop.test/api//", "/productos/").unwrap();
        assert_eq!(url.as_str(), "https://api.shop.test/api/productos/");

        let url = build_api_url("https://api.shop.test/api", "productos/42/").unwrap();
        assert_eq!(url.as_str(), "https://api.shop.test/api/productos/42/");
    }

    #[test]
    fn test_item_url_escapes_identifier() {
        let service = HttpCatalogService::with_client(Client::new(), "https://api.shop.test/api/");

        let url = service.item_url(&ItemId::new("42").unwrap()).unwrap();
        assert_eq!(url.as_str(), "https://api.shop.test/api/productos/42/");

        let url = service.item_url(&ItemId::new("../usuarios").unwrap()).unwrap();
        assert_eq!(url.path(), "/api/productos/..%2Fusuarios/");

        let url = service.item_url(&ItemId::new("a/b?c#d").unwrap()).unwrap();
        assert_eq!(url.path(), "/api/productos/a%2Fb%3Fc%23d/");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_build_api_url_rejects_relative_base() {
        let err = build_api_url("api/", "productos/").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidUrl(_)));
    }
}
