use crate::cart::{CartError, CartService};
use crate::catalog::ItemId;
use crate::session::StoreSession;
use reqwest::Url;

const REQUESTED_WITH: &str = "X-Requested-With";
const CSRF_HEADER: &str = "X-CSRFToken";

/// Cart client posting to `{site}/cart/add/{id}/`
pub struct HttpCartService {
    session: StoreSession,
    csrf_cookie_name: String,
}

impl HttpCartService {
    pub fn new(session: StoreSession, csrf_cookie_name: impl Into<String>) -> Self {
        Self {
            session,
            csrf_cookie_name: csrf_cookie_name.into(),
        }
    }
}

/// `{site}/cart/add/{id}/` with the id as a single escaped path segment
fn add_url(site: &Url, item: &ItemId) -> Result<Url, CartError> {
    let mut url = site
        .join("/cart/add/")
        .map_err(|e| CartError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| CartError::InvalidUrl(format!("{site} cannot take a path")))?
        .pop_if_empty()
        .push(item.as_str())
        .push("");
    Ok(url)
}

#[async_trait::async_trait]
impl CartService for HttpCartService {
    async fn add(&self, item: &ItemId) -> Result<(), CartError> {
        let url = add_url(self.session.site_url(), item)?;

        // Read per request: the site may rotate the token between calls.
        let token = self.session.cookie(&self.csrf_cookie_name);

        tracing::debug!(
            url = %url,
            has_csrf_token = token.is_some(),
            "cart add request"
        );

        let response = self
            .session
            .client()
            .post(url)
            .header(REQUESTED_WITH, "XMLHttpRequest")
            .header(CSRF_HEADER, token.unwrap_or_default())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, item_id = %item, "cart add rejected");
            return Err(CartError::AddFailed {
                status: status.as_u16(),
            });
        }

        tracing::debug!(item_id = %item, "cart add accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_url_keeps_identifier_in_one_segment() {
        let site = Url::parse("https://joyeria.test").unwrap();

        let url = add_url(&site, &ItemId::new("7").unwrap()).unwrap();
        assert_eq!(url.as_str(), "https://joyeria.test/cart/add/7/");

        let url = add_url(&site, &ItemId::new("../../admin/wipe").unwrap()).unwrap();
        assert_eq!(url.path(), "/cart/add/..%2F..%2Fadmin%2Fwipe/");

        let url = add_url(&site, &ItemId::new("a?b").unwrap()).unwrap();
        assert_eq!(url.path(), "/cart/add/a%3Fb/");
        assert_eq!(url.query(), None);
    }
}
