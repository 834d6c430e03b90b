//! Cart Service: adds items to the server-side cart by identifier.

pub mod http;

pub use http::HttpCartService;

use crate::catalog::ItemId;

/// Message shown for any non-success answer from the cart endpoint.
pub const ADD_FAILED_MESSAGE: &str = "No se pudo agregar al carrito.";

#[async_trait::async_trait]
pub trait CartService: Send + Sync {
    /// Add one unit of `item` to the persisted cart
    async fn add(&self, item: &ItemId) -> Result<(), CartError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CartError {
    /// The endpoint answered with a non-success status
    #[error("{}", ADD_FAILED_MESSAGE)]
    AddFailed { status: u16 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
