use crate::cart::CartService;
use crate::catalog::{self, CatalogService, ItemId};
use crate::event::AppEvent;
use crate::search::{ButtonLabel, Card, CardLinks, RenderOutcome, SearchAndRender, SearchRequest};
use crate::tui::view_state::{DetailView, Modal, ViewState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Recommendations shown under an item's detail
pub const RECOMMENDATION_LIMIT: usize = 6;

/// Runs storefront requests off the UI task.
///
/// This is UI-agnostic: every request resolves into an `AppEvent` on the
/// channel handed to [`Storefront::new`], and [`StorefrontState::apply`]
/// folds those events into what gets rendered.
#[derive(Clone)]
pub struct Storefront {
    catalog: Arc<dyn CatalogService>,
    cart: Arc<dyn CartService>,
    confirm_delay: Duration,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl Storefront {
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        cart: Arc<dyn CartService>,
        confirm_delay: Duration,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            catalog,
            cart,
            confirm_delay,
            events,
        }
    }

    /// Run a catalog request. No cancellation: a superseded request still
    /// completes and is dropped by sequence number when applied.
    pub fn spawn_search(&self, request: SearchRequest) {
        let catalog = self.catalog.clone();
        let tx = self.events.clone();

        tokio::spawn(async move {
            let response = request.execute(catalog.as_ref()).await;
            let _ = tx.send(AppEvent::SearchResolved(response));
        });
    }

    /// Post an item to the cart. On success the label revert is scheduled
    /// independently for this click.
    pub fn spawn_add_to_cart(&self, item_id: ItemId) {
        let cart = self.cart.clone();
        let tx = self.events.clone();
        let delay = self.confirm_delay;

        tokio::spawn(async move {
            match cart.add(&item_id).await {
                Ok(()) => {
                    if tx.send(AppEvent::CartAdded(item_id.clone())).is_err() {
                        return; // UI gone
                    }
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(AppEvent::CartLabelRevert(item_id));
                }
                Err(e) => {
                    let _ = tx.send(AppEvent::CartFailed {
                        item_id,
                        message: e.to_string(),
                    });
                }
            }
        });
    }

    /// Fetch an item and its recommendations for the detail modal.
    pub fn spawn_detail(&self, item_id: ItemId) {
        let catalog = self.catalog.clone();
        let tx = self.events.clone();

        tokio::spawn(async move {
            let result = match catalog.item(&item_id).await {
                Ok(item) => {
                    let related =
                        match catalog::recommendations(catalog.as_ref(), &item, RECOMMENDATION_LIMIT).await {
                            Ok(related) => related,
                            Err(e) => {
                                tracing::warn!(item_id = %item_id, error = %e, "recommendations unavailable");
                                Vec::new()
                            }
                        };
                    Ok((item, related))
                }
                Err(e) => Err(e),
            };
            let _ = tx.send(AppEvent::DetailResolved { item_id, result });
        });
    }
}

/// Rendered state: the display region plus menus, panels and modals
pub struct StorefrontState {
    pub search: SearchAndRender,
    pub view: ViewState,
}

impl StorefrontState {
    pub fn new(links: CardLinks) -> Self {
        Self {
            search: SearchAndRender::new(links),
            view: ViewState::new(),
        }
    }

    /// Name of a shown card for `item_id`: the grid first, then the detail modal.
    fn card_name(&self, item_id: &ItemId) -> Option<String> {
        let in_grid = self.search.region().cards().iter().find(|c| &c.item_id == item_id);
        let in_detail = match &self.view.modal {
            Modal::Detail(DetailView::Loaded { card, recommendations }) => {
                std::iter::once(card).chain(recommendations).find(|c| &c.item_id == item_id)
            }
            _ => None,
        };
        in_grid.or(in_detail).map(|c| c.name.clone())
    }

    /// Fold a background result into the state.
    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::SearchResolved(response) => {
                let outcome = self.search.apply(response);
                if outcome != RenderOutcome::Stale {
                    let count = self.search.region().cards().len();
                    self.view.clamp_selection(count);
                }
            }
            AppEvent::CartAdded(item_id) => {
                self.search.set_button(&item_id, ButtonLabel::Confirmed);
                if let Modal::Detail(DetailView::Loaded { card, .. }) = &mut self.view.modal {
                    if card.item_id == item_id {
                        card.button = ButtonLabel::Confirmed;
                    }
                }
                let name = self.card_name(&item_id).unwrap_or_else(|| format!("Producto {item_id}"));
                self.view.cart_log.push(name);
            }
            AppEvent::CartLabelRevert(item_id) => {
                self.search.set_button(&item_id, ButtonLabel::Idle);
                if let Modal::Detail(DetailView::Loaded { card, .. }) = &mut self.view.modal {
                    if card.item_id == item_id {
                        card.button = ButtonLabel::Idle;
                    }
                }
            }
            AppEvent::CartFailed { item_id, message } => {
                tracing::debug!(item_id = %item_id, error = %message, "cart add failed");
                self.view.show_alert(message);
            }
            AppEvent::DetailResolved { item_id, result } => {
                // Only fill the modal that is still waiting for this item.
                let waiting = matches!(
                    &self.view.modal,
                    Modal::Detail(DetailView::Loading(id)) if *id == item_id
                );
                if !waiting {
                    return;
                }

                self.view.modal = Modal::Detail(match result {
                    Ok((item, related)) => {
                        let links = self.search.card_links();
                        DetailView::Loaded {
                            card: Card::from_item(&item, links),
                            recommendations: related
                                .iter()
                                .map(|r| Card::from_item(r, links))
                                .collect(),
                        }
                    }
                    Err(e) => DetailView::Failed(e.to_string()),
                });
            }
        }
    }
}
