//! Search-and-render cycle: query -> catalog request -> display region.
//!
//! [`SearchAndRender`] owns the display region. Submitting a query swaps in
//! the "searching" placeholder and hands back a [`SearchRequest`] for the
//! caller to run off the UI task; the resolved [`SearchResponse`] is fed back
//! through [`SearchAndRender::apply`]. Every request carries a sequence
//! token, and only the response to the most recent request is rendered.

use crate::catalog::{CatalogError, CatalogService, Item, ItemId, Query, SearchOptions, SearchResult};

pub const SEARCHING_TEXT: &str = "Buscando...";
pub const NO_RESULTS_TEXT: &str = "No se encontraron resultados.";
pub const ADD_TO_CART_LABEL: &str = "Agregar al carrito";
pub const ADDED_LABEL: &str = "Agregado ✅";

/// Characters of an item description shown on its card
pub const DESCRIPTION_LIMIT: usize = 100;

/// What the display region currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayRegion {
    /// Nothing requested yet
    Idle,
    /// A request is in flight
    Searching,
    /// One card per item, in response order
    Cards(Vec<Card>),
    /// The request succeeded with zero items
    NoResults,
    /// The request failed; holds the failure text
    Error(String),
}

impl DisplayRegion {
    pub fn cards(&self) -> &[Card] {
        match self {
            DisplayRegion::Cards(cards) => cards,
            _ => &[],
        }
    }

    /// Text of the single notice node, for every state except `Cards`
    pub fn notice(&self) -> Option<String> {
        match self {
            DisplayRegion::Idle | DisplayRegion::Cards(_) => None,
            DisplayRegion::Searching => Some(SEARCHING_TEXT.to_string()),
            DisplayRegion::NoResults => Some(NO_RESULTS_TEXT.to_string()),
            DisplayRegion::Error(message) => Some(format!("Error: {message}")),
        }
    }
}

/// Label state of a card's add-to-cart control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonLabel {
    Idle,
    Confirmed,
}

impl ButtonLabel {
    pub fn text(&self) -> &'static str {
        match self {
            ButtonLabel::Idle => ADD_TO_CART_LABEL,
            ButtonLabel::Confirmed => ADDED_LABEL,
        }
    }
}

/// Display form of a catalog item
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: String,
    pub detail_url: String,
    pub button: ButtonLabel,
}

impl Card {
    pub fn from_item(item: &Item, links: &CardLinks) -> Self {
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            description: truncate_description(item.description.as_deref().unwrap_or("")),
            image: item
                .image_url
                .clone()
                .unwrap_or_else(|| links.placeholder_image.clone()),
            price: format_price(item.price),
            detail_url: format!(
                "{}/store/producto/{}/",
                links.site_base_url.trim_end_matches('/'),
                item.id
            ),
            button: ButtonLabel::Idle,
        }
    }
}

/// Site-specific pieces a card needs besides the item itself
#[derive(Debug, Clone)]
pub struct CardLinks {
    pub site_base_url: String,
    pub placeholder_image: String,
}

/// First [`DESCRIPTION_LIMIT`] characters, nothing appended.
pub fn truncate_description(text: &str) -> String {
    text.chars().take(DESCRIPTION_LIMIT).collect()
}

pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("${}", price as i64)
    } else {
        format!("${:.2}", price)
    }
}

/// A catalog request waiting to be run
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub seq: u64,
    /// `None` lists the catalog with filters only
    pub query: Option<Query>,
    pub options: SearchOptions,
}

impl SearchRequest {
    pub async fn execute(self, catalog: &dyn CatalogService) -> SearchResponse {
        let result = match &self.query {
            Some(query) => catalog.search(query, &self.options).await,
            None => catalog.browse(&self.options).await,
        };
        SearchResponse { seq: self.seq, result }
    }
}

/// A resolved catalog request
#[derive(Debug)]
pub struct SearchResponse {
    pub seq: u64,
    pub result: Result<SearchResult, CatalogError>,
}

/// What [`SearchAndRender::apply`] did with a response
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    Cards(usize),
    NoResults,
    Error(String),
    /// A newer request was issued; the response was dropped
    Stale,
}

/// Owner of the display region and the request sequence
pub struct SearchAndRender {
    region: DisplayRegion,
    latest_seq: u64,
    options: SearchOptions,
    last_query: Option<Query>,
    total: Option<u64>,
    links: CardLinks,
}

impl SearchAndRender {
    pub fn new(links: CardLinks) -> Self {
        Self {
            region: DisplayRegion::Idle,
            latest_seq: 0,
            options: SearchOptions::default(),
            last_query: None,
            total: None,
            links,
        }
    }

    pub fn region(&self) -> &DisplayRegion {
        &self.region
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: SearchOptions) {
        self.options = options;
    }

    pub fn last_query(&self) -> Option<&Query> {
        self.last_query.as_ref()
    }

    /// Total matches reported for the rendered results
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.region, DisplayRegion::Searching)
    }

    /// Start a search. Blank input is a silent no-op: no request, region untouched.
    pub fn submit_query(&mut self, raw: &str) -> Option<SearchRequest> {
        let query = Query::parse(raw)?;
        self.last_query = Some(query.clone());
        Some(self.issue(Some(query)))
    }

    /// List the catalog with the current filters and no search term.
    pub fn submit_browse(&mut self) -> SearchRequest {
        self.last_query = None;
        self.issue(None)
    }

    /// Re-run the last request with the current filters.
    pub fn refresh(&mut self) -> SearchRequest {
        let query = self.last_query.clone();
        self.issue(query)
    }

    fn issue(&mut self, query: Option<Query>) -> SearchRequest {
        self.latest_seq += 1;
        self.region = DisplayRegion::Searching;

        tracing::debug!(
            seq = self.latest_seq,
            query = query.as_ref().map(Query::as_str).unwrap_or(""),
            "search submitted"
        );

        SearchRequest {
            seq: self.latest_seq,
            query,
            options: self.options.clone(),
        }
    }

    /// Render a response, unless a newer request has been issued since.
    pub fn apply(&mut self, response: SearchResponse) -> RenderOutcome {
        if response.seq != self.latest_seq {
            tracing::debug!(
                seq = response.seq,
                latest = self.latest_seq,
                "dropping stale search response"
            );
            return RenderOutcome::Stale;
        }

        match response.result {
            Ok(result) if result.items.is_empty() => {
                self.total = result.total;
                self.region = DisplayRegion::NoResults;
                RenderOutcome::NoResults
            }
            Ok(result) => {
                self.total = result.total;
                let cards: Vec<Card> = result
                    .items
                    .iter()
                    .map(|item| Card::from_item(item, &self.links))
                    .collect();
                let count = cards.len();
                self.region = DisplayRegion::Cards(cards);
                RenderOutcome::Cards(count)
            }
            Err(err) => {
                let message = err.to_string();
                tracing::debug!(seq = response.seq, error = %message, "search failed");
                self.total = None;
                self.region = DisplayRegion::Error(message.clone());
                RenderOutcome::Error(message)
            }
        }
    }

    /// Set the label of every control tagged with `item_id`. Returns whether any matched.
    pub fn set_button(&mut self, item_id: &ItemId, label: ButtonLabel) -> bool {
        let DisplayRegion::Cards(cards) = &mut self.region else {
            return false;
        };

        let mut matched = false;
        for card in cards.iter_mut().filter(|c| &c.item_id == item_id) {
            card.button = label;
            matched = true;
        }
        matched
    }

    pub fn card_links(&self) -> &CardLinks {
        &self.links
    }
}
