use crate::catalog::{CatalogError, Item, ItemId};
use crate::search::SearchResponse;
use crossterm::event::{KeyEvent, MouseEvent};

/// Terminal events that can occur in the application
#[derive(Debug, Clone)]
pub enum Event {
    /// Terminal key press event
    Key(KeyEvent),
    /// Terminal mouse event
    Mouse(MouseEvent),
    /// Terminal resize event
    Resize(u16, u16),
    /// Tick event for periodic redraws
    Tick,
}

/// Results reported back to the UI task by background requests
#[derive(Debug)]
pub enum AppEvent {
    /// A catalog search or listing resolved
    SearchResolved(SearchResponse),
    /// The cart accepted the item; its controls show the confirmation label
    CartAdded(ItemId),
    /// The confirmation delay for one click elapsed
    CartLabelRevert(ItemId),
    /// The cart rejected the item or could not be reached
    CartFailed { item_id: ItemId, message: String },
    /// Item detail and recommendations resolved
    DetailResolved {
        item_id: ItemId,
        result: Result<(Item, Vec<Item>), CatalogError>,
    },
}

/// Result type for event handling
pub type EventResult<T> = anyhow::Result<T>;
