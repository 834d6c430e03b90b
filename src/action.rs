//! Action registry: user intents by identifier, decoupled from key bindings and layout.
//!
//! Key handlers and menu entries only name an action (`"add-to-cart"`,
//! `"toggle-menu"`, ...) plus arguments; the registry looks up the handler,
//! which updates view state and returns the [`Effect`] the app must run.

use crate::catalog::{ItemId, SearchOptions, SortOrder};
use crate::search::{SearchAndRender, SearchRequest};
use crate::tui::view_state::{DetailView, Modal, SecondaryMenu, ViewState};
use std::collections::HashMap;

/// Side effect requested by an action
#[derive(Debug)]
pub enum Effect {
    None,
    Search(SearchRequest),
    AddToCart(ItemId),
    LoadDetail(ItemId),
    Quit,
}

/// Arguments carried by a dispatch
#[derive(Debug, Clone, Default)]
pub struct ActionArgs {
    pub item_id: Option<ItemId>,
    pub text: Option<String>,
}

impl ActionArgs {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn item(id: ItemId) -> Self {
        Self {
            item_id: Some(id),
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            item_id: None,
            text: Some(text.into()),
        }
    }
}

/// State an action may touch
pub struct ActionContext<'a> {
    pub view: &'a mut ViewState,
    pub search: &'a mut SearchAndRender,
}

pub type Handler = fn(&mut ActionContext<'_>, &ActionArgs) -> Effect;

struct ActionEntry {
    description: &'static str,
    handler: Handler,
}

/// Action registry - maps identifiers to handlers
pub struct ActionRegistry {
    actions: HashMap<String, ActionEntry>,
}

impl ActionRegistry {
    /// Create a registry with all storefront actions registered
    pub fn new() -> Self {
        let mut registry = Self {
            actions: HashMap::new(),
        };

        // Search and cart
        registry.register("submit-search", "Search the catalog for the given text", submit_search);
        registry.register("browse-all", "List the whole catalog with current filters", browse_all);
        registry.register("set-sort", "Change the listing order and refresh", set_sort);
        registry.register("clear-filters", "Drop all filters and refresh", clear_filters);
        registry.register("add-to-cart", "Add an item to the cart", add_to_cart);
        registry.register("open-detail", "Show an item's detail page", open_detail);

        // Panels and menus
        registry.register("open-cart", "Open the cart panel", open_cart);
        registry.register("close-cart", "Close the cart panel", close_cart);
        registry.register("toggle-user-menu", "Toggle the user menu", toggle_user_menu);
        registry.register("toggle-menu", "Toggle a navigation menu by name", toggle_menu);
        registry.register("close-menus", "Close every open menu", close_menus);
        registry.register("show-link", "Show a site page address", show_link);

        // Modals
        registry.register("open-modal", "Open a modal by name", open_modal);
        registry.register("close-modal", "Close the current modal", close_modal);
        registry.register("dismiss-alert", "Dismiss the blocking notification", close_modal);

        registry.register("quit", "Leave the application", quit);

        registry
    }

    /// Register or replace a handler
    pub fn register(&mut self, id: &str, description: &'static str, handler: Handler) {
        self.actions
            .insert(id.to_string(), ActionEntry { description, handler });
    }

    pub fn contains(&self, id: &str) -> bool {
        self.actions.contains_key(id)
    }

    pub fn description(&self, id: &str) -> Option<&'static str> {
        self.actions.get(id).map(|entry| entry.description)
    }

    /// Get all action identifiers, sorted
    pub fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.actions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Run the handler registered for `id`. Unknown ids do nothing.
    pub fn dispatch(&self, id: &str, ctx: &mut ActionContext<'_>, args: &ActionArgs) -> Effect {
        let Some(entry) = self.actions.get(id) else {
            tracing::debug!(action = %id, "no handler registered for action");
            return Effect::None;
        };

        // An open alert swallows everything except its own dismissal.
        if ctx.view.is_blocked() && id != "dismiss-alert" && id != "quit" {
            tracing::trace!(action = %id, "action ignored while alert is shown");
            return Effect::None;
        }

        tracing::trace!(action = %id, "dispatching action");
        (entry.handler)(ctx, args)
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn submit_search(ctx: &mut ActionContext<'_>, args: &ActionArgs) -> Effect {
    let raw = args.text.as_deref().unwrap_or("");
    match ctx.search.submit_query(raw) {
        Some(request) => {
            ctx.view.close_menus();
            ctx.view.selected_card = 0;
            Effect::Search(request)
        }
        None => Effect::None,
    }
}

fn browse_all(ctx: &mut ActionContext<'_>, _args: &ActionArgs) -> Effect {
    ctx.view.close_menus();
    ctx.view.selected_card = 0;
    Effect::Search(ctx.search.submit_browse())
}

fn set_sort(ctx: &mut ActionContext<'_>, args: &ActionArgs) -> Effect {
    let order = args.text.as_deref().and_then(SortOrder::parse);
    let options = SearchOptions {
        order,
        ..ctx.search.options().clone()
    };
    ctx.search.set_options(options);
    ctx.view.close_menus();
    ctx.view.selected_card = 0;
    Effect::Search(ctx.search.refresh())
}

fn clear_filters(ctx: &mut ActionContext<'_>, _args: &ActionArgs) -> Effect {
    ctx.search.set_options(SearchOptions::default());
    ctx.view.close_menus();
    ctx.view.selected_card = 0;
    Effect::Search(ctx.search.refresh())
}

fn add_to_cart(_ctx: &mut ActionContext<'_>, args: &ActionArgs) -> Effect {
    match &args.item_id {
        Some(id) => Effect::AddToCart(id.clone()),
        None => Effect::None,
    }
}

fn open_detail(ctx: &mut ActionContext<'_>, args: &ActionArgs) -> Effect {
    let Some(id) = args.item_id.clone() else {
        return Effect::None;
    };
    ctx.view.close_menus();
    ctx.view.modal = Modal::Detail(DetailView::Loading(id.clone()));
    Effect::LoadDetail(id)
}

fn open_cart(ctx: &mut ActionContext<'_>, _args: &ActionArgs) -> Effect {
    ctx.view.open_cart();
    Effect::None
}

fn close_cart(ctx: &mut ActionContext<'_>, _args: &ActionArgs) -> Effect {
    ctx.view.close_cart();
    Effect::None
}

fn toggle_user_menu(ctx: &mut ActionContext<'_>, _args: &ActionArgs) -> Effect {
    ctx.view.toggle_user_menu();
    Effect::None
}

fn toggle_menu(ctx: &mut ActionContext<'_>, args: &ActionArgs) -> Effect {
    if let Some(menu) = args.text.as_deref().and_then(SecondaryMenu::parse) {
        ctx.view.toggle_menu(menu);
    }
    Effect::None
}

fn close_menus(ctx: &mut ActionContext<'_>, _args: &ActionArgs) -> Effect {
    ctx.view.close_menus();
    Effect::None
}

fn show_link(ctx: &mut ActionContext<'_>, args: &ActionArgs) -> Effect {
    if let Some(path) = &args.text {
        let site = ctx.search.card_links().site_base_url.trim_end_matches('/').to_string();
        ctx.view.status_note = Some(format!("{site}{path}"));
    }
    ctx.view.close_menus();
    Effect::None
}

fn open_modal(ctx: &mut ActionContext<'_>, args: &ActionArgs) -> Effect {
    if args.text.as_deref() == Some("help") {
        ctx.view.close_menus();
        ctx.view.modal = Modal::Help;
    }
    Effect::None
}

fn close_modal(ctx: &mut ActionContext<'_>, _args: &ActionArgs) -> Effect {
    ctx.view.close_modal();
    Effect::None
}

fn quit(_ctx: &mut ActionContext<'_>, _args: &ActionArgs) -> Effect {
    Effect::Quit
}
