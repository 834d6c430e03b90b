use crate::action::{ActionArgs, ActionContext, ActionRegistry, Effect};
use crate::event::{AppEvent, Event, EventResult};
use crate::storefront::{Storefront, StorefrontState};
use crate::tui::menu::MenuKind;
use crate::tui::overlay;
use crate::tui::view_state::{CartPanel, DetailView, Focus, Modal, SecondaryMenu};
use crate::tui::{ProductGrid, SearchInput};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::sync::mpsc;

/// Main application state
pub struct App {
    /// Display region, menus, panels and modals
    state: StorefrontState,
    /// Action identifiers -> handlers
    actions: ActionRegistry,
    /// Background request runner
    storefront: Storefront,
    /// Results coming back from background requests
    events: mpsc::UnboundedReceiver<AppEvent>,
    /// Search box
    pub input: SearchInput,
    /// Product card list
    grid: ProductGrid,
    /// Whether the application should quit
    should_quit: bool,
}

impl App {
    /// Create a new application instance
    pub fn new(
        state: StorefrontState,
        storefront: Storefront,
        events: mpsc::UnboundedReceiver<AppEvent>,
    ) -> Self {
        Self {
            state,
            actions: ActionRegistry::new(),
            storefront,
            events,
            input: SearchInput::new(),
            grid: ProductGrid::new(),
            should_quit: false,
        }
    }

    /// Load the initial catalog listing
    pub fn start(&mut self) {
        self.dispatch("browse-all", ActionArgs::none());
    }

    /// Check if the application should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn state(&self) -> &StorefrontState {
        &self.state
    }

    /// Run an action by identifier and carry out its effect
    pub fn dispatch(&mut self, id: &str, args: ActionArgs) {
        let mut ctx = ActionContext {
            view: &mut self.state.view,
            search: &mut self.state.search,
        };
        let effect = self.actions.dispatch(id, &mut ctx, &args);
        self.run_effect(effect);
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Search(request) => {
                self.grid.reset_scroll();
                self.storefront.spawn_search(request);
            }
            Effect::AddToCart(item_id) => self.storefront.spawn_add_to_cart(item_id),
            Effect::LoadDetail(item_id) => self.storefront.spawn_detail(item_id),
            Effect::Quit => self.should_quit = true,
        }
    }

    /// Apply every background result that has arrived (non-blocking)
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.state.apply(event);
            applied += 1;
        }
        applied
    }

    /// Handle a terminal event
    pub fn handle_event(&mut self, event: Event) -> EventResult<()> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(_, _) | Event::Tick => Ok(()),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> EventResult<()> {
        if self.state.view.is_blocked() {
            return Ok(());
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => self.move_selection(-1),
            MouseEventKind::ScrollDown => self.move_selection(1),
            _ => {}
        }
        Ok(())
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent) -> EventResult<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        // A blocking alert only listens for its dismissal.
        if self.state.view.is_blocked() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.dispatch("dismiss-alert", ActionArgs::none());
            }
            return Ok(());
        }

        let global = match key.code {
            KeyCode::F(1) => Some(("open-modal", ActionArgs::text("help"))),
            KeyCode::F(2) => Some((
                "toggle-menu",
                ActionArgs::text(SecondaryMenu::Productos.as_str()),
            )),
            KeyCode::F(3) => Some((
                "toggle-menu",
                ActionArgs::text(SecondaryMenu::Servicios.as_str()),
            )),
            KeyCode::F(4) => Some(("toggle-user-menu", ActionArgs::none())),
            KeyCode::F(5) => match self.state.view.cart_panel {
                CartPanel::Open => Some(("close-cart", ActionArgs::none())),
                CartPanel::Closed => Some(("open-cart", ActionArgs::none())),
            },
            KeyCode::Esc => {
                self.handle_escape();
                return Ok(());
            }
            _ => None,
        };
        if let Some((id, args)) = global {
            self.dispatch(id, args);
            return Ok(());
        }

        if self.state.view.modal != Modal::None {
            self.handle_modal_key(key);
            return Ok(());
        }

        if let Some(kind) = MenuKind::current(&self.state.view) {
            self.handle_menu_key(kind, key);
            return Ok(());
        }

        match self.state.view.focus {
            Focus::SearchInput => self.handle_input_key(key),
            Focus::Grid => self.handle_grid_key(key),
        }
        Ok(())
    }

    /// Esc closes the innermost layer: modal, then menus, then the cart panel.
    fn handle_escape(&mut self) {
        let view = &self.state.view;
        let id = if view.modal != Modal::None {
            "close-modal"
        } else if view.any_menu_open() {
            "close-menus"
        } else if view.cart_panel == CartPanel::Open {
            "close-cart"
        } else {
            self.state.view.focus = Focus::SearchInput;
            return;
        };
        self.dispatch(id, ActionArgs::none());
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        if let Modal::Detail(DetailView::Loaded { card, .. }) = &self.state.view.modal {
            if matches!(key.code, KeyCode::Char('a') | KeyCode::Enter) {
                let id = card.item_id.clone();
                self.dispatch("add-to-cart", ActionArgs::item(id));
            }
        }
    }

    fn handle_menu_key(&mut self, kind: MenuKind, key: KeyEvent) {
        let entries = kind.entries();
        let view = &mut self.state.view;
        match key.code {
            KeyCode::Up => {
                view.selected_menu_entry = view.selected_menu_entry.saturating_sub(1);
            }
            KeyCode::Down => {
                if view.selected_menu_entry + 1 < entries.len() {
                    view.selected_menu_entry += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(entry) = entries.get(view.selected_menu_entry) {
                    let args = match entry.arg {
                        Some(arg) => ActionArgs::text(arg),
                        None => ActionArgs::none(),
                    };
                    self.dispatch(entry.action, args);
                    self.state.view.close_menus();
                }
            }
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let text = self.input.text();
                self.dispatch("submit-search", ActionArgs::text(text));
            }
            KeyCode::Tab | KeyCode::Down => self.set_focus(Focus::Grid),
            _ => self.input.handle_key(key),
        }
    }

    fn handle_grid_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Home => self.state.view.selected_card = 0,
            KeyCode::End => {
                let count = self.state.search.region().cards().len();
                self.state.view.selected_card = count.saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Char('a') => {
                if let Some(id) = self.selected_item() {
                    self.dispatch("add-to-cart", ActionArgs::item(id));
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_item() {
                    self.dispatch("open-detail", ActionArgs::item(id));
                }
            }
            KeyCode::Tab | KeyCode::Char('/') => self.set_focus(Focus::SearchInput),
            _ => {}
        }
    }

    fn selected_item(&self) -> Option<crate::catalog::ItemId> {
        self.state
            .search
            .region()
            .cards()
            .get(self.state.view.selected_card)
            .map(|card| card.item_id.clone())
    }

    fn move_selection(&mut self, delta: isize) {
        let count = self.state.search.region().cards().len();
        if count == 0 {
            return;
        }
        let current = self.state.view.selected_card as isize;
        let next = (current + delta).clamp(0, count as isize - 1);
        self.state.view.selected_card = next as usize;
    }

    fn set_focus(&mut self, focus: Focus) {
        self.state.view.focus = focus;
        self.input.set_focused(focus == Focus::SearchInput);
    }

    /// Render the application UI
    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Navigation
                Constraint::Length(3), // Search box
                Constraint::Min(3),    // Product grid
                Constraint::Length(3), // Status bar
            ])
            .split(frame.area());

        self.render_nav(frame, chunks[0]);
        self.input.set_focused(self.state.view.focus == Focus::SearchInput);
        self.input.render(frame, chunks[1]);
        self.render_grid(frame, chunks[2]);
        self.render_status(frame, chunks[3]);

        if self.state.view.cart_panel == CartPanel::Open {
            overlay::render_cart_panel(frame, chunks[2], &self.state.view);
        }
        if let Some(kind) = MenuKind::current(&self.state.view) {
            overlay::render_menu(frame, chunks[0], kind, self.state.view.selected_menu_entry);
        }
        overlay::render_modal(frame, frame.area(), &self.state.view.modal);
    }

    fn render_nav(&self, frame: &mut Frame, area: Rect) {
        let view = &self.state.view;
        let tab = |label: &'static str, open: bool| {
            let style = if open {
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Span::styled(label, style)
        };

        let nav = Line::from(vec![
            Span::styled(" Tienda ", Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD)),
            Span::raw(" │ "),
            tab("F2 Productos ▾", view.productos_menu.is_open()),
            Span::raw(" │ "),
            tab("F3 Servicios ▾", view.servicios_menu.is_open()),
            Span::raw(" │ "),
            tab("F4 Mi cuenta ▾", view.user_menu.is_open()),
            Span::raw(" │ "),
            tab("F5 🛒", view.cart_panel == CartPanel::Open),
            Span::raw(format!(" ({})", view.cart_log.len())),
            Span::styled("  F1 ayuda", Style::default().fg(Color::DarkGray)),
        ]);

        frame.render_widget(
            Paragraph::new(nav).block(Block::default().borders(Borders::ALL)),
            area,
        );
    }

    fn render_grid(&mut self, frame: &mut Frame, area: Rect) {
        let title = match self.state.search.last_query() {
            Some(query) => format!(" Resultados para \"{query}\" "),
            None => " Productos ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::White));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let focused = self.state.view.focus == Focus::Grid;
        self.grid.render(
            frame,
            inner,
            self.state.search.region(),
            self.state.view.selected_card,
            focused,
        );
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let search = &self.state.search;
        let shown = search.region().cards().len();
        let results = match search.total() {
            Some(total) => format!("{shown} de {total}"),
            None => shown.to_string(),
        };
        let order = search
            .options()
            .order
            .map(|o| o.as_param())
            .unwrap_or("predeterminado");

        let mut spans = vec![
            Span::styled("Estado: ", Style::default().fg(Color::Yellow)),
            Span::raw(if search.is_searching() { "Buscando..." } else { "Listo" }),
            Span::raw(" | "),
            Span::styled("Resultados: ", Style::default().fg(Color::Cyan)),
            Span::raw(results),
            Span::raw(" | "),
            Span::styled("Orden: ", Style::default().fg(Color::Cyan)),
            Span::raw(order),
        ];
        if let Some(note) = &self.state.view.status_note {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(note.clone(), Style::default().fg(Color::LightBlue)));
        }

        let status = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Estado")
                .border_style(Style::default().fg(Color::White)),
        );

        frame.render_widget(status, area);
    }
}
