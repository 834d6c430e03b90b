use crate::catalog::ItemId;
use crate::search::Card;

/// Open/closed state of a dropdown menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

impl MenuState {
    pub fn is_open(&self) -> bool {
        matches!(self, MenuState::Open)
    }

    fn toggled(self) -> Self {
        match self {
            MenuState::Closed => MenuState::Open,
            MenuState::Open => MenuState::Closed,
        }
    }
}

/// The navigation menus next to the search box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryMenu {
    Productos,
    Servicios,
}

impl SecondaryMenu {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecondaryMenu::Productos => "productos",
            SecondaryMenu::Servicios => "servicios",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "productos" => Some(SecondaryMenu::Productos),
            "servicios" => Some(SecondaryMenu::Servicios),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SecondaryMenu::Productos => "Productos",
            SecondaryMenu::Servicios => "Servicios",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CartPanel {
    #[default]
    Closed,
    Open,
}

/// Item detail shown in the detail modal
#[derive(Debug, Clone, PartialEq)]
pub enum DetailView {
    Loading(ItemId),
    Loaded { card: Card, recommendations: Vec<Card> },
    Failed(String),
}

/// Modal layer above the page. At most one is shown.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Modal {
    #[default]
    None,
    Help,
    Detail(DetailView),
    /// Blocking notification; swallows all input until dismissed
    Alert(String),
}

/// Which widget receives plain keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    SearchInput,
    Grid,
}

/// Everything the render function needs besides the display region
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub user_menu: MenuState,
    pub productos_menu: MenuState,
    pub servicios_menu: MenuState,
    pub cart_panel: CartPanel,
    pub modal: Modal,
    pub focus: Focus,
    /// Index of the highlighted card in the grid
    pub selected_card: usize,
    /// Index of the highlighted entry in the open menu
    pub selected_menu_entry: usize,
    /// Items added to the cart during this session, newest last
    pub cart_log: Vec<String>,
    /// One-line note shown in the status bar
    pub status_note: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn menu(&self, menu: SecondaryMenu) -> MenuState {
        match menu {
            SecondaryMenu::Productos => self.productos_menu,
            SecondaryMenu::Servicios => self.servicios_menu,
        }
    }

    fn menu_mut(&mut self, menu: SecondaryMenu) -> &mut MenuState {
        match menu {
            SecondaryMenu::Productos => &mut self.productos_menu,
            SecondaryMenu::Servicios => &mut self.servicios_menu,
        }
    }

    /// The secondary menu currently open, if any
    pub fn open_menu(&self) -> Option<SecondaryMenu> {
        [SecondaryMenu::Productos, SecondaryMenu::Servicios]
            .into_iter()
            .find(|m| self.menu(*m).is_open())
    }

    /// Toggle one secondary menu; opening it closes the other one and the user menu.
    pub fn toggle_menu(&mut self, menu: SecondaryMenu) {
        let next = self.menu(menu).toggled();
        self.close_menus();
        *self.menu_mut(menu) = next;
        self.selected_menu_entry = 0;
    }

    pub fn toggle_user_menu(&mut self) {
        let next = self.user_menu.toggled();
        self.close_menus();
        self.user_menu = next;
        self.selected_menu_entry = 0;
    }

    pub fn close_menus(&mut self) {
        self.user_menu = MenuState::Closed;
        self.productos_menu = MenuState::Closed;
        self.servicios_menu = MenuState::Closed;
    }

    pub fn any_menu_open(&self) -> bool {
        self.user_menu.is_open() || self.open_menu().is_some()
    }

    pub fn open_cart(&mut self) {
        self.close_menus();
        self.cart_panel = CartPanel::Open;
    }

    pub fn close_cart(&mut self) {
        self.cart_panel = CartPanel::Closed;
    }

    pub fn show_alert(&mut self, message: impl Into<String>) {
        self.modal = Modal::Alert(message.into());
    }

    /// Whether an alert is up and all other input must wait
    pub fn is_blocked(&self) -> bool {
        matches!(self.modal, Modal::Alert(_))
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::None;
    }

    pub fn clamp_selection(&mut self, card_count: usize) {
        if card_count == 0 {
            self.selected_card = 0;
        } else if self.selected_card >= card_count {
            self.selected_card = card_count - 1;
        }
    }
}
