use crate::tui::view_state::{SecondaryMenu, ViewState};

/// One selectable row of a dropdown menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub action: &'static str,
    pub arg: Option<&'static str>,
}

const fn entry(label: &'static str, action: &'static str, arg: Option<&'static str>) -> MenuEntry {
    MenuEntry { label, action, arg }
}

const PRODUCTOS: &[MenuEntry] = &[
    entry("Todos los productos", "browse-all", None),
    entry("Precio: menor a mayor", "set-sort", Some("precio_asc")),
    entry("Precio: mayor a menor", "set-sort", Some("precio_desc")),
    entry("Nombre: A-Z", "set-sort", Some("nombre_asc")),
    entry("Nombre: Z-A", "set-sort", Some("nombre_desc")),
    entry("Quitar filtros", "clear-filters", None),
];

const SERVICIOS: &[MenuEntry] = &[
    entry("Pedidos exclusivos", "show-link", Some("/store/servicios/pedidos-exclusivos/")),
    entry("Argollas de matrimonio", "show-link", Some("/store/servicios/argollas-matrimonio/")),
    entry("Argollas de compromiso", "show-link", Some("/store/servicios/argollas-compromiso/")),
    entry("Reparaciones", "show-link", Some("/store/servicios/reparaciones/")),
    entry("Mantenimiento de relojería", "show-link", Some("/store/servicios/mantenimiento-relojeria/")),
];

const USER: &[MenuEntry] = &[
    entry("Ver carrito", "open-cart", None),
    entry("Ayuda", "open-modal", Some("help")),
    entry("Salir", "quit", None),
];

/// Which dropdown is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    User,
    Secondary(SecondaryMenu),
}

impl MenuKind {
    pub fn current(view: &ViewState) -> Option<Self> {
        if view.user_menu.is_open() {
            return Some(MenuKind::User);
        }
        view.open_menu().map(MenuKind::Secondary)
    }

    pub fn title(&self) -> &'static str {
        match self {
            MenuKind::User => "Mi cuenta",
            MenuKind::Secondary(menu) => menu.title(),
        }
    }

    pub fn entries(&self) -> &'static [MenuEntry] {
        match self {
            MenuKind::User => USER,
            MenuKind::Secondary(SecondaryMenu::Productos) => PRODUCTOS,
            MenuKind::Secondary(SecondaryMenu::Servicios) => SERVICIOS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionRegistry;

    #[test]
    fn test_every_entry_names_a_registered_action() {
        let registry = ActionRegistry::new();
        for kind in [
            MenuKind::User,
            MenuKind::Secondary(SecondaryMenu::Productos),
            MenuKind::Secondary(SecondaryMenu::Servicios),
        ] {
            for entry in kind.entries() {
                assert!(registry.contains(entry.action), "{} is not registered", entry.action);
            }
        }
    }

    #[test]
    fn test_current_prefers_user_menu() {
        let mut view = ViewState::new();
        assert_eq!(MenuKind::current(&view), None);
        view.toggle_menu(SecondaryMenu::Servicios);
        assert_eq!(
            MenuKind::current(&view),
            Some(MenuKind::Secondary(SecondaryMenu::Servicios))
        );
    }
}
