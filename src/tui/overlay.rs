use crate::tui::menu::MenuKind;
use crate::tui::product_grid::button_span;
use crate::tui::view_state::{DetailView, Modal, ViewState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Centered rectangle of at most `width` x `height` inside `area`
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn dialog_block(title: String, border: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Span::styled(
            title,
            Style::default().fg(border).add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(border))
}

/// Dropdown for the open menu, anchored under the header
pub fn render_menu(frame: &mut Frame, anchor: Rect, kind: MenuKind, selected: usize) {
    let entries = kind.entries();
    let width = entries.iter().map(|e| e.label.width()).max().unwrap_or(10) as u16 + 6;
    let x = match kind {
        MenuKind::User => anchor.x + anchor.width.saturating_sub(width),
        MenuKind::Secondary(_) => anchor.x,
    };
    let area = Rect {
        x,
        y: anchor.y + anchor.height,
        width: width.min(anchor.width),
        height: entries.len() as u16 + 2,
    }
    .intersection(frame.area());

    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let style = if idx == selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(format!(" {} ", entry.label), style)))
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(
        List::new(items).block(dialog_block(format!(" {} ", kind.title()), Color::Cyan)),
        area,
    );
}

/// Cart side panel listing this session's additions
pub fn render_cart_panel(frame: &mut Frame, area: Rect, view: &ViewState) {
    let width = (area.width / 3).max(30).min(area.width);
    let panel = Rect {
        x: area.x + area.width - width,
        y: area.y,
        width,
        height: area.height,
    };

    let mut lines: Vec<Line> = if view.cart_log.is_empty() {
        vec![Line::from(Span::styled(
            " Aún no agregas productos.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        view.cart_log
            .iter()
            .map(|name| Line::from(format!(" • {name}")))
            .collect()
    };
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " F5/Esc=cerrar",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Clear, panel);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(dialog_block(" 🛒 Carrito ".to_string(), Color::LightRed)),
        panel,
    );
}

/// The active modal, if any
pub fn render_modal(frame: &mut Frame, area: Rect, modal: &Modal) {
    match modal {
        Modal::None => {}
        Modal::Help => render_help(frame, area),
        Modal::Alert(message) => render_alert(frame, area, message),
        Modal::Detail(detail) => render_detail(frame, area, detail),
    }
}

fn render_alert(frame: &mut Frame, area: Rect, message: &str) {
    let dialog = centered(area, 50, 7);
    let text = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter/Esc=aceptar",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Clear, dialog);
    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(dialog_block(" ⚠️  Aviso ".to_string(), Color::LightRed)),
        dialog,
    );
}

fn render_help(frame: &mut Frame, area: Rect) {
    let dialog = centered(area, 60, 16);
    let rows = [
        ("Enter", "buscar / agregar al carrito"),
        ("Tab", "alternar búsqueda y productos"),
        ("↑↓", "mover selección"),
        ("d", "ver detalles del producto"),
        ("a", "agregar al carrito"),
        ("F2 / F3", "menú Productos / Servicios"),
        ("F4", "menú de usuario"),
        ("F5", "carrito"),
        ("Esc", "cerrar menú o ventana"),
        ("Ctrl+C", "salir"),
    ];
    let lines: Vec<Line> = rows
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!(" {key:<8}"), Style::default().fg(Color::Yellow)),
                Span::raw(*what),
            ])
        })
        .collect();

    frame.render_widget(Clear, dialog);
    frame.render_widget(
        Paragraph::new(lines).block(dialog_block(" Ayuda ".to_string(), Color::LightBlue)),
        dialog,
    );
}

fn render_detail(frame: &mut Frame, area: Rect, detail: &DetailView) {
    let dialog = centered(area, area.width.saturating_sub(8), area.height.saturating_sub(4));
    frame.render_widget(Clear, dialog);

    match detail {
        DetailView::Loading(id) => {
            frame.render_widget(
                Paragraph::new("Cargando...")
                    .block(dialog_block(format!(" Producto {id} "), Color::LightBlue)),
                dialog,
            );
        }
        DetailView::Failed(message) => {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("Error: {message}"),
                    Style::default().fg(Color::LightRed),
                ))
                .wrap(Wrap { trim: true })
                .block(dialog_block(" Producto ".to_string(), Color::LightRed)),
                dialog,
            );
        }
        DetailView::Loaded { card, recommendations } => {
            let block = dialog_block(format!(" {} ", card.name), Color::LightBlue);
            let inner = block.inner(dialog);
            frame.render_widget(block, dialog);

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(6), Constraint::Length(recommendations.len() as u16 + 2)])
                .split(inner);

            let mut lines = vec![
                Line::from(Span::styled(card.image.clone(), Style::default().fg(Color::DarkGray))),
                Line::from(""),
            ];
            if !card.description.is_empty() {
                lines.push(Line::from(card.description.clone()));
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                card.price.clone(),
                Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(card.detail_url.clone()));
            lines.push(Line::from(button_span(card.button)));
            lines.push(Line::from(Span::styled(
                "a=agregar al carrito │ Esc=cerrar",
                Style::default().fg(Color::DarkGray),
            )));

            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[0]);

            let related: Vec<ListItem> = recommendations
                .iter()
                .map(|r| ListItem::new(format!(" {}  {}", r.name, r.price)))
                .collect();
            frame.render_widget(
                List::new(related).block(
                    Block::default()
                        .borders(Borders::TOP)
                        .title(" También te puede interesar "),
                ),
                chunks[1],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fits_inside_area() {
        let area = Rect::new(0, 0, 40, 10);
        let dialog = centered(area, 60, 7);
        assert_eq!(dialog.width, 40);
        assert_eq!(dialog.height, 7);
        assert_eq!(dialog.y, 1);
    }
}
