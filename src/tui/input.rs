use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
    Frame,
};
use tui_textarea::TextArea;

/// Single-line search box wrapping tui-textarea
pub struct SearchInput {
    textarea: TextArea<'static>,
    focused: bool,
}

impl SearchInput {
    pub fn new() -> Self {
        let mut input = Self {
            textarea: TextArea::default(),
            focused: true,
        };
        input.style();
        input
    }

    fn style(&mut self) {
        let border = if self.focused { Color::LightBlue } else { Color::DarkGray };
        self.textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(Span::styled(
                    " 🔎 Buscar (Enter=buscar │ Tab=productos) ",
                    Style::default()
                        .fg(Color::LightBlue)
                        .add_modifier(Modifier::BOLD),
                ))
                .border_style(Style::default().fg(border)),
        );
        self.textarea.set_cursor_line_style(Style::default());
        let cursor = if self.focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        self.textarea.set_cursor_style(cursor);
    }

    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.style();
        }
    }

    /// Handle keyboard input. Enter is handled by the caller.
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.textarea.input(key);
    }

    /// Current text; the box keeps it after a search, like a form field.
    pub fn text(&self) -> String {
        self.textarea.lines().join(" ")
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(&self.textarea, area);
    }
}

impl Default for SearchInput {
    fn default() -> Self {
        Self::new()
    }
}
