use crate::search::{ButtonLabel, Card, DisplayRegion};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};
use textwrap::wrap;

/// Renders the display region: a scrolling column of product cards or a single notice
pub struct ProductGrid {
    scroll_offset: u16,
    viewport_height: u16,
}

impl ProductGrid {
    pub fn new() -> Self {
        Self {
            scroll_offset: 0,
            viewport_height: 0,
        }
    }

    /// Height of a card when rendered at `width`
    fn card_height(card: &Card, width: u16) -> u16 {
        let border_height: u16 = 2;
        // image, price, link, button
        let fixed_lines = 4;
        let content_width = width.saturating_sub(6) as usize;
        let description_lines = if card.description.is_empty() {
            0
        } else {
            wrap_text(&card.description, content_width).len() as u16
        };
        (border_height + fixed_lines).saturating_add(description_lines)
    }

    /// Render the region into `area`, keeping card `selected` in view
    pub fn render(&mut self, frame: &mut Frame, area: Rect, region: &DisplayRegion, selected: usize, focused: bool) {
        self.viewport_height = area.height;

        let DisplayRegion::Cards(cards) = region else {
            self.scroll_offset = 0;
            Self::render_notice(frame, area, region);
            return;
        };

        let width = area.width;
        let mut positions: Vec<(u16, u16)> = Vec::with_capacity(cards.len());
        let mut y = 0u16;
        for card in cards {
            let height = Self::card_height(card, width);
            positions.push((y, height));
            y = y.saturating_add(height).saturating_add(1);
        }

        // Scroll just enough to show the selected card.
        if let Some(&(pos, height)) = positions.get(selected) {
            if pos < self.scroll_offset {
                self.scroll_offset = pos;
            } else if pos.saturating_add(height) > self.scroll_offset.saturating_add(area.height) {
                self.scroll_offset = pos.saturating_add(height).saturating_sub(area.height);
            }
        }

        let visible_start = self.scroll_offset;
        let visible_end = visible_start.saturating_add(area.height);

        for (i, card) in cards.iter().enumerate() {
            let (pos, height) = positions[i];
            if pos.saturating_add(height) <= visible_start || pos >= visible_end {
                continue;
            }
            // Cards cut at the top are skipped; the selection logic keeps the focused one whole.
            if pos < visible_start {
                continue;
            }

            let render_y = pos - visible_start;
            let card_area = Rect {
                x: area.x,
                y: area.y.saturating_add(render_y),
                width,
                height: height.min(area.height.saturating_sub(render_y)),
            };

            Self::render_card(frame, card, card_area, focused && i == selected);
        }
    }

    fn render_card(frame: &mut Frame, card: &Card, area: Rect, highlighted: bool) {
        let border_color = if highlighted { Color::LightYellow } else { Color::DarkGray };

        let mut lines = vec![Line::from(vec![
            Span::raw(" 🖼  "),
            Span::styled(card.image.clone(), Style::default().fg(Color::DarkGray)),
        ])];

        let content_width = area.width.saturating_sub(6) as usize;
        if !card.description.is_empty() {
            for line in wrap_text(&card.description, content_width) {
                lines.push(Line::from(Span::styled(
                    format!("  {line}"),
                    Style::default().fg(Color::Gray),
                )));
            }
        }

        lines.push(Line::from(Span::styled(
            format!("  {}", card.price),
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(vec![
            Span::raw("  Ver detalles: "),
            Span::styled(card.detail_url.clone(), Style::default().fg(Color::LightBlue)),
        ]));
        lines.push(Line::from(button_span(card.button)));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .title(Span::styled(
                format!(" {} ", card.name),
                Style::default().add_modifier(Modifier::BOLD),
            ));

        let paragraph = Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, area);
    }

    fn render_notice(frame: &mut Frame, area: Rect, region: &DisplayRegion) {
        let Some(text) = region.notice() else {
            let hint = Paragraph::new("Escribe una búsqueda y presiona Enter.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(hint, area);
            return;
        };

        let color = match region {
            DisplayRegion::Searching => Color::Gray,
            _ => Color::LightRed,
        };

        let notice = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(color));
        frame.render_widget(notice, area);
    }

    pub fn reset_scroll(&mut self) {
        self.scroll_offset = 0;
    }
}

impl Default for ProductGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// The add-to-cart control as a styled span
pub fn button_span(label: ButtonLabel) -> Span<'static> {
    let style = match label {
        ButtonLabel::Idle => Style::default().fg(Color::White).bg(Color::Red),
        ButtonLabel::Confirmed => Style::default().fg(Color::Black).bg(Color::LightGreen),
    };
    Span::styled(format!("  [ {} ]", label.text()), style)
}

fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(10);
    wrap(text, max_width)
        .into_iter()
        .map(|cow| cow.to_string())
        .collect()
}
