//! Scrollable card lists (postings and chat bubbles).

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::tui::style::Styles;
use crate::view::{Align, Card, ListView, Tone};

fn alignment(align: Align) -> Alignment {
    match align {
        Align::Left => Alignment::Left,
        Align::Right => Alignment::Right,
    }
}

/// Lines for one card: label and date, body, author, blank separator.
fn card_lines(card: &Card) -> Vec<Line<'static>> {
    let align = alignment(card.align);
    let mut lines = Vec::new();

    let mut first = Vec::new();
    if let Some(label) = &card.label {
        first.push(Span::styled(label.clone(), Styles::title(card.tone)));
    }
    if !card.date.is_empty() {
        if !first.is_empty() {
            first.push(Span::raw("  "));
        }
        first.push(Span::styled(card.date.clone(), Styles::dim()));
    }
    if !first.is_empty() {
        lines.push(Line::from(first).alignment(align));
    }

    for text in card.body.lines() {
        lines.push(Line::from(Span::styled(text.to_string(), Styles::default())).alignment(align));
    }
    if let Some(footer) = &card.footer {
        lines.push(
            Line::from(Span::styled(footer.clone(), Styles::from_tone(card.tone))).alignment(align),
        );
    }
    lines.push(Line::from(""));
    lines
}

/// All lines of a list, or its empty-state message.
pub fn list_lines(list: &ListView) -> Vec<Line<'static>> {
    if list.is_empty() {
        return vec![Line::from(Span::styled(
            list.empty_message.clone(),
            Styles::from_tone(Tone::Dimmed),
        ))];
    }
    list.cards.iter().flat_map(card_lines).collect()
}

/// Rows the lines occupy once wrapped to `width`.
fn wrapped_height(lines: &[Line], width: u16) -> usize {
    let width = usize::from(width.max(1));
    lines
        .iter()
        .map(|l| l.width().div_ceil(width).max(1))
        .sum()
}

/// Renders a bordered, scrollable list. `scroll` is clamped in place.
pub fn render_card_list(frame: &mut Frame, area: Rect, list: &ListView, scroll: &mut usize) {
    let block = Block::default()
        .title(Line::from(Span::styled(
            format!(" {} ({}) ", list.title, list.counter()),
            Styles::title(list.tone),
        )))
        .borders(Borders::ALL)
        .border_style(Styles::from_tone(list.tone));
    let inner = block.inner(area);

    let lines = list_lines(list);
    let max_scroll = wrapped_height(&lines, inner.width).saturating_sub(usize::from(inner.height));
    if *scroll > max_scroll {
        *scroll = max_scroll;
    }

    let offset = u16::try_from(*scroll).unwrap_or(u16::MAX);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((offset, 0));
    frame.render_widget(paragraph, area);
}
