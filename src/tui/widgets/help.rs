//! Help popup widget.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::state::Tab;

/// Renders the help popup centered on screen with scroll support.
pub fn render_help(frame: &mut Frame, area: Rect, tab: Tab, scroll: &mut usize) {
    let popup_width = (area.width * 60 / 100).clamp(40, 80);
    let popup_height = (area.height * 80 / 100).clamp(10, 30);

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    // Clamped minimums may exceed tiny terminals
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height).intersection(area);

    frame.render_widget(Clear, popup_area);

    let content = help_lines(tab);
    let content_lines = content.len();

    let block = Block::default()
        .title(format!(" Help: {} ", tab.name()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

    let visible_height = chunks[0].height as usize;
    let max_scroll = content_lines.saturating_sub(visible_height);
    if *scroll > max_scroll {
        *scroll = max_scroll;
    }

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .scroll((*scroll as u16, 0))
        .style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, chunks[0]);

    let scroll_info = if max_scroll > 0 {
        format!(" [{}/{}]", *scroll + 1, max_scroll + 1)
    } else {
        String::new()
    };
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::DarkGray)),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::styled(" or ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::styled(" to close", Style::default().fg(Color::DarkGray)),
        Span::styled(scroll_info, Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(footer, chunks[1]);
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(Color::Yellow)))
}

fn key(keys: &'static str, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<14}", keys), Style::default().fg(Color::Cyan)),
        Span::raw(what),
    ])
}

fn help_lines(tab: Tab) -> Vec<Line<'static>> {
    let mut lines = vec![
        heading("Views"),
        key("1-5", "Overview, Offers, Requests, Messages, Stats"),
        key("Tab/Shift-Tab", "next / previous view"),
        Line::from(""),
        heading("Navigation"),
        key("j/k, Up/Down", "scroll one line"),
        key("PgUp/PgDn", "scroll one page"),
        key("g/Home, G/End", "top / bottom"),
        Line::from(""),
        heading("Data"),
        key("r", "refresh now"),
        key("p, Space", "pause / resume polling"),
        key("/", "filter the current view (Enter keeps, Esc clears)"),
    ];

    match tab {
        Tab::Offers | Tab::Requests => {
            lines.push(key("c", "cycle category: all, then each category"));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Cards show description, category, date and author, newest first.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        Tab::Messages => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Transcript oldest first. User turns on the right, bot turns on the left.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        Tab::Overview => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Offers, latest messages and requests side by side.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        Tab::Stats => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Postings with an unknown kind are only counted as Unclassified.",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(heading("Other"));
    lines.push(key("?", "toggle this help"));
    lines.push(key("q", "quit (asks first)"));
    lines.push(key("Ctrl-C", "quit immediately"));
    lines
}
