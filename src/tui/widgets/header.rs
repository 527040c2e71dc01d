//! Header widget showing title, mode, tabs, counts and refresh time.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::state::{AppState, Tab};
use crate::tui::style::{Styles, Theme};
use crate::view::Tone;

/// Renders the header bar.
pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::horizontal([
        Constraint::Length(13), // Title
        Constraint::Length(10), // Mode
        Constraint::Min(20),    // Tabs
        Constraint::Length(18), // Counts
        Constraint::Length(16), // Last refresh
    ])
    .split(area);

    frame.render_widget(
        Paragraph::new(" CODEX VIVUS").style(Styles::header()),
        chunks[0],
    );

    let mode = format!(" {} ", state.mode_label());
    let mode_style = if state.dashboard.loading || state.paused {
        Styles::header().fg(Theme::GOLD)
    } else {
        Styles::header()
    };
    frame.render_widget(Paragraph::new(mode).style(mode_style), chunks[1]);

    let tabs: Vec<Span> = Tab::all()
        .iter()
        .enumerate()
        .flat_map(|(i, tab)| {
            let style = if *tab == state.current_tab {
                Styles::tab_active()
            } else {
                Styles::tab_inactive()
            };
            let num = format!(" {}:", i + 1);
            let name = format!("{} ", tab.name());
            vec![Span::styled(num, Styles::dim()), Span::styled(name, style)]
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(tabs)).style(Styles::header()),
        chunks[2],
    );

    let stats = &state.dashboard.stats;
    let counts = Line::from(vec![
        Span::styled(format!("{}", stats.offers), Styles::title(Tone::Offer)),
        Span::raw(" · "),
        Span::styled(format!("{}", stats.messages), Styles::title(Tone::Assistant)),
        Span::raw(" · "),
        Span::styled(format!("{}", stats.requests), Styles::title(Tone::Request)),
    ]);
    frame.render_widget(Paragraph::new(counts).style(Styles::header()), chunks[3]);

    let refreshed = match &state.dashboard.last_refresh {
        Some(at) => {
            let marker = if state.refreshing { "*" } else { " " };
            format!("{}{}", marker, at.format("%H:%M:%S"))
        }
        None => " --:--:--".to_string(),
    };
    frame.render_widget(
        Paragraph::new(refreshed).style(Styles::header()),
        chunks[4],
    );
}
