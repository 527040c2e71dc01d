//! Stats view.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::state::{AppState, Tab};
use crate::tui::style::Styles;
use crate::view::stats::stats_sections;

const KEY_WIDTH: usize = 18;

pub fn render_stats(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let mut lines: Vec<Line> = Vec::new();
    for section in stats_sections(&state.dashboard) {
        lines.push(Line::from(Span::styled(
            section.title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        for (key, value) in section.rows {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<width$}", key, width = KEY_WIDTH), Styles::dim()),
                Span::styled(value, Styles::default()),
            ]));
        }
        lines.push(Line::from(""));
    }

    let block = Block::default().title(" Stats ").borders(Borders::ALL);
    let visible = usize::from(block.inner(area).height);
    let max_scroll = lines.len().saturating_sub(visible);
    let ts = state.tab_state_mut(Tab::Stats);
    if ts.scroll > max_scroll {
        ts.scroll = max_scroll;
    }
    let offset = u16::try_from(ts.scroll).unwrap_or(u16::MAX);

    frame.render_widget(Paragraph::new(lines).block(block).scroll((offset, 0)), area);
}
