//! Footer: bot call to action plus filter input or status.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::state::{AppState, InputMode};
use crate::tui::style::Styles;
use crate::util::truncate_chars;
use crate::view::{Tone, call_to_action};

pub fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::horizontal([Constraint::Min(20), Constraint::Length(40)]).split(area);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            call_to_action(&state.bot_url),
            Styles::from_tone(Tone::Offer),
        ))),
        chunks[0],
    );

    let ts = state.tab_state(state.current_tab);
    let right = if state.input_mode == InputMode::Filter {
        Line::from(vec![
            Span::styled("Filter: ", Styles::dim()),
            Span::styled(
                format!("{}█", state.filter_input),
                Style::default().fg(Color::Yellow),
            ),
        ])
    } else if let Some(msg) = &state.status_message {
        Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Yellow)))
    } else {
        let mut spans = Vec::new();
        if state.is_live {
            spans.push(Span::styled("realtime ", Styles::from_tone(Tone::User)));
        }
        if let Some(category) = &ts.category {
            let label = format!("[{}] ", truncate_chars(category, 16));
            spans.push(Span::styled(label, Styles::dim()));
        }
        if let Some(filter) = &ts.filter {
            let label = format!("/{} ", truncate_chars(filter, 16));
            spans.push(Span::styled(label, Styles::dim()));
        }
        spans.push(Span::styled("?", Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(" help", Styles::dim()));
        Line::from(spans)
    };
    frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), chunks[1]);
}
