//! Main rendering logic for TUI.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::view::messages::{ChatOrder, message_list};
use crate::view::postings::posting_list;
use crate::view::{LOADING_MESSAGE, Tone, banner};

use super::state::{AppState, Tab};
use super::style::Styles;
use super::widgets::{
    render_card_list, render_footer, render_header, render_help, render_overview,
    render_quit_confirm, render_stats,
};

/// Main render function.
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();
    let banner_height = if banner(&state.dashboard).is_some() { 1 } else { 0 };

    let chunks = Layout::vertical([
        Constraint::Length(1),             // Header
        Constraint::Length(banner_height), // Error banner
        Constraint::Min(3),                // Content
        Constraint::Length(1),             // Footer
    ])
    .split(area);

    render_header(frame, chunks[0], state);

    if let Some(text) = banner(&state.dashboard) {
        frame.render_widget(
            Paragraph::new(format!(" ! {}", text)).style(Styles::banner()),
            chunks[1],
        );
    }

    render_content(frame, chunks[2], state);
    render_footer(frame, chunks[3], state);

    if state.show_help {
        render_help(frame, area, state.current_tab, &mut state.help_scroll);
    }

    if state.show_quit_confirm {
        render_quit_confirm(frame, area);
    }
}

/// Renders content based on current tab.
fn render_content(frame: &mut Frame, area: Rect, state: &mut AppState) {
    if state.dashboard.loading {
        let loading = Paragraph::new(Line::from(Span::styled(
            LOADING_MESSAGE,
            Styles::from_tone(Tone::Dimmed),
        )))
        .alignment(Alignment::Center);
        let middle = Rect {
            y: area.y + area.height / 2,
            height: area.height.min(1),
            ..area
        };
        frame.render_widget(loading, middle);
        return;
    }

    let tab = state.current_tab;
    let filter = state.list_filter(tab);
    match tab {
        Tab::Overview => render_overview(frame, area, state),
        Tab::Offers | Tab::Requests => {
            let Some(kind) = tab.posting_kind() else {
                return;
            };
            let list = posting_list(&state.dashboard, kind, &filter);
            render_card_list(frame, area, &list, &mut state.tab_state_mut(tab).scroll);
        }
        Tab::Messages => {
            let list = message_list(&state.dashboard, ChatOrder::OldestFirst, &filter);
            render_card_list(frame, area, &list, &mut state.tab_state_mut(tab).scroll);
        }
        Tab::Stats => render_stats(frame, area, state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{DashboardState, FetchPlan, Loader};
    use crate::store::RecordStore;
    use crate::store::mock::MockStore;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;
    use std::time::Duration;

    fn loaded_state() -> AppState {
        let store = Arc::new(MockStore::sample());
        let loader = Loader::new(Ok(store as Arc<dyn RecordStore>), FetchPlan::default());
        let mut dashboard = DashboardState::default();
        dashboard.apply(loader.load());
        AppState::new(
            dashboard,
            "https://t.me/CodexSupremBot".into(),
            Duration::from_secs(30),
        )
    }

    fn screen(state: &mut AppState, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn loading_screen_says_loading() {
        let mut state = AppState::new(
            DashboardState::default(),
            "https://t.me/bot".into(),
            Duration::from_secs(30),
        );
        let text = screen(&mut state, 120, 20);
        assert!(text.contains("Loading..."));
        assert!(text.contains("LOADING"));
    }

    #[test]
    fn overview_shows_all_three_columns_and_cta() {
        let mut state = loaded_state();
        let text = screen(&mut state, 150, 40);
        assert!(text.contains("CODEX VIVUS"));
        assert!(text.contains("Offers (3)"));
        assert!(text.contains("Requests (2)"));
        assert!(text.contains("Living Memory (4)"));
        assert!(text.contains("https://t.me/CodexSupremBot"));
    }

    #[test]
    fn banner_is_drawn_for_errors() {
        let mut state = loaded_state();
        state.dashboard.error = "Postings query failed: relation does not exist".into();
        let text = screen(&mut state, 150, 30);
        assert!(text.contains("relation does not exist"));
    }

    #[test]
    fn empty_tabs_show_empty_messages() {
        let mut state = AppState::new(
            DashboardState::default(),
            "https://t.me/bot".into(),
            Duration::from_secs(30),
        );
        state.dashboard.apply(crate::dashboard::FetchOutcome {
            postings: Some(Vec::new()),
            messages: Some(Vec::new()),
            error: None,
        });
        for (tab, message) in [
            (Tab::Offers, "No offers"),
            (Tab::Requests, "No requests"),
            (Tab::Messages, "No messages"),
        ] {
            state.current_tab = tab;
            assert!(screen(&mut state, 100, 20).contains(message));
        }
    }

    #[test]
    fn footer_shows_active_category_and_filter() {
        let mut state = loaded_state();
        state.current_tab = Tab::Offers;
        let ts = state.tab_state_mut(Tab::Offers);
        ts.category = Some("reiki".into());
        ts.filter = Some("lluna".into());
        let text = screen(&mut state, 120, 20);
        let footer = text.lines().last().unwrap_or_default();
        assert!(footer.contains("[reiki]"));
        assert!(footer.contains("/lluna"));
        assert!(footer.contains("help"));
    }

    #[test]
    fn popups_fit_tiny_terminals() {
        let mut state = loaded_state();
        state.show_help = true;
        screen(&mut state, 30, 8);
        state.show_quit_confirm = true;
        screen(&mut state, 30, 8);
        screen(&mut state, 10, 3);
    }

    #[test]
    fn every_tab_renders_with_popups() {
        let mut state = loaded_state();
        state.show_help = true;
        state.show_quit_confirm = true;
        for tab in Tab::all() {
            state.current_tab = *tab;
            state.scroll_to_bottom();
            let text = screen(&mut state, 80, 24);
            assert!(text.contains("Quit the dashboard?"));
        }
        // clamped on render
        assert!(state.tab_state(Tab::Stats).scroll < 100);
    }
}
