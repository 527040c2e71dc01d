//! Three-column landing view: offers, transcript, requests.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::model::PostingKind;
use crate::tui::state::{AppState, Tab};
use crate::view::messages::{ChatOrder, message_list};
use crate::view::postings::posting_list;

use super::cards::render_card_list;

/// Renders the overview. Narrow terminals stack the columns.
pub fn render_overview(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let filter = state.list_filter(Tab::Overview);
    let offers = posting_list(&state.dashboard, PostingKind::Offer, &filter);
    let messages = message_list(&state.dashboard, ChatOrder::NewestFirst, &filter);
    let requests = posting_list(&state.dashboard, PostingKind::Request, &filter);

    let columns = [
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ];
    let chunks = if area.width < 90 {
        Layout::vertical(columns).split(area)
    } else {
        Layout::horizontal(columns).split(area)
    };

    // One scroll position drives all three columns; each clamps its own copy.
    let wanted = state.tab_state(Tab::Overview).scroll;
    let mut furthest = 0;
    for (list, chunk) in [(&offers, chunks[0]), (&messages, chunks[1]), (&requests, chunks[2])] {
        let mut scroll = wanted;
        render_card_list(frame, chunk, list, &mut scroll);
        furthest = furthest.max(scroll);
    }
    state.tab_state_mut(Tab::Overview).scroll = furthest;
}
