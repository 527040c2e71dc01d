//! Plain-text rendering for non-interactive output (`--once`, `--watch`).

use std::fmt::Write;

use crate::dashboard::DashboardState;
use crate::model::PostingKind;
use crate::view::common::{Align, ListFilter, ListView};
use crate::view::messages::{ChatOrder, message_list};
use crate::view::postings::posting_list;
use crate::view::stats::stats_sections;
use crate::view::{LOADING_MESSAGE, banner, call_to_action};

fn write_list(out: &mut String, list: &ListView) {
    let _ = writeln!(out, "== {} ({}) ==", list.title, list.counter());
    if list.is_empty() {
        let _ = writeln!(out, "  {}", list.empty_message);
        return;
    }
    for card in &list.cards {
        let indent = match card.align {
            Align::Left => "  ",
            Align::Right => "      ",
        };
        let mut head = Vec::new();
        if let Some(label) = &card.label {
            head.push(format!("[{}]", label));
        }
        if !card.date.is_empty() {
            head.push(card.date.clone());
        }
        if let Some(footer) = &card.footer {
            head.push(footer.clone());
        }
        if !head.is_empty() {
            let _ = writeln!(out, "{}{}", indent, head.join(" "));
        }
        let _ = writeln!(out, "{}  {}", indent, card.body);
    }
}

/// Renders the whole dashboard as text: banner, the three lists, stats.
pub fn render_plain(state: &DashboardState, bot_url: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "CODEX VIVUS");

    if let Some(error) = banner(state) {
        let _ = writeln!(out, "! {}", error);
    }

    if state.loading {
        let _ = writeln!(out, "{}", LOADING_MESSAGE);
        return out;
    }

    let filter = ListFilter::default();
    out.push('\n');
    write_list(&mut out, &posting_list(state, PostingKind::Offer, &filter));
    out.push('\n');
    write_list(
        &mut out,
        &message_list(state, ChatOrder::NewestFirst, &filter),
    );
    out.push('\n');
    write_list(&mut out, &posting_list(state, PostingKind::Request, &filter));

    out.push('\n');
    for section in stats_sections(state) {
        let _ = writeln!(out, "-- {} --", section.title);
        for (key, value) in section.rows {
            let _ = writeln!(out, "  {:<14} {}", key, value);
        }
    }

    out.push('\n');
    let _ = writeln!(out, "{}", call_to_action(bot_url));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::FetchOutcome;
    use crate::model::Posting;
    use crate::view::DEFAULT_BOT_URL;

    #[test]
    fn loading_state_prints_only_header() {
        let state = DashboardState::default();
        let text = render_plain(&state, DEFAULT_BOT_URL);
        assert!(text.contains(LOADING_MESSAGE));
        assert!(!text.contains("Offers"));
    }

    #[test]
    fn error_banner_and_empty_states() {
        let mut state = DashboardState::default();
        state.apply(FetchOutcome {
            postings: None,
            messages: None,
            error: Some("Postings query failed: relation does not exist".into()),
        });
        let text = render_plain(&state, DEFAULT_BOT_URL);
        assert!(text.contains("! Postings query failed: relation does not exist"));
        assert!(text.contains("No offers"));
        assert!(text.contains("No requests"));
        assert!(text.contains("No messages"));
        assert!(text.contains(DEFAULT_BOT_URL));
    }

    #[test]
    fn same_state_renders_identically() {
        let mut state = DashboardState::default();
        state.apply(FetchOutcome {
            postings: Some(vec![Posting {
                id: 1,
                kind: " oferta ".into(),
                description: "X".into(),
                ..Posting::default()
            }]),
            messages: Some(Vec::new()),
            error: None,
        });
        let a = render_plain(&state, DEFAULT_BOT_URL);
        let b = render_plain(&state, DEFAULT_BOT_URL);
        assert_eq!(a, b);
        assert!(a.contains("== Offers (1) ==\n    X"));
    }
}
