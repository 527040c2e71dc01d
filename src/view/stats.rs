//! Aggregated statistics view.

use crate::dashboard::DashboardState;

/// One labelled section of key/value rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSection {
    pub title: &'static str,
    pub rows: Vec<(String, String)>,
}

fn join_or_dash(labels: &[String]) -> String {
    if labels.is_empty() {
        "-".to_string()
    } else {
        labels.join(", ")
    }
}

/// Builds the stats sections from the last applied fetch.
pub fn stats_sections(state: &DashboardState) -> Vec<StatsSection> {
    let s = &state.stats;

    let mut sections = vec![
        StatsSection {
            title: "Postings",
            rows: vec![
                ("Offers".to_string(), s.offers.to_string()),
                ("Requests".to_string(), s.requests.to_string()),
                ("Unclassified".to_string(), s.unclassified.to_string()),
            ],
        },
        StatsSection {
            title: "Memory",
            rows: vec![
                ("Messages".to_string(), s.messages.to_string()),
                ("From users".to_string(), s.user_messages.to_string()),
                ("From bot".to_string(), s.assistant_messages.to_string()),
                ("Chat users".to_string(), s.chat_users.to_string()),
            ],
        },
        StatsSection {
            title: "Recent categories",
            rows: vec![
                ("Offers".to_string(), join_or_dash(&s.recent_offer_categories)),
                (
                    "Requests".to_string(),
                    join_or_dash(&s.recent_request_categories),
                ),
            ],
        },
    ];

    if !s.by_category.is_empty() {
        sections.push(StatsSection {
            title: "By category",
            rows: s
                .by_category
                .iter()
                .map(|(label, count)| (label.clone(), count.to_string()))
                .collect(),
        });
    }

    sections
}
