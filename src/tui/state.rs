//! Application state management.

use std::collections::HashMap;
use std::time::Duration;

use crate::dashboard::DashboardState;
use crate::model::PostingKind;
use crate::util::same_folded;
use crate::view::ListFilter;
use crate::view::postings::category_choices;

/// Available tabs in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Overview,
    Offers,
    Requests,
    Messages,
    Stats,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[
            Tab::Overview,
            Tab::Offers,
            Tab::Requests,
            Tab::Messages,
            Tab::Stats,
        ]
    }

    /// Returns the display name of the tab.
    pub fn name(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Offers => "Offers",
            Tab::Requests => "Requests",
            Tab::Messages => "Messages",
            Tab::Stats => "Stats",
        }
    }

    /// Returns the next tab.
    pub fn next(&self) -> Tab {
        match self {
            Tab::Overview => Tab::Offers,
            Tab::Offers => Tab::Requests,
            Tab::Requests => Tab::Messages,
            Tab::Messages => Tab::Stats,
            Tab::Stats => Tab::Overview,
        }
    }

    /// Returns the previous tab.
    pub fn prev(&self) -> Tab {
        match self {
            Tab::Overview => Tab::Stats,
            Tab::Offers => Tab::Overview,
            Tab::Requests => Tab::Offers,
            Tab::Messages => Tab::Requests,
            Tab::Stats => Tab::Messages,
        }
    }

    /// Tab for a 1-based digit key.
    pub fn from_digit(n: u32) -> Option<Tab> {
        let idx = usize::try_from(n).ok()?.checked_sub(1)?;
        Self::all().get(idx).copied()
    }

    /// Posting kind listed on this tab, if it lists one.
    pub fn posting_kind(&self) -> Option<PostingKind> {
        match self {
            Tab::Offers => Some(PostingKind::Offer),
            Tab::Requests => Some(PostingKind::Request),
            _ => None,
        }
    }

    /// Whether `/` filtering applies to this tab.
    pub fn is_filterable(&self) -> bool {
        !matches!(self, Tab::Stats)
    }
}

/// Per-tab filter and scroll position.
#[derive(Debug, Clone, Default)]
pub struct TabState {
    /// Text filter.
    pub filter: Option<String>,
    /// Selected category label (offer/request tabs).
    pub category: Option<String>,
    /// First visible line.
    pub scroll: usize,
}

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Filter,
}

/// Main application state.
pub struct AppState {
    /// Fetched data; only the refresh path writes it.
    pub dashboard: DashboardState,
    /// Current active tab.
    pub current_tab: Tab,
    /// Input mode.
    pub input_mode: InputMode,
    /// Filter input buffer.
    pub filter_input: String,
    tabs: HashMap<Tab, TabState>,
    /// Polling suspended by the user.
    pub paused: bool,
    /// A change subscription is active.
    pub is_live: bool,
    /// A fetch is queued or running.
    pub refreshing: bool,
    /// Show help popup.
    pub show_help: bool,
    /// Help popup scroll offset.
    pub help_scroll: usize,
    /// Show quit confirmation popup.
    pub show_quit_confirm: bool,
    /// Transient message in the footer.
    pub status_message: Option<String>,
    /// Link shown in the footer call to action.
    pub bot_url: String,
    pub poll_interval: Duration,
    /// Terminal width for layout decisions.
    pub terminal_width: u16,
}

impl AppState {
    pub fn new(dashboard: DashboardState, bot_url: String, poll_interval: Duration) -> Self {
        Self {
            dashboard,
            current_tab: Tab::default(),
            input_mode: InputMode::Normal,
            filter_input: String::new(),
            tabs: HashMap::new(),
            paused: false,
            is_live: false,
            refreshing: false,
            show_help: false,
            help_scroll: 0,
            show_quit_confirm: false,
            status_message: None,
            bot_url,
            poll_interval,
            terminal_width: 0,
        }
    }

    pub fn tab_state(&self, tab: Tab) -> TabState {
        self.tabs.get(&tab).cloned().unwrap_or_default()
    }

    pub fn tab_state_mut(&mut self, tab: Tab) -> &mut TabState {
        self.tabs.entry(tab).or_default()
    }

    /// Filter to apply when building lists for `tab`.
    pub fn list_filter(&self, tab: Tab) -> ListFilter {
        let ts = self.tabs.get(&tab);
        ListFilter {
            text: ts.and_then(|t| t.filter.clone()),
            category: ts.and_then(|t| t.category.clone()),
        }
    }

    /// Switches tab, leaving filter input mode.
    pub fn switch_tab(&mut self, tab: Tab) {
        if self.input_mode == InputMode::Filter {
            self.input_mode = InputMode::Normal;
        }
        self.current_tab = tab;
    }

    /// Sets the current tab's text filter from the input buffer.
    pub fn apply_filter_input(&mut self) {
        let filter = if self.filter_input.is_empty() {
            None
        } else {
            Some(self.filter_input.clone())
        };
        let ts = self.tab_state_mut(self.current_tab);
        ts.filter = filter;
        ts.scroll = 0;
    }

    /// Advances the category selector: all, then each distinct category of
    /// the tab's kind in first-seen order, then back to all.
    ///
    /// Returns the new selection. No-op on tabs without a posting kind.
    pub fn cycle_category(&mut self) -> Option<String> {
        let kind = self.current_tab.posting_kind()?;
        let choices = category_choices(&self.dashboard, kind);
        let current = self.tab_state(self.current_tab).category;
        let next = match current {
            None => choices.first().cloned(),
            Some(cur) => choices
                .iter()
                .position(|c| same_folded(c, &cur))
                .and_then(|i| choices.get(i + 1))
                .cloned(),
        };
        let ts = self.tab_state_mut(self.current_tab);
        ts.category = next.clone();
        ts.scroll = 0;
        next
    }

    /// Moves the current tab's scroll position by `delta` lines.
    pub fn scroll_by(&mut self, delta: isize) {
        let ts = self.tab_state_mut(self.current_tab);
        ts.scroll = ts.scroll.saturating_add_signed(delta);
    }

    pub fn scroll_to_top(&mut self) {
        self.tab_state_mut(self.current_tab).scroll = 0;
    }

    /// Scrolls to the end; the renderer clamps to the last page.
    pub fn scroll_to_bottom(&mut self) {
        self.tab_state_mut(self.current_tab).scroll = usize::MAX;
    }

    /// Header mode label.
    pub fn mode_label(&self) -> &'static str {
        if self.dashboard.loading {
            "LOADING"
        } else if self.paused {
            "PAUSED"
        } else {
            "LIVE"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::FetchOutcome;
    use crate::model::Posting;

    fn state() -> AppState {
        let mut dashboard = DashboardState::default();
        dashboard.apply(FetchOutcome {
            postings: Some(vec![
                Posting {
                    id: 3,
                    kind: "OFERTA".into(),
                    category: Some("reiki".into()),
                    ..Posting::default()
                },
                Posting {
                    id: 2,
                    kind: "OFERTA".into(),
                    category: Some("cuina".into()),
                    ..Posting::default()
                },
                Posting {
                    id: 1,
                    kind: "DEMANDA".into(),
                    category: Some("transport".into()),
                    ..Posting::default()
                },
            ]),
            messages: Some(Vec::new()),
            error: None,
        });
        AppState::new(dashboard, "https://t.me/bot".into(), Duration::from_secs(30))
    }

    #[test]
    fn tab_cycle_round_trips() {
        for tab in Tab::all() {
            assert_eq!(tab.next().prev(), *tab);
        }
        assert_eq!(Tab::from_digit(1), Some(Tab::Overview));
        assert_eq!(Tab::from_digit(5), Some(Tab::Stats));
        assert_eq!(Tab::from_digit(0), None);
        assert_eq!(Tab::from_digit(6), None);
    }

    #[test]
    fn category_cycles_through_kind_and_back_to_all() {
        let mut s = state();
        s.current_tab = Tab::Offers;
        assert_eq!(s.cycle_category().as_deref(), Some("reiki"));
        assert_eq!(s.cycle_category().as_deref(), Some("cuina"));
        assert_eq!(s.cycle_category(), None);
        assert_eq!(s.list_filter(Tab::Offers).category, None);
    }

    #[test]
    fn category_cycle_treats_accented_case_as_one() {
        let mut dashboard = DashboardState::default();
        dashboard.apply(FetchOutcome {
            postings: Some(vec![
                Posting {
                    id: 3,
                    kind: "OFERTA".into(),
                    category: Some("Meditació".into()),
                    ..Posting::default()
                },
                Posting {
                    id: 2,
                    kind: "OFERTA".into(),
                    category: Some("MEDITACIÓ".into()),
                    ..Posting::default()
                },
                Posting {
                    id: 1,
                    kind: "OFERTA".into(),
                    category: Some("ioga".into()),
                    ..Posting::default()
                },
            ]),
            messages: Some(Vec::new()),
            error: None,
        });
        let mut s = AppState::new(dashboard, "https://t.me/bot".into(), Duration::from_secs(30));
        s.current_tab = Tab::Offers;
        assert_eq!(s.cycle_category().as_deref(), Some("Meditació"));
        s.tab_state_mut(Tab::Offers).category = Some("MEDITACIÓ".into());
        assert_eq!(s.cycle_category().as_deref(), Some("ioga"));
        assert_eq!(s.cycle_category(), None);
    }

    #[test]
    fn category_is_per_tab() {
        let mut s = state();
        s.current_tab = Tab::Requests;
        s.cycle_category();
        assert_eq!(
            s.list_filter(Tab::Requests).category.as_deref(),
            Some("transport")
        );
        assert!(s.list_filter(Tab::Offers).category.is_none());

        s.current_tab = Tab::Messages;
        assert_eq!(s.cycle_category(), None);
    }

    #[test]
    fn scroll_saturates_at_zero() {
        let mut s = state();
        s.scroll_by(-5);
        assert_eq!(s.tab_state(Tab::Overview).scroll, 0);
        s.scroll_by(3);
        assert_eq!(s.tab_state(Tab::Overview).scroll, 3);
    }

    #[test]
    fn mode_label_follows_state() {
        let mut s = state();
        assert_eq!(s.mode_label(), "LIVE");
        s.paused = true;
        assert_eq!(s.mode_label(), "PAUSED");
        s.dashboard = DashboardState::default();
        assert_eq!(s.mode_label(), "LOADING");
    }
}
