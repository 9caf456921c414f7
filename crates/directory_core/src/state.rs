use std::time::Duration;

use crate::location::search_location;
use crate::view_model::{render, AppViewModel, DebugView, ResultsView};
use crate::{Filter, Gallery, NormalizedResult};

/// Identifies one search request. The highest issued token is the current one.
pub type SearchToken = u64;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(350);
pub const GALLERY_FADE: Duration = Duration::from_millis(200);
pub const DEFAULT_PAGE_PATH: &str = "/results.html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub debounce: Duration,
    pub gallery_fade: Duration,
    /// Path the search location is encoded against.
    pub page_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            gallery_fade: GALLERY_FADE,
            page_path: DEFAULT_PAGE_PATH.to_string(),
        }
    }
}

/// All mutable state of the search page. Owned by the update loop; the token
/// counter here is the single source of truth for staleness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    config: SessionConfig,
    input: String,
    last_query: String,
    token: SearchToken,
    debounce_generation: u64,
    armed_debounce: Option<u64>,
    is_searching: bool,
    last_results: Vec<NormalizedResult>,
    filter: Filter,
    displayed: ResultsView,
    gallery: Gallery,
    location: Option<String>,
    debug: bool,
    dirty: bool,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl SearchSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            input: String::new(),
            last_query: String::new(),
            token: 0,
            debounce_generation: 0,
            armed_debounce: None,
            is_searching: false,
            last_results: Vec::new(),
            filter: Filter::All,
            displayed: ResultsView::Blank,
            gallery: Gallery::new(),
            location: None,
            debug: false,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            input: self.input.clone(),
            filter: self.filter,
            loading: self.is_searching,
            results: self.displayed.clone(),
            gallery: self.gallery.view(),
            scroll_locked: self.gallery.is_open(),
            location: self.location.clone(),
            debug: self.debug.then(|| DebugView {
                token: self.token,
                last_query: self.last_query.clone(),
                is_searching: self.is_searching,
                result_count: self.last_results.len(),
                filter: self.filter,
            }),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn current_token(&self) -> SearchToken {
        self.token
    }

    pub fn is_searching(&self) -> bool {
        self.is_searching
    }

    pub fn last_results(&self) -> &[NormalizedResult] {
        &self.last_results
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn has_pending_debounce(&self) -> bool {
        self.armed_debounce.is_some()
    }

    pub(crate) fn gallery_mut(&mut self) -> &mut Gallery {
        self.dirty = true;
        &mut self.gallery
    }

    pub(crate) fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn set_input(&mut self, input: String) {
        self.input = input;
        self.dirty = true;
    }

    pub(crate) fn enable_debug(&mut self) {
        self.debug = true;
        self.dirty = true;
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.is_searching = loading;
        self.dirty = true;
    }

    pub(crate) fn show_prompt(&mut self) {
        self.displayed = ResultsView::Prompt;
        self.is_searching = false;
        self.dirty = true;
    }

    pub(crate) fn show_error(&mut self, message: &str) {
        self.displayed = ResultsView::Error(message.to_string());
        self.dirty = true;
    }

    /// Arms a new debounce generation; any earlier one becomes stale.
    pub(crate) fn arm_debounce(&mut self) -> u64 {
        self.debounce_generation += 1;
        self.armed_debounce = Some(self.debounce_generation);
        self.debounce_generation
    }

    /// Disarms the pending debounce. Returns whether one was armed.
    pub(crate) fn disarm_debounce(&mut self) -> bool {
        self.armed_debounce.take().is_some()
    }

    /// Consumes the armed debounce if `generation` is the armed one.
    pub(crate) fn take_debounce(&mut self, generation: u64) -> bool {
        if self.armed_debounce == Some(generation) {
            self.armed_debounce = None;
            true
        } else {
            false
        }
    }

    /// Issues the next token and clears the display for the new search.
    pub(crate) fn begin_search(&mut self, query: &str) -> SearchToken {
        self.token += 1;
        self.last_query = query.to_string();
        self.location = Some(search_location(&self.config.page_path, query));
        self.is_searching = true;
        self.displayed = ResultsView::Blank;
        self.dirty = true;
        self.token
    }

    pub(crate) fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub(crate) fn apply_results(&mut self, results: Vec<NormalizedResult>) {
        self.last_results = results;
        self.refresh_display();
    }

    pub(crate) fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.refresh_display();
    }

    pub(crate) fn displayed(&self) -> &ResultsView {
        &self.displayed
    }

    fn refresh_display(&mut self) {
        if let Some(view) = render(&self.last_results, self.filter, self.is_searching) {
            self.displayed = view;
        }
        self.dirty = true;
    }
}
