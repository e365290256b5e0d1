//! Browsing session: what the user is looking at and what was last asked for.
//!
//! [`SessionState`] is the synchronous state machine. Every transition that
//! needs recommendations hands back a [`FetchTicket`]; the caller runs the
//! fetch and feeds the result to [`SessionState::settle`]. Tickets carry a
//! generation number and only the most recently issued one may change the
//! displayed songs or clear the loading flags, so a slow, older fetch can
//! never overwrite a newer result.
//!
//! [`Session`] drives the state machine against the recommendation and
//! preference services, holding the state lock only between steps.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{
    error::{AppError, AppResult},
    models::{ChipKind, RequestDescriptor, Song, SongCard, Tab},
    services::{preferences::PreferenceService, recommendations::RecommendationService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Replace the list; cache eligible
    FirstPage,
    /// Replace the list, bypassing the cache read
    Refresh,
    /// Append to the list, excluding what is already shown
    LoadMore,
}

/// A fetch issued by a transition, to be settled with its result
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub generation: u64,
    pub request: RequestDescriptor,
    pub exclude: Vec<String>,
    pub mode: FetchMode,
}

impl FetchTicket {
    pub fn force_refresh(&self) -> bool {
        self.mode == FetchMode::Refresh
    }

    pub fn appends(&self) -> bool {
        self.mode == FetchMode::LoadMore
    }
}

#[derive(Debug, Default)]
pub struct SessionState {
    active_tab: Tab,
    songs: Vec<Song>,
    loading: bool,
    loading_more: bool,
    selected_chip: Option<String>,
    search_query: String,
    search_focused: bool,
    last_request: Option<RequestDescriptor>,
    generation: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn selected_chip(&self) -> Option<&str> {
        self.selected_chip.as_deref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn search_focused(&self) -> bool {
        self.search_focused
    }

    pub fn last_request(&self) -> Option<&RequestDescriptor> {
        self.last_request.as_ref()
    }

    /// Starts a fetch, superseding any fetch still in flight
    pub fn begin(&mut self, request: RequestDescriptor, mode: FetchMode) -> FetchTicket {
        self.generation += 1;
        self.last_request = Some(request.clone());

        let append = mode == FetchMode::LoadMore;
        self.loading = !append;
        self.loading_more = append;

        let exclude = if append {
            self.songs.iter().map(Song::exclusion_label).collect()
        } else {
            Vec::new()
        };

        FetchTicket {
            generation: self.generation,
            request,
            exclude,
            mode,
        }
    }

    /// Applies a fetch result
    ///
    /// Returns `false` and leaves the state untouched when a newer fetch has
    /// been issued since `ticket`.
    pub fn settle(&mut self, ticket: &FetchTicket, songs: Vec<Song>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }

        if ticket.appends() {
            self.songs.extend(songs);
        } else {
            self.songs = songs;
        }
        self.loading = false;
        self.loading_more = false;
        true
    }

    /// Drops whatever is in flight without issuing a new fetch
    fn invalidate(&mut self) {
        self.generation += 1;
        self.loading = false;
        self.loading_more = false;
    }

    /// Opens the Today tab from scratch and fetches its first page
    pub fn start(&mut self) -> FetchTicket {
        self.active_tab = Tab::Today;
        self.reset_view();
        self.begin(RequestDescriptor::Today, FetchMode::FirstPage)
    }

    /// Switches tabs; selecting the tab already shown changes nothing
    pub fn change_tab(&mut self, tab: Tab) -> Option<FetchTicket> {
        if tab == self.active_tab {
            return None;
        }

        self.active_tab = tab;
        self.reset_view();
        (tab == Tab::Today).then(|| self.begin(RequestDescriptor::Today, FetchMode::FirstPage))
    }

    fn reset_view(&mut self) {
        self.songs.clear();
        self.selected_chip = None;
        self.search_query.clear();
        self.search_focused = false;
        self.invalidate();
    }

    pub fn select_chip(&mut self, kind: ChipKind, id: &str) -> AppResult<FetchTicket> {
        let option = kind
            .find(id)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown {:?} option: {}", kind, id)))?;

        self.selected_chip = Some(option.id.to_string());
        let label = option.label.to_string();
        let request = match kind {
            ChipKind::Mood => RequestDescriptor::Mood(label),
            ChipKind::Genre => RequestDescriptor::Genre(label),
        };
        Ok(self.begin(request, FetchMode::FirstPage))
    }

    pub fn set_search_query(&mut self, text: &str) {
        self.search_query = text.to_string();
    }

    pub fn set_search_focus(&mut self, focused: bool) {
        self.search_focused = focused;
    }

    /// Submits an artist search for `term`, or for the current search text
    ///
    /// Returns the ticket and the trimmed term to record in the history, or
    /// `None` when there is nothing to search for.
    pub fn submit_search(&mut self, term: Option<&str>) -> Option<(FetchTicket, String)> {
        let term = term
            .unwrap_or(&self.search_query)
            .trim()
            .to_string();
        if term.is_empty() {
            return None;
        }

        self.search_query = term.clone();
        self.search_focused = false;
        let ticket = self.begin(RequestDescriptor::Artist(term.clone()), FetchMode::FirstPage);
        Some((ticket, term))
    }

    /// Requests songs for a taste profile, keyed on the trimmed text
    pub fn submit_profile(&mut self, profile: &str) -> Option<FetchTicket> {
        let profile = profile.trim();
        if profile.is_empty() {
            return None;
        }
        Some(self.begin(
            RequestDescriptor::Custom(profile.to_string()),
            FetchMode::FirstPage,
        ))
    }

    pub fn load_more(&mut self) -> Option<FetchTicket> {
        let request = self.last_request.clone()?;
        Some(self.begin(request, FetchMode::LoadMore))
    }

    pub fn refresh(&mut self) -> Option<FetchTicket> {
        let request = self.last_request.clone()?;
        Some(self.begin(request, FetchMode::Refresh))
    }
}

/// What a client renders for the current session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    pub active_tab: Tab,
    pub songs: Vec<SongCard>,
    pub loading: bool,
    pub loading_more: bool,
    pub selected_chip: Option<String>,
    pub search_query: String,
    pub search_focused: bool,
    pub last_request: Option<RequestDescriptor>,
    /// Recent searches, offered while the search box is focused
    pub suggestions: Vec<String>,
}

pub struct Session {
    state: Mutex<SessionState>,
    service: Arc<RecommendationService>,
    preferences: Arc<PreferenceService>,
}

impl Session {
    pub fn new(service: Arc<RecommendationService>, preferences: Arc<PreferenceService>) -> Self {
        Self {
            state: Mutex::new(SessionState::new()),
            service,
            preferences,
        }
    }

    /// Opens the default tab, fetching today's picks
    pub async fn start(&self) -> SessionSnapshot {
        let ticket = self.state.lock().await.start();
        self.run(Some(ticket)).await
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        self.render(&state).await
    }

    async fn render(&self, state: &SessionState) -> SessionSnapshot {
        let flags = self.preferences.mark_favorites(state.songs()).await;
        let songs = state
            .songs()
            .iter()
            .cloned()
            .zip(flags)
            .map(|(song, is_favorite)| SongCard { song, is_favorite })
            .collect();

        let suggestions = if state.search_focused() {
            self.preferences.search_history().await
        } else {
            Vec::new()
        };

        SessionSnapshot {
            active_tab: state.active_tab(),
            songs,
            loading: state.loading(),
            loading_more: state.loading_more(),
            selected_chip: state.selected_chip().map(str::to_string),
            search_query: state.search_query().to_string(),
            search_focused: state.search_focused(),
            last_request: state.last_request().cloned(),
            suggestions,
        }
    }

    /// Runs the fetch for `ticket` (if any) and returns the settled snapshot
    async fn run(&self, ticket: Option<FetchTicket>) -> SessionSnapshot {
        if let Some(ticket) = ticket {
            let songs = self
                .service
                .fetch_recommendations(&ticket.request, &ticket.exclude, ticket.force_refresh())
                .await;

            let mut state = self.state.lock().await;
            if !state.settle(&ticket, songs) {
                tracing::debug!(
                    generation = ticket.generation,
                    request = %ticket.request,
                    "Discarded stale recommendation result"
                );
            }
        }

        self.snapshot().await
    }

    pub async fn change_tab(&self, tab: Tab) -> SessionSnapshot {
        let ticket = self.state.lock().await.change_tab(tab);
        self.run(ticket).await
    }

    pub async fn select_chip(&self, kind: ChipKind, id: &str) -> AppResult<SessionSnapshot> {
        let ticket = self.state.lock().await.select_chip(kind, id)?;
        Ok(self.run(Some(ticket)).await)
    }

    pub async fn set_search_query(&self, text: &str) -> SessionSnapshot {
        self.state.lock().await.set_search_query(text);
        self.snapshot().await
    }

    pub async fn set_search_focus(&self, focused: bool) -> SessionSnapshot {
        self.state.lock().await.set_search_focus(focused);
        self.snapshot().await
    }

    pub async fn submit_search(&self, term: Option<&str>) -> SessionSnapshot {
        let submitted = self.state.lock().await.submit_search(term);
        match submitted {
            Some((ticket, term)) => {
                self.preferences.push_search(&term).await;
                self.run(Some(ticket)).await
            }
            None => self.snapshot().await,
        }
    }

    /// Saves the taste profile and fetches recommendations for it
    pub async fn submit_profile(&self, profile: &str) -> SessionSnapshot {
        self.preferences.set_profile(profile).await;
        let ticket = self.state.lock().await.submit_profile(profile);
        self.run(ticket).await
    }

    pub async fn load_more(&self) -> SessionSnapshot {
        let ticket = self.state.lock().await.load_more();
        self.run(ticket).await
    }

    pub async fn refresh(&self) -> SessionSnapshot {
        let ticket = self.state.lock().await.refresh();
        self.run(ticket).await
    }
}
