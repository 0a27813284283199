//! Page-level controller: owns the form, search session, history and view, and
//! runs every user action against the backend.

use crate::api::{BlogSummary, LoginResponse, Renderer, SortOrder, XapblrClient};
use crate::error::{ClientError, Result};
use crate::form::{login_form, SearchForm};
use crate::history::{History, HistoryEntry, Location};
use crate::meta::{corrected_page, MetaDisplay};
use crate::preview::Preview;
use crate::render::{LoginStatus, ResultRenderer, StatusClass};
use crate::session::SearchSession;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Where a successful login sends the page.
pub const RESULTS_LOCATION: &str = "/search";

/// Where logging out sends the page.
pub const INDEX_LOCATION: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Rendered {
        display: MetaDisplay,
        results: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        corrected_page: Option<u32>,
    },
    /// A newer search started before this one finished; nothing was rendered.
    Superseded,
}

struct PageState<R> {
    form: SearchForm,
    session: SearchSession,
    history: History,
    view: R,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

pub struct SearchController<R> {
    client: XapblrClient,
    state: Mutex<PageState<R>>,
}

impl<R: ResultRenderer + Send> SearchController<R> {
    /// `defaults` seeds the form fields (render and sort in particular).
    pub fn new(client: XapblrClient, view: R, defaults: SearchForm) -> Self {
        Self {
            client,
            state: Mutex::new(PageState {
                form: defaults,
                session: SearchSession::new(),
                history: History::new(),
                view,
                generation: 0,
                in_flight: None,
            }),
        }
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let response = self.client.login(&login_form(username, password)).await?;

        let mut state = self.state.lock().await;
        let class = if response.success { StatusClass::Success } else { StatusClass::Failure };
        state.view.show_login_status(LoginStatus { message: response.message.clone(), class });
        if response.success {
            state.view.navigate(RESULTS_LOCATION);
        }
        Ok(response)
    }

    /// Ends the backend session and returns the page to the index.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        self.client.logout().await?;

        let mut state = self.state.lock().await;
        state.view.clear_login_status();
        state.view.navigate(INDEX_LOCATION);
        Ok(())
    }

    /// Fetches the indexed blogs and offers them on the page.
    pub async fn list_blogs(&self) -> Result<Vec<BlogSummary>> {
        let blogs = self.client.list_blogs().await?;
        self.state.lock().await.view.show_blogs(&blogs);
        Ok(blogs)
    }

    /// A fresh search from the form: always starts at page 1 and records history.
    pub async fn submit_search(&self, blog: &str, query: &str) -> Result<SearchOutcome> {
        let form = {
            let mut state = self.state.lock().await;
            state.form.blog = blog.to_string();
            state.form.query = query.to_string();
            state.form.page = 1;
            state.form.clone()
        };
        self.search(form, true).await
    }

    /// Replays the last search at `page` (or at the form's current page)
    /// without touching history.
    pub async fn paginate(&self, page: Option<u32>) -> Result<SearchOutcome> {
        let form = {
            let mut state = self.state.lock().await;
            let mut form = state.form.clone();
            if !state.session.restore_into(&mut form, page) {
                return Err(ClientError::NoActiveSearch);
            }
            state.form = form.clone();
            form
        };
        self.search(form, false).await
    }

    /// Steps back through history and replays that entry. `None` at the start.
    pub async fn back(&self) -> Result<Option<SearchOutcome>> {
        let entry = self.state.lock().await.history.back().cloned();
        self.replay_entry(entry).await
    }

    pub async fn forward(&self) -> Result<Option<SearchOutcome>> {
        let entry = self.state.lock().await.history.forward().cloned();
        self.replay_entry(entry).await
    }

    /// Loads a `/search/...` location the way a page load would: the form is
    /// prefilled from the path and the current history entry is replaced.
    pub async fn open(&self, path: &str) -> Result<SearchOutcome> {
        let location = Location::parse(path)?;
        let form = {
            let mut state = self.state.lock().await;
            let mut form = state.form.clone();
            form.blog = location.blog;
            form.query = location.query;
            form.page = location.page;
            let entry = HistoryEntry::for_form(&form);
            state.view.navigate(&entry.url);
            state.history.replace(entry);
            form
        };
        self.search(form, false).await
    }

    pub async fn toggle_preview(&self, index: usize) -> Result<Preview> {
        self.state.lock().await.view.toggle_preview(index)
    }

    pub async fn set_preferences(&self, render: Option<Renderer>, sort: Option<SortOrder>) {
        let mut state = self.state.lock().await;
        if let Some(render) = render {
            state.form.render = render;
        }
        if let Some(sort) = sort {
            state.form.sort = sort;
        }
    }

    pub async fn form(&self) -> SearchForm {
        self.state.lock().await.form.clone()
    }

    pub async fn last_search(&self) -> Option<SearchForm> {
        self.state.lock().await.session.last().cloned()
    }

    pub async fn history_len(&self) -> usize {
        self.state.lock().await.history.len()
    }

    pub async fn with_view<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        f(&self.state.lock().await.view)
    }

    /// Runs `form` against the backend and renders the response.
    ///
    /// Starting a search cancels whichever search is still in flight. When
    /// the response's offset lies past every match, the last valid page is
    /// fetched once more in its place.
    #[instrument(skip(self, form), fields(blog = %form.blog, query = %form.query, page = form.page))]
    pub async fn search(&self, form: SearchForm, push_history: bool) -> Result<SearchOutcome> {
        let mut form = form;
        let mut push_history = push_history;
        let mut corrected: Option<u32> = None;

        loop {
            let (ticket, token) = {
                let mut state = self.state.lock().await;
                state.session.record(&form);
                state.form = form.clone();
                if push_history {
                    let entry = HistoryEntry::for_form(&form);
                    state.view.navigate(&entry.url);
                    state.history.push(entry);
                }
                if let Some(previous) = state.in_flight.take() {
                    previous.cancel();
                }
                let token = CancellationToken::new();
                state.in_flight = Some(token.clone());
                state.generation += 1;
                (state.generation, token)
            };

            let request = form.to_request();
            let response = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(ticket, "Search superseded while in flight");
                    return Ok(SearchOutcome::Superseded);
                }
                response = self.client.search(&request) => response?,
            };

            let mut state = self.state.lock().await;
            if state.generation != ticket {
                debug!(ticket, current = state.generation, "Discarding stale search response");
                return Ok(SearchOutcome::Superseded);
            }
            state.in_flight = None;

            state.view.render_results(&response.results);
            let meta_display = MetaDisplay::from_meta(&response.meta);
            state.view.show_meta(meta_display.clone());
            state.view.reset_scroll();
            debug!(summary = %meta_display.summary(), "Rendered search response");

            if corrected.is_none() {
                if let Some(page) = corrected_page(&response.meta) {
                    info!(
                        offset = response.meta.offset,
                        matches = response.meta.matches,
                        page,
                        "Requested page is out of range, retrying at last page"
                    );
                    form.page = page;
                    push_history = false;
                    corrected = Some(page);
                    continue;
                }
            }

            return Ok(SearchOutcome::Rendered {
                display: meta_display,
                results: response.results.len(),
                corrected_page: corrected,
            });
        }
    }

    async fn replay_entry(&self, entry: Option<HistoryEntry>) -> Result<Option<SearchOutcome>> {
        let Some(entry) = entry else { return Ok(None) };
        self.state.lock().await.view.navigate(&entry.url);
        self.search(entry.state, false).await.map(Some)
    }
}
