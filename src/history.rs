//! Navigation history over search form snapshots.

use crate::error::{ClientError, Result};
use crate::form::SearchForm;
use serde::Serialize;

/// `/search/<blog>/<query>`, plus `/page/<n>` past the first page.
pub fn search_location(blog: &str, query: &str, page: u32) -> String {
    let mut url = format!("/search/{}/{}", urlencoding::encode(blog), urlencoding::encode(query));
    if page > 1 {
        url.push_str(&format!("/page/{page}"));
    }
    url
}

/// Blog, query and page addressed by a search location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub blog: String,
    pub query: String,
    pub page: u32,
}

impl Location {
    /// Accepts every shape the backend serves a prefilled search page for:
    /// `/search`, `/search/<blog>`, `/search/<blog>/<query>` and
    /// `/search/<blog>/<query>/page/<n>`.
    pub fn parse(path: &str) -> Result<Self> {
        let invalid = || ClientError::InvalidLocation(path.to_string());
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let mut segments = path.trim_matches('/').split('/');

        if segments.next() != Some("search") {
            return Err(invalid());
        }
        let rest: Vec<&str> = segments.collect();
        let decode = |s: &str| urlencoding::decode(s).map(|c| c.into_owned()).map_err(|_| invalid());

        let (blog, query, page) = match rest[..] {
            [] => (String::new(), String::new(), 1),
            [blog] => (decode(blog)?, String::new(), 1),
            [blog, query] => (decode(blog)?, decode(query)?, 1),
            [blog, query, "page", n] => {
                let page: u32 = n.parse().map_err(|_| invalid())?;
                (decode(blog)?, decode(query)?, page.max(1))
            }
            _ => return Err(invalid()),
        };
        Ok(Self { blog, query, page })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub url: String,
    pub state: SearchForm,
}

impl HistoryEntry {
    pub fn for_form(form: &SearchForm) -> Self {
        Self {
            url: search_location(&form.blog, &form.query, form.page),
            state: form.clone(),
        }
    }
}

/// Back/forward stack. Pushing drops any forward entries, like a browser does.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        self.entries.push(entry);
        self.cursor = Some(self.entries.len() - 1);
    }

    pub fn replace(&mut self, entry: HistoryEntry) {
        if self.is_empty() {
            return self.push(entry);
        }
        let c = self.cursor.unwrap_or(0);
        self.entries[c] = entry;
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.map(|c| &self.entries[c])
    }

    pub fn back(&mut self) -> Option<&HistoryEntry> {
        let c = self.cursor?;
        if c == 0 {
            return None;
        }
        self.cursor = Some(c - 1);
        self.current()
    }

    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        let c = self.cursor?;
        if c + 1 >= self.entries.len() {
            return None;
        }
        self.cursor = Some(c + 1);
        self.current()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
