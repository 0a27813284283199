//! Form state the way the page holds it between actions.

use crate::api::{Renderer, SearchRequest, SortOrder};
use serde::{Deserialize, Serialize};

/// Named fields in document order. Submitting a form sends every field as a
/// string-valued JSON member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: Vec<(String, String)>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Replaces the first field called `name`, or appends a new one.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn payload(&self) -> serde_json::Map<String, serde_json::Value> {
        self.fields
            .iter()
            .map(|(n, v)| (n.clone(), serde_json::Value::String(v.clone())))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Form {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = Form::new();
        for (k, v) in iter {
            form.set(k, v);
        }
        form
    }
}

/// The login form: `username` and `password`.
pub fn login_form(username: &str, password: &str) -> Form {
    Form::new().with("username", username).with("password", password)
}

/// The search form's fields. A snapshot of this is what history entries and
/// the search session remember.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchForm {
    pub blog: String,
    pub query: String,
    pub page: u32,
    pub render: Renderer,
    pub sort: SortOrder,
}

impl SearchForm {
    pub fn new(blog: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            blog: blog.into(),
            query: query.into(),
            page: 1,
            render: Renderer::default(),
            sort: SortOrder::default(),
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_render(mut self, render: Renderer) -> Self {
        self.render = render;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn to_request(&self) -> SearchRequest {
        SearchRequest {
            blog: self.blog.clone(),
            query: self.query.clone(),
            page: self.page.max(1),
            render: self.render,
            sort: self.sort,
        }
    }
}

impl Default for SearchForm {
    fn default() -> Self {
        Self::new("", "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_in_place() {
        let mut form = Form::new().with("username", "a").with("password", "b");
        form.set("username", "c");
        assert_eq!(form.get("username"), Some("c"));
        let keys: Vec<_> = form.payload().keys().cloned().collect();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"username".to_string()));
    }

    #[test]
    fn payload_is_string_valued() {
        let form = login_form("me@example.org", "hunter2");
        let payload = serde_json::Value::Object(form.payload());
        assert_eq!(payload, serde_json::json!({"username": "me@example.org", "password": "hunter2"}));
    }

    #[test]
    fn collects_from_pairs() {
        let form: Form = [("blog", "staff"), ("query", "art")].into_iter().collect();
        assert_eq!(form.get("blog"), Some("staff"));
        assert_eq!(form.get("page"), None);
    }

    #[test]
    fn page_is_never_zero() {
        let form = SearchForm::new("staff", "art").with_page(0);
        assert_eq!(form.page, 1);
        let mut form = SearchForm::new("staff", "art");
        form.page = 0;
        assert_eq!(form.to_request().page, 1);
    }
}
