//! Wire types for the backend's login, search and blog listing endpoints.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the backend renders each post into the `rendered` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Renderer {
    Plain,
    #[default]
    Html,
    Embed,
}

impl Renderer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Renderer::Plain => "plain",
            Renderer::Html => "html",
            Renderer::Embed => "embed",
        }
    }
}

impl fmt::Display for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Renderer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plain" => Ok(Renderer::Plain),
            "html" => Ok(Renderer::Html),
            "embed" => Ok(Renderer::Embed),
            other => Err(format!("unknown renderer '{other}', expected plain, html or embed")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Relevance,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::Relevance => "relevance",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "relevance" => Ok(SortOrder::Relevance),
            other => Err(format!("unknown sort order '{other}', expected newest, oldest or relevance")),
        }
    }
}

/// Body of `POST /search`. Built fresh from the search form on every action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub blog: String,
    pub query: String,
    pub page: u32,
    pub render: Renderer,
    pub sort: SortOrder,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<ResultItem>,
    #[serde(default)]
    pub meta: SearchMeta,
}

impl SearchResponse {
    /// Decodes a `/search` body. A bare `{"error": ...}` envelope, which the
    /// backend sends when it rejects the request before searching, becomes an
    /// empty response whose meta carries the error.
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        let mut value: serde_json::Value = serde_json::from_str(body)?;
        if let Some(obj) = value.as_object_mut() {
            if !obj.contains_key("meta") {
                if let Some(error) = obj.remove("error") {
                    obj.insert("meta".into(), serde_json::json!({ "error": error }));
                }
            }
        }
        serde_json::from_value(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    /// Pre-sanitized HTML produced by the backend renderer.
    pub rendered: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub blog_name: String,
    pub post_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_hf: Option<String>,
}

impl ResultItem {
    /// Human readable post date, preferring the backend's own formatting.
    pub fn display_date(&self) -> Option<String> {
        if let Some(hf) = &self.timestamp_hf {
            return Some(hf.clone());
        }
        let ts = self.timestamp?;
        DateTime::<Utc>::from_timestamp(ts, 0).map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
    }
}

/// Error responses may carry nothing but `error`, so every count defaults to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMeta {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub matches: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub pagesize: u64,
    #[serde(default)]
    pub time_ns: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One entry of the backend's blog listing. `latest` and `earliest` are
/// epoch seconds of the newest and oldest indexed post, absent for an empty
/// index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogSummary {
    pub name: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub latest: Option<f64>,
    #[serde(default)]
    pub earliest: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_only_meta_decodes() {
        let resp = SearchResponse::from_json(r#"{"error": "Invalid renderer: x."}"#).unwrap();
        assert!(resp.results.is_empty());
        assert_eq!(resp.meta.error.as_deref(), Some("Invalid renderer: x."));

        let resp =
            SearchResponse::from_json(r#"{"results": [], "meta": {"offset": 0, "pagesize": 50, "matches": 0, "error": "Syntax: <expression> AND <expression>"}}"#)
                .unwrap();
        assert_eq!(resp.meta.error.as_deref(), Some("Syntax: <expression> AND <expression>"));
        assert_eq!(resp.meta.count, 0);
        assert_eq!(resp.meta.time_ns, 0);
    }

    #[test]
    fn result_item_ignores_extra_fields() {
        let raw = r#"{
            "rendered": "<p>hi</p>",
            "tags": ["art", "wip"],
            "blog_name": "staff",
            "post_url": "https://staff.tumblr.com/post/1",
            "id": 1,
            "timestamp": 1600000000,
            "timestamp_hf": "2020-09-13",
            "note_count": 12
        }"#;
        let item: ResultItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.tags, vec!["art", "wip"]);
        assert_eq!(item.display_date().as_deref(), Some("2020-09-13"));
    }

    #[test]
    fn display_date_falls_back_to_timestamp() {
        let item = ResultItem {
            rendered: String::new(),
            tags: vec![],
            blog_name: "staff".into(),
            post_url: String::new(),
            id: None,
            timestamp: Some(0),
            timestamp_hf: None,
        };
        assert_eq!(item.display_date().as_deref(), Some("1970-01-01 00:00:00 UTC"));
    }

    #[test]
    fn blog_listing_decodes_empty_index() {
        let raw = r#"[
            {"name": "staff", "count": 12, "latest": 1600000000.0, "earliest": 1500000000.0},
            {"name": "empty", "count": 0, "latest": null, "earliest": null}
        ]"#;
        let blogs: Vec<BlogSummary> = serde_json::from_str(raw).unwrap();
        assert_eq!(blogs.len(), 2);
        assert_eq!(blogs[0].latest, Some(1_600_000_000.0));
        assert_eq!(blogs[1].count, 0);
        assert_eq!(blogs[1].earliest, None);
    }

    #[test]
    fn request_serializes_lowercase_enums() {
        let req = SearchRequest {
            blog: "staff".into(),
            query: "tag:art".into(),
            page: 2,
            render: Renderer::Embed,
            sort: SortOrder::Relevance,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["page"], 2);
        assert_eq!(v["render"], "embed");
        assert_eq!(v["sort"], "relevance");
    }

    #[test]
    fn renderer_parses_case_insensitively() {
        assert_eq!("PLAIN".parse::<Renderer>(), Ok(Renderer::Plain));
        assert!("markdown".parse::<Renderer>().is_err());
        assert_eq!(" Oldest ".parse::<SortOrder>(), Ok(SortOrder::Oldest));
    }
}
