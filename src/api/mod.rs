mod client;
mod types;

pub use client::XapblrClient;
pub use types::{
    BlogSummary, LoginResponse, Renderer, ResultItem, SearchMeta, SearchRequest, SearchResponse, SortOrder,
};
