use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Blog to search
    pub blog: String,

    /// Query string (max 2000 characters), e.g. "tag:art date:2020-01-01..2020-12-31"
    #[serde(default)]
    pub query: String,
}

impl SearchParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.blog.trim().is_empty() {
            return Err("Blog cannot be empty".into());
        }
        if self.blog.len() > 256 {
            return Err("Blog name exceeds 256 characters".into());
        }
        if self.query.len() > 2000 {
            return Err("Query exceeds 2000 characters".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PaginateParams {
    /// Page to show (1-based). Omit to replay the current page.
    #[serde(default)]
    pub page: Option<u32>,
}

impl PaginateParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.page == Some(0) {
            return Err("page must be 1 or greater".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListBlogsParams {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_requires_blog() {
        let params = SearchParams { blog: "  ".into(), query: "art".into() };
        assert!(params.validate().is_err());
        let params = SearchParams { blog: "staff".into(), query: String::new() };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn paginate_rejects_page_zero() {
        assert!(PaginateParams { page: Some(0) }.validate().is_err());
        assert!(PaginateParams { page: None }.validate().is_ok());
        assert!(PaginateParams { page: Some(3) }.validate().is_ok());
    }
}
