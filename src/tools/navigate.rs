use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct HistoryParams {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OpenLocationParams {
    /// Search page path, e.g. "/search/staff/tag:art/page/2"
    pub path: String,
}

impl OpenLocationParams {
    pub fn validate(&self) -> Result<(), String> {
        let path = self.path.trim();
        if path.is_empty() {
            return Err("Path cannot be empty".into());
        }
        if path.len() > 2048 {
            return Err("Path exceeds 2048 characters".into());
        }
        if !path.starts_with("/search") {
            return Err("Path must start with /search".into());
        }
        Ok(())
    }
}
