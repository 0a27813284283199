use crate::api::{Renderer, SortOrder};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetConfigInfoParams {}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SetPreferencesParams {
    /// Backend renderer for result bodies: "plain", "html" or "embed"
    #[serde(default)]
    pub render: Option<Renderer>,

    /// Result ordering: "newest", "oldest" or "relevance"
    #[serde(default)]
    pub sort: Option<SortOrder>,
}

impl SetPreferencesParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.render.is_none() && self.sort.is_none() {
            return Err("Nothing to change: set render and/or sort".into());
        }
        Ok(())
    }
}
