use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TogglePreviewParams {
    /// Zero-based position of the result in the current list
    pub index: usize,
}
