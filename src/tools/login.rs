use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LoginParams {
    /// User name or email address
    pub username: String,

    /// Account password
    pub password: String,
}

impl LoginParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("Username cannot be empty".into());
        }
        if self.username.len() > 320 {
            return Err("Username exceeds 320 characters".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct LogoutParams {}
