use crate::api::{Renderer, SortOrder};
use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "xapblr-client";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub render: Renderer,
    pub sort: SortOrder,
    pub connect_timeout: u64,
    pub request_timeout: u64,
    pub log_level: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    render: Option<Renderer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sort: Option<SortOrder>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let base_url = env_required("XAPBLR_URL")?;
        validate_url(&base_url)?;

        let persisted = read_persisted_config();

        let render = match persisted.render {
            Some(render) => render,
            None => env_parse("XAPBLR_RENDER")?.unwrap_or_default(),
        };
        let sort = match persisted.sort {
            Some(sort) => sort,
            None => env_parse("XAPBLR_SORT")?.unwrap_or_default(),
        };

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            render,
            sort,
            connect_timeout: env_u64_range("XAPBLR_CONNECT_TIMEOUT", 10, 1, 60)?,
            request_timeout: env_u64_range("XAPBLR_REQUEST_TIMEOUT", 30, 1, 300)?,
            log_level: env_opt("XAPBLR_LOG_LEVEL").unwrap_or_else(|| "INFO".into()).to_uppercase(),
        })
    }

    /// Config for talking to `base_url` with every other knob at its default.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            render: Renderer::default(),
            sort: SortOrder::default(),
            connect_timeout: 10,
            request_timeout: 30,
            log_level: "INFO".into(),
        }
    }

    pub fn save_preferences(render: Option<Renderer>, sort: Option<SortOrder>) -> Result<()> {
        let mut cfg = read_persisted_config();
        if render.is_some() {
            cfg.render = render;
        }
        if sort.is_some() {
            cfg.sort = sort;
        }
        write_config_atomic(&cfg)
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
    }

    pub fn config_file_path() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE_NAME)
    }
}

fn env_required(name: &str) -> Result<String> {
    env_opt(name).ok_or_else(|| {
        ClientError::ConfigMissing(format!(
            "{name} not configured. Point it at the search backend, e.g. {name}=http://localhost:5000"
        ))
    })
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr<Err = String>,
{
    let Some(raw) = env_opt(name) else { return Ok(None) };
    raw.parse()
        .map(Some)
        .map_err(|e| ClientError::ConfigInvalid(format!("{name}: {e}")))
}

fn env_u64_range(name: &str, default: u64, min: u64, max: u64) -> Result<u64> {
    let Some(raw) = env_opt(name) else { return Ok(default) };
    let val: u64 = raw.trim().parse().map_err(|_| {
        ClientError::ConfigInvalid(format!("{name} must be an integer between {min} and {max}"))
    })?;
    if !(min..=max).contains(&val) {
        return Err(ClientError::ConfigInvalid(format!("{name} must be an integer between {min} and {max}")));
    }
    Ok(val)
}

fn validate_url(url: &str) -> Result<()> {
    let url = url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ClientError::ConfigInvalid("XAPBLR_URL must be a valid http or https URL".into()));
    }
    Ok(())
}

fn read_persisted_config() -> PersistedConfig {
    let path = Config::config_file_path();
    std::fs::read_to_string(&path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

fn write_config_atomic(cfg: &PersistedConfig) -> Result<()> {
    let path = Config::config_file_path();
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));

    std::fs::create_dir_all(&dir).map_err(|e| ClientError::ConfigFile {
        path: dir.clone(),
        message: e.to_string(),
    })?;

    let tmp = dir.join(format!(".config.tmp.{}", std::process::id()));
    let data = serde_json::to_string_pretty(cfg)?;

    std::fs::write(&tmp, format!("{data}\n")).map_err(|e| ClientError::ConfigFile {
        path: tmp.clone(),
        message: e.to_string(),
    })?;

    std::fs::rename(&tmp, &path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        ClientError::ConfigFile { path, message: e.to_string() }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_base_url_strips_trailing_slash() {
        let config = Config::with_base_url("http://localhost:5000/");
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.render, Renderer::Html);
        assert_eq!(config.sort, SortOrder::Newest);
    }

    #[test]
    fn url_must_be_http() {
        assert!(validate_url("https://example.org").is_ok());
        assert!(validate_url(" http://127.0.0.1:5000 ").is_ok());
        assert!(matches!(validate_url("ftp://example.org"), Err(ClientError::ConfigInvalid(_))));
    }

    #[test]
    fn persisted_config_keeps_unknown_keys() {
        let raw = r#"{"render":"plain","theme":"dark"}"#;
        let cfg: PersistedConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(cfg.render, Some(Renderer::Plain));
        assert_eq!(cfg.sort, None);
        let out = serde_json::to_value(&cfg).unwrap();
        assert_eq!(out["theme"], "dark");
        assert!(out.get("sort").is_none());
    }
}
