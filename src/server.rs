use crate::api::XapblrClient;
use crate::config::Config;
use crate::controller::SearchController;
use crate::error::ClientError;
use crate::form::SearchForm;
use crate::render::PageView;
use crate::tools::{
    GetConfigInfoParams, HistoryParams, ListBlogsParams, LoginParams, LogoutParams, OpenLocationParams,
    PaginateParams, SearchParams, SetPreferencesParams, TogglePreviewParams,
};

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{Implementation, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct XapblrSearchServer {
    pub config: Config,
    pub controller: Arc<SearchController<PageView>>,
}

impl XapblrSearchServer {
    pub fn new(config: Config) -> crate::error::Result<Self> {
        let client = XapblrClient::new(&config)?;
        let defaults = SearchForm::default().with_render(config.render).with_sort(config.sort);
        let controller = SearchController::new(client, PageView::new(), defaults);
        Ok(Self { config, controller: Arc::new(controller) })
    }

    async fn page_payload<T: Serialize>(&self, outcome: T) -> Result<String, McpError> {
        let page = self.controller.with_view(|view| serde_json::to_value(view)).await.map_err(internal)?;
        let payload = serde_json::json!({ "outcome": outcome, "page": page });
        serde_json::to_string_pretty(&payload).map_err(internal)
    }
}

fn internal(e: impl ToString) -> McpError {
    McpError::internal_error(e.to_string(), None)
}

fn to_mcp(e: ClientError) -> McpError {
    match e {
        ClientError::NoActiveSearch | ClientError::NoSuchResult { .. } | ClientError::InvalidLocation(_) => {
            McpError::invalid_params(e.to_string(), None)
        }
        other => internal(other),
    }
}

#[tool_router]
impl XapblrSearchServer {
    #[tool(description = r#"
    Logs in to the search backend. The status element of the returned page carries the
    backend's message with class "success" or "failure"; on success the page moves to /search.
    "#)]
    pub async fn login(&self, Parameters(params): Parameters<LoginParams>) -> Result<String, McpError> {
        params.validate().map_err(|msg| McpError::invalid_params(msg, None))?;
        let response = self.controller.login(params.username.trim(), &params.password).await.map_err(to_mcp)?;
        self.page_payload(response).await
    }

    #[tool(description = "Logs out of the search backend, clears the login status and returns the page to /.")]
    pub async fn logout(&self, _params: Parameters<LogoutParams>) -> Result<String, McpError> {
        self.controller.logout().await.map_err(to_mcp)?;
        self.page_payload(serde_json::json!({ "logged_out": true })).await
    }

    #[tool(description = r#"
    Lists the blogs the backend has indexed, with post counts and the epoch timestamps of the
    newest and oldest indexed posts. The list is also offered on the page as blog choices.
    "#)]
    pub async fn list_blogs(&self, _params: Parameters<ListBlogsParams>) -> Result<String, McpError> {
        let blogs = self.controller.list_blogs().await.map_err(to_mcp)?;
        self.page_payload(serde_json::json!({ "blog_count": blogs.len() })).await
    }

    #[tool(description = r#"
    Starts a new search of `blog` for `query`. Always shows page 1 and adds a history entry.

    Returns
    -------
    str
        JSON with `outcome` (the metadata panel shown: error, partial or complete) and `page`
        (location, metadata panel, rendered results with tag links and preview state).
    "#)]
    pub async fn search(&self, Parameters(params): Parameters<SearchParams>) -> Result<String, McpError> {
        params.validate().map_err(|msg| McpError::invalid_params(msg, None))?;
        let outcome = self
            .controller
            .submit_search(params.blog.trim(), params.query.trim())
            .await
            .map_err(to_mcp)?;
        self.page_payload(outcome).await
    }

    #[tool(description = r#"
    Shows another page of the last search without adding a history entry. A page past the
    last match is corrected to the last page automatically.
    "#)]
    pub async fn paginate(&self, Parameters(params): Parameters<PaginateParams>) -> Result<String, McpError> {
        params.validate().map_err(|msg| McpError::invalid_params(msg, None))?;
        let outcome = self.controller.paginate(params.page).await.map_err(to_mcp)?;
        self.page_payload(outcome).await
    }

    #[tool(description = "Goes back to the previous search in history and shows it again.")]
    pub async fn go_back(&self, _params: Parameters<HistoryParams>) -> Result<String, McpError> {
        let outcome = self.controller.back().await.map_err(to_mcp)?;
        self.page_payload(outcome).await
    }

    #[tool(description = "Goes forward to the next search in history and shows it again.")]
    pub async fn go_forward(&self, _params: Parameters<HistoryParams>) -> Result<String, McpError> {
        let outcome = self.controller.forward().await.map_err(to_mcp)?;
        self.page_payload(outcome).await
    }

    #[tool(description = r#"
    Opens a search page by path: /search, /search/<blog>, /search/<blog>/<query> or
    /search/<blog>/<query>/page/<n>. The form is prefilled from the path and the search runs.
    "#)]
    pub async fn open_location(&self, Parameters(params): Parameters<OpenLocationParams>) -> Result<String, McpError> {
        params.validate().map_err(|msg| McpError::invalid_params(msg, None))?;
        let outcome = self.controller.open(params.path.trim()).await.map_err(to_mcp)?;
        self.page_payload(outcome).await
    }

    #[tool(description = "Expands or collapses the body of the result at `index` (0-based).")]
    pub async fn toggle_preview(&self, Parameters(params): Parameters<TogglePreviewParams>) -> Result<String, McpError> {
        let preview = self.controller.toggle_preview(params.index).await.map_err(to_mcp)?;
        self.page_payload(serde_json::json!({ "index": params.index, "preview": preview })).await
    }

    #[tool(description = r#"
    Returns the client configuration and the current search state.

    Returns
    -------
    str
        JSON with `base_url`, `render`, `sort`, timeouts, `log_level`, `config_file`,
        `form` (current search form fields), `last_search` and `history_len`.
    "#)]
    pub async fn get_config_info(&self, _params: Parameters<GetConfigInfoParams>) -> Result<String, McpError> {
        let payload = serde_json::json!({
            "base_url": &self.config.base_url,
            "render": self.config.render,
            "sort": self.config.sort,
            "connect_timeout": self.config.connect_timeout,
            "request_timeout": self.config.request_timeout,
            "log_level": &self.config.log_level,
            "config_file": Config::config_file_path().to_string_lossy(),
            "form": self.controller.form().await,
            "last_search": self.controller.last_search().await,
            "history_len": self.controller.history_len().await,
        });

        serde_json::to_string_pretty(&payload).map_err(internal)
    }

    #[tool(description = r#"
    Changes the renderer ("plain", "html", "embed") and/or sort order ("newest", "oldest",
    "relevance") used by later searches, and persists them to the config file.
    "#)]
    pub async fn set_preferences(&self, Parameters(params): Parameters<SetPreferencesParams>) -> Result<String, McpError> {
        params.validate().map_err(|msg| McpError::invalid_params(msg, None))?;

        self.controller.set_preferences(params.render, params.sort).await;
        let form = self.controller.form().await;

        let payload = match Config::save_preferences(params.render, params.sort) {
            Ok(()) => serde_json::json!({
                "status": "saved",
                "render": form.render,
                "sort": form.sort,
                "config_file": Config::config_file_path().to_string_lossy(),
            }),
            Err(e) => serde_json::json!({
                "status": "applied",
                "render": form.render,
                "sort": form.sort,
                "message": format!("Preferences apply to this session but could not be saved: {e}"),
            }),
        };

        serde_json::to_string_pretty(&payload).map_err(internal)
    }
}

#[tool_handler(router = Self::tool_router())]
impl ServerHandler for XapblrSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "xapblr-client".into(),
                title: None,
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
