pub mod config;
pub mod login;
pub mod navigate;
pub mod preview;
pub mod search;

pub use config::{GetConfigInfoParams, SetPreferencesParams};
pub use login::{LoginParams, LogoutParams};
pub use navigate::{HistoryParams, OpenLocationParams};
pub use preview::TogglePreviewParams;
pub use search::{ListBlogsParams, PaginateParams, SearchParams};
