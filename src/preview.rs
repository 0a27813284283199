use serde::Serialize;

pub const CLIPPED_MAX_HEIGHT: &str = "100px";

/// Whether a result body is cut off at a fixed height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preview {
    #[default]
    Clipped,
    Unclipped,
}

impl Preview {
    pub fn toggle(self) -> Self {
        match self {
            Preview::Clipped => Preview::Unclipped,
            Preview::Unclipped => Preview::Clipped,
        }
    }

    /// Inline style for the result body; `None` means no override.
    pub fn body_style(self) -> Option<String> {
        match self {
            Preview::Clipped => Some(format!("max-height: {CLIPPED_MAX_HEIGHT}; overflow: hidden")),
            Preview::Unclipped => None,
        }
    }
}
