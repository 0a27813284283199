//! Metadata panel selection and page range checks over a response's meta.

use crate::api::SearchMeta;
use serde::Serialize;

/// Which metadata panel a response selects. Exactly one is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum MetaDisplay {
    Error {
        message: String,
    },
    Partial {
        match_start: u64,
        match_end: u64,
        matches_total: u64,
        elapsed_ms: u64,
    },
    Complete {
        count: u64,
        elapsed_ms: u64,
    },
}

impl MetaDisplay {
    pub fn from_meta(meta: &SearchMeta) -> Self {
        if let Some(message) = &meta.error {
            return MetaDisplay::Error { message: message.clone() };
        }
        let elapsed_ms = elapsed_ms(meta.time_ns);
        if meta.count < meta.matches {
            MetaDisplay::Partial {
                match_start: meta.offset.saturating_add(1),
                match_end: meta.offset.saturating_add(meta.count),
                matches_total: meta.matches,
                elapsed_ms,
            }
        } else {
            MetaDisplay::Complete { count: meta.count, elapsed_ms }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, MetaDisplay::Error { .. })
    }

    /// One-line summary for plain text surfaces.
    pub fn summary(&self) -> String {
        match self {
            MetaDisplay::Error { message } => format!("Error: {message}"),
            MetaDisplay::Partial { match_start, match_end, matches_total, elapsed_ms } => {
                format!("Results {match_start}-{match_end} of {matches_total} ({elapsed_ms} ms)")
            }
            MetaDisplay::Complete { count, elapsed_ms } => format!("{count} results ({elapsed_ms} ms)"),
        }
    }
}

/// `round(time_ns / 1e6)`, half away from zero.
pub fn elapsed_ms(time_ns: u64) -> u64 {
    time_ns / 1_000_000 + u64::from(time_ns % 1_000_000 >= 500_000)
}

/// Total number of pages for `matches` results at `pagesize` per page.
pub fn page_count(matches: u64, pagesize: u64) -> u64 {
    if pagesize == 0 {
        return 0;
    }
    matches.div_ceil(pagesize)
}

/// The last valid page when the response's offset lies past every match.
/// Error responses never ask for a correction.
pub fn corrected_page(meta: &SearchMeta) -> Option<u32> {
    if meta.error.is_some() || meta.offset <= meta.matches {
        return None;
    }
    let pages = page_count(meta.matches, meta.pagesize).max(1);
    Some(u32::try_from(pages).unwrap_or(u32::MAX))
}
