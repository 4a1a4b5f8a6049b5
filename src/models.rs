use serde::{Deserialize, Serialize};

/// A document parser attached to the authenticated account.
///
/// The service returns more fields than these; only the identifier and the
/// human-chosen label are modeled, everything else is ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Parser {
    pub id: String,
    pub label: String,
}

/// Which documents `get_multiple_results` should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListMode {
    /// The most recently uploaded documents, capped by `limit`.
    #[default]
    LastUploaded,
    /// Documents uploaded after a given date. Requires `date`.
    UploadedAfter,
    /// Documents processed after a given date. Requires `date`.
    ProcessedAfter,
}

impl ListMode {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::LastUploaded => "last_uploaded",
            Self::UploadedAfter => "uploaded_after",
            Self::ProcessedAfter => "processed_after",
        }
    }

    /// `true` for the modes that require a `date` filter.
    pub(crate) fn is_date_based(&self) -> bool {
        matches!(self, Self::UploadedAfter | Self::ProcessedAfter)
    }
}

/// Timestamp field used to order result listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    ParsedAt,
    ProcessedAt,
    #[default]
    UploadedAt,
    FirstProcessedAt,
    ImportedAt,
    IntegratedAt,
    DispatchedWebhookAt,
    PreprocessedAt,
}

impl SortBy {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::ParsedAt => "parsed_at",
            Self::ProcessedAt => "processed_at",
            Self::UploadedAt => "uploaded_at",
            Self::FirstProcessedAt => "first_processed_at",
            Self::ImportedAt => "imported_at",
            Self::IntegratedAt => "integrated_at",
            // The service spells this field without the "h".
            Self::DispatchedWebhookAt => "dispatched_webook_at",
            Self::PreprocessedAt => "preprocessed_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// The service expects the order uppercased.
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Filtering and ordering options for `get_multiple_results`.
///
/// # Example
///
/// ```
/// use docparser::{ListMode, ResultsQuery};
///
/// let query = ResultsQuery {
///     list: ListMode::UploadedAfter,
///     date: Some("2024-03-01T00:00:00".into()),
///     ..Default::default()
/// };
/// # let _ = query;
/// ```
#[derive(Debug, Clone)]
pub struct ResultsQuery {
    pub list: ListMode,
    /// Maximum number of results, meaningful for [`ListMode::LastUploaded`].
    /// Default: 100.
    pub limit: u32,
    /// ISO 8601 timestamp. Mandatory for the date-based list modes.
    pub date: Option<String>,
    /// Restrict to documents uploaded with this remote id.
    pub remote_id: Option<String>,
    /// Include documents still in the processing queue. Default: false.
    pub include_processing_queue: bool,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl Default for ResultsQuery {
    fn default() -> Self {
        Self {
            list: ListMode::LastUploaded,
            limit: 100,
            date: None,
            remote_id: None,
            include_processing_queue: false,
            sort_by: SortBy::UploadedAt,
            sort_order: SortOrder::Desc,
        }
    }
}

// ---------------------------------------------------------------------------
// Internal deserialization helpers (not part of the public API surface)
// ---------------------------------------------------------------------------

/// GET /ping response.
#[derive(Deserialize)]
pub(crate) struct PingResponse {
    #[serde(default)]
    pub msg: String,
}

/// POST /document/upload and /document/fetch response.
#[derive(Deserialize)]
pub(crate) struct UploadResponse {
    pub id: String,
}
