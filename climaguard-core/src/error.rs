use thiserror::Error;

/// Terminal failures of a single risk or export request.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid date '{input}'. Use YYYY-MM-DD")]
    InvalidDate { input: String },

    #[error(
        "Could not geocode location '{query}'. Please try format: 'City Name' or 'latitude,longitude'"
    )]
    Resolution { query: String },

    #[error("Failed to fetch climate data: {0:#}")]
    UpstreamFetch(#[source] anyhow::Error),

    #[error("Failed to store chart artifact: {0:#}")]
    Artifact(#[source] anyhow::Error),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl QueryError {
    /// Validation errors are the caller's fault; the rest are environmental.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            QueryError::InvalidDate { .. } | QueryError::Resolution { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Export output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Unknown export format '{0}'. Supported formats: csv, json.")]
    UnknownFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_failures_are_request_errors_but_not_user_errors() {
        let err = QueryError::from(ExportError::UnknownFormat("xml".to_string()));

        assert!(matches!(err, QueryError::Export(ExportError::UnknownFormat(_))));
        assert!(!err.is_user_error());
        assert_eq!(
            err.to_string(),
            "Unknown export format 'xml'. Supported formats: csv, json."
        );

        let wrapped = anyhow::Error::from(err);
        assert!(wrapped.downcast_ref::<QueryError>().is_some());
    }

    #[test]
    fn validation_errors_are_user_errors() {
        let err = QueryError::InvalidDate {
            input: "2024-02-30".to_string(),
        };
        assert!(err.is_user_error());
        assert_eq!(err.to_string(), "Invalid date '2024-02-30'. Use YYYY-MM-DD");
    }
}
