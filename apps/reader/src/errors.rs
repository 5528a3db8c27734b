use thiserror::Error;

/// Likely causes shown alongside any collaborator failure.
pub const LIKELY_CAUSES: &[&str] = &[
    "API key is invalid or missing",
    "Network connection problem",
    "The remote service is unavailable",
];

/// Application-level error type.
/// Every pipeline operation returns `Result<T, AppError>`; the host prints
/// `Display` plus `likely_causes()`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Caller supplied unusable input. Raised before any external call.
    #[error("Input error: {0}")]
    Input(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A collaborator returned non-success or timed out.
    #[error("{service} error{}: {message}", status_suffix(.status))]
    Upstream {
        service: &'static str,
        status: Option<u16>,
        message: String,
    },

    /// Synthesis response carried no recognizable audio payload.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invariant violation: {0}")]
    Invariant(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (status {code})"),
        None => String::new(),
    }
}

const INPUT_CAUSES: &[&str] = &[
    "The word list is empty or contains only whitespace",
    "The requested article count or level is out of range",
];

const NOT_FOUND_CAUSES: &[&str] = &[
    "The article number does not exist in the current run",
    "No articles have been generated yet",
];

const GENERATED_TEXT_CAUSES: &[&str] = &[
    "The model returned only formatting or an empty reply",
    "The model ignored the output format instructions",
];

const RENDER_CAUSES: &[&str] = &[
    "The document could not be assembled from the annotated rows",
    "The process ran out of memory while packing the document",
];

const LOCAL_CAUSES: &[&str] = &[
    "The output directory is missing or not writable",
    "The disk is full",
];

impl AppError {
    /// Short list of probable causes, shown next to the error message.
    pub fn likely_causes(&self) -> &'static [&'static str] {
        match self {
            AppError::Upstream { .. } | AppError::Decode(_) => LIKELY_CAUSES,
            AppError::Input(_) => INPUT_CAUSES,
            AppError::NotFound(_) => NOT_FOUND_CAUSES,
            AppError::Invariant(_) => GENERATED_TEXT_CAUSES,
            AppError::Render(_) => RENDER_CAUSES,
            AppError::Io(_) | AppError::Internal(_) => LOCAL_CAUSES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_display_includes_status() {
        let err = AppError::Upstream {
            service: "generation",
            status: Some(401),
            message: "invalid api key".to_string(),
        };
        assert_eq!(err.to_string(), "generation error (status 401): invalid api key");
    }

    #[test]
    fn test_upstream_display_without_status() {
        let err = AppError::Upstream {
            service: "speech",
            status: None,
            message: "timed out after 60s".to_string(),
        };
        assert_eq!(err.to_string(), "speech error: timed out after 60s");
    }

    #[test]
    fn test_external_failures_share_collaborator_causes() {
        let upstream = AppError::Upstream {
            service: "generation",
            status: Some(503),
            message: String::new(),
        };
        assert_eq!(upstream.likely_causes(), LIKELY_CAUSES);
        assert_eq!(AppError::Decode("x".into()).likely_causes(), LIKELY_CAUSES);
    }

    #[test]
    fn test_every_error_has_likely_causes() {
        let errors = [
            AppError::Input("x".into()),
            AppError::NotFound("x".into()),
            AppError::Invariant("x".into()),
            AppError::Render("x".into()),
            AppError::Io(std::io::Error::other("x")),
            AppError::Internal(anyhow::anyhow!("x")),
        ];
        for err in &errors {
            assert!(!err.likely_causes().is_empty(), "{err}");
            assert_ne!(err.likely_causes(), LIKELY_CAUSES, "{err}");
        }
    }
}
