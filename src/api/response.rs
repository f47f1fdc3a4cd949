//! Success and failure payloads returned by every operation

use crate::extract::ExtractionRecord;
use crate::state::{PageSummary, Termination};
use crate::target::Target;
use crate::TrawlError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::error::Error as _;

/// Data returned by a search
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub target: Target,
    pub query: String,
    /// Generated engine URL; absent for generic sites
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_url: Option<Target>,
    pub match_count: usize,
    pub results: Vec<ExtractionRecord>,
    pub completed_at: DateTime<Utc>,
}

/// Data returned by a scroll
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollReport {
    pub target: Target,
    pub pages_requested: u32,
    pub pages_completed: usize,
    pub termination: Termination,
    pub pages: Vec<PageSummary>,
    pub completed_at: DateTime<Utc>,
}

/// Body of a success payload: `success: true` followed by the data fields
#[derive(Debug, Clone, Serialize)]
pub struct Success<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

/// Body of a failure payload
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub success: bool,
    /// Machine-readable kind, e.g. `validation_error`
    pub error: &'static str,
    pub message: String,
    /// Underlying error chain, outermost first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

/// Outcome of an operation as reported to callers
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response<T> {
    Success(Success<T>),
    Failure(Failure),
}

impl<T> Response<T> {
    pub fn success(data: T) -> Self {
        Self::Success(Success {
            success: true,
            data,
        })
    }

    pub fn failure(err: &TrawlError) -> Self {
        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }

        Self::Failure(Failure {
            success: false,
            error: err.kind(),
            message: err.to_string(),
            cause: (!chain.is_empty()).then(|| chain.join(": ")),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The data of a success payload
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(success) => Some(&success.data),
            Self::Failure(_) => None,
        }
    }

    /// The failure payload, if any
    pub fn failure_details(&self) -> Option<&Failure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

impl<T> From<crate::Result<T>> for Response<T> {
    fn from(result: crate::Result<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::failure(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::BrowserError;
    use crate::target::normalize_target;
    use std::time::Duration;

    #[test]
    fn test_success_payload_flattens_data() {
        let report = ScrollReport {
            target: normalize_target("example.com").unwrap(),
            pages_requested: 2,
            pages_completed: 0,
            termination: Termination::Blocked,
            pages: Vec::new(),
            completed_at: Utc::now(),
        };

        let json = serde_json::to_value(Response::success(report)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["target"], "https://example.com/");
        assert_eq!(json["pagesRequested"], 2);
        assert_eq!(json["termination"], "blocked");
        assert!(json["completedAt"].is_string());
    }

    #[test]
    fn test_search_url_omitted_for_generic_sites() {
        let report = SearchReport {
            target: normalize_target("example.com").unwrap(),
            query: "widget".to_string(),
            search_url: None,
            match_count: 0,
            results: Vec::new(),
            completed_at: Utc::now(),
        };

        let json = serde_json::to_value(Response::success(report)).unwrap();
        assert!(json.get("searchUrl").is_none());
        assert_eq!(json["matchCount"], 0);
    }

    #[test]
    fn test_validation_failure_has_no_cause() {
        let err = TrawlError::Validation("Target URL is required".to_string());
        let json = serde_json::to_value(Response::<()>::failure(&err)).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "validation_error");
        assert!(json["message"]
            .as_str()
            .unwrap()
            .contains("Target URL is required"));
        assert!(json.get("cause").is_none());
    }

    #[test]
    fn test_failure_carries_cause() {
        let err = TrawlError::NavigationTimeout {
            url: "https://example.com/".to_string(),
            timeout: Duration::from_secs(30),
            source: BrowserError::Timeout {
                operation: "navigation",
                after: Duration::from_secs(30),
            },
        };

        let response: Response<ScrollReport> = Err(err).into();
        assert!(!response.is_success());
        let failure = response.failure_details().unwrap();
        assert_eq!(failure.error, "navigation_timeout");
        assert_eq!(failure.cause.as_deref(), Some("navigation timed out after 30s"));
    }
}
