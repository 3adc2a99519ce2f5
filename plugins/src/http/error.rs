use planlog_core::api::PlanError;
use std::{error::Error as StdError, fmt};

const BODY_PREVIEW_LIMIT: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiHttpErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
    Decode,
    Status,
    Unknown,
}

impl ApiHttpErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Decode => "decode",
            Self::Status => "status",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ApiHttpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct ApiHttpError {
    kind: ApiHttpErrorKind,
    status: Option<u16>,
    url: Option<String>,
    message: String,
    source: Option<anyhow::Error>,
}

impl ApiHttpError {
    pub fn kind(&self) -> ApiHttpErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, url: String) -> Self {
        let kind = if err.is_timeout() {
            ApiHttpErrorKind::Timeout
        } else if err.is_connect() {
            ApiHttpErrorKind::Connect
        } else if err.is_request() {
            ApiHttpErrorKind::Request
        } else if err.is_body() {
            ApiHttpErrorKind::Body
        } else if err.is_decode() {
            ApiHttpErrorKind::Decode
        } else {
            ApiHttpErrorKind::Unknown
        };
        let status = err.status().map(|s| s.as_u16());
        let message = err.to_string();
        ApiHttpError {
            kind,
            status,
            url: Some(url),
            message,
            source: Some(anyhow::Error::new(err)),
        }
    }

    pub(crate) fn status_error(status: u16, url: String, preview: String) -> Self {
        ApiHttpError {
            kind: ApiHttpErrorKind::Status,
            status: Some(status),
            url: Some(url),
            message: preview,
            source: None,
        }
    }

    pub(crate) fn decode_error(
        status: u16,
        url: String,
        err: serde_json::Error,
        preview: String,
    ) -> Self {
        let message = format!("failed to decode response body: {} | body={}", err, preview);
        ApiHttpError {
            kind: ApiHttpErrorKind::Decode,
            status: Some(status),
            url: Some(url),
            message,
            source: Some(anyhow::Error::new(err)),
        }
    }
}

impl fmt::Display for ApiHttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "api http error kind={}", self.kind)?;
        if let Some(status) = self.status {
            write!(f, " status={}", status)?;
        }
        if let Some(url) = &self.url {
            write!(f, " url={}", url)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl StdError for ApiHttpError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

impl From<ApiHttpError> for PlanError {
    fn from(err: ApiHttpError) -> Self {
        match err.kind {
            ApiHttpErrorKind::Decode => PlanError::Parse(err.to_string()),
            _ => PlanError::Transport(err.into()),
        }
    }
}

pub(crate) fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out = String::new();
    let mut truncated = false;
    for (idx, ch) in trimmed.chars().enumerate() {
        if idx >= BODY_PREVIEW_LIMIT {
            truncated = true;
            break;
        }
        out.push(ch);
    }

    if truncated {
        out.push_str("...");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_body_empty() {
        assert_eq!(preview_body("   "), "<empty body>");
    }

    #[test]
    fn test_preview_body_truncates() {
        let body = "a".repeat(BODY_PREVIEW_LIMIT + 10);
        let preview = preview_body(&body);
        assert!(preview.ends_with("..."));
        assert!(preview.len() <= BODY_PREVIEW_LIMIT + 3);
    }

    #[test]
    fn test_status_error_display() {
        let err = ApiHttpError::status_error(
            503,
            "https://tfe.example.com/api/v2/plans/plan-1".to_string(),
            "maintenance".to_string(),
        );
        let msg = err.to_string();
        assert!(msg.contains("kind=status"));
        assert!(msg.contains("status=503"));
        assert!(msg.contains("url=https://tfe.example.com/api/v2/plans/plan-1"));
        assert!(msg.contains("maintenance"));
    }

    #[test]
    fn test_status_error_becomes_transport() {
        let err: PlanError =
            ApiHttpError::status_error(500, "https://x".to_string(), "boom".to_string()).into();
        let PlanError::Transport(inner) = err else {
            panic!("expected transport error");
        };
        let http = inner.downcast_ref::<ApiHttpError>().expect("ApiHttpError");
        assert_eq!(http.status(), Some(500));
    }

    #[test]
    fn test_decode_error_becomes_parse() {
        let decode_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: PlanError = ApiHttpError::decode_error(
            200,
            "https://tfe.example.com/api/v2/plans/plan-1".to_string(),
            decode_err,
            "not json".to_string(),
        )
        .into();
        assert!(matches!(err, PlanError::Parse(msg) if msg.contains("kind=decode")));
    }
}
