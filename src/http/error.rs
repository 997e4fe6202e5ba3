use thiserror::Error;

/// Failure of a single pipeline network call.
///
/// Both kinds are reported to the diagnostic channel and never change
/// session state.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Non-2xx status or a transport-level failure.
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The response body was not valid JSON.
    #[error("invalid JSON from {url}: {reason}")]
    Parse { url: String, reason: String },
}

impl PipelineError {
    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn parse(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Short kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "fetch",
            Self::Parse { .. } => "parse",
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Fetch { url, .. } | Self::Parse { url, .. } => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_url_and_reason() {
        let err = PipelineError::fetch("https://x.test/api", "HTTP 404 Not Found");
        assert_eq!(
            err.to_string(),
            "fetch failed for https://x.test/api: HTTP 404 Not Found"
        );
        assert_eq!(err.kind(), "fetch");
        assert_eq!(err.url(), "https://x.test/api");
    }

    #[test]
    fn parse_kind() {
        let err = PipelineError::parse("u", "expected value at line 1");
        assert_eq!(err.kind(), "parse");
    }
}
