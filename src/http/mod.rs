/// HTTP access to the target API.
///
/// Uses the synchronous `ureq` client. Every call classifies its failure into
/// one of the two [`PipelineError`] kinds:
///
/// - **Fetch**: non-2xx status, DNS/connect/timeout failures, unreadable body
/// - **Parse**: a body that is not valid JSON
///
/// The pipeline stages talk to the network through the [`JsonSource`] trait so
/// that the session state machine can be driven by canned responses in tests.
pub mod error;

use std::time::Duration;

pub use error::PipelineError;

use crate::config::schema::HttpConfig;

/// Anything that can GET a URL and hand back its parsed JSON body.
pub trait JsonSource {
    fn get_json(&self, url: &str) -> Result<serde_json::Value, PipelineError>;
}

/// Synchronous `ureq`-backed API client.
///
/// One agent is reused for every request issued by a CLI invocation or by
/// the dashboard server, so connections are pooled across calls.
#[derive(Debug)]
pub struct ApiClient {
    agent: ureq::Agent,
    timeout: Duration,
}

impl ApiClient {
    /// Build a client from the resolved `[http]` config section.
    pub fn from_config(config: &HttpConfig) -> Self {
        let timeout = Duration::from_millis(config.timeout_ms);
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(&config.user_agent)
            .build();
        Self { agent, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl JsonSource for ApiClient {
    fn get_json(&self, url: &str) -> Result<serde_json::Value, PipelineError> {
        let resp = match self
            .agent
            .get(url)
            .set("Accept", "application/json")
            .call()
        {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, resp)) => {
                return Err(PipelineError::fetch(
                    url,
                    format!("HTTP {code} {}", resp.status_text()),
                ));
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(PipelineError::fetch(url, transport.to_string()));
            }
        };

        let body = resp
            .into_string()
            .map_err(|e| PipelineError::fetch(url, format!("failed to read body: {e}")))?;

        serde_json::from_str(&body).map_err(|e| PipelineError::parse(url, e.to_string()))
    }
}

/// Join a base API URL and an endpoint name into `{base}/{endpoint}`.
///
/// A trailing slash on the base and a leading slash on the endpoint are
/// collapsed so the result never contains `//` at the seam.
pub fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_plain() {
        assert_eq!(
            join_url("https://swapi.dev/api", "people"),
            "https://swapi.dev/api/people"
        );
    }

    #[test]
    fn join_url_collapses_slashes() {
        assert_eq!(
            join_url("https://swapi.dev/api/", "/people/"),
            "https://swapi.dev/api/people/"
        );
    }

    #[test]
    fn client_uses_configured_timeout() {
        let config = HttpConfig {
            timeout_ms: 2500,
            ..HttpConfig::default()
        };
        let client = ApiClient::from_config(&config);
        assert_eq!(client.timeout(), Duration::from_millis(2500));
    }
}
