//! Form-relay client
//!
//! Forwards one intake-form submission, given as values in the fixed form
//! column order, to the backend's `/api/intake` endpoint with the static
//! bearer token. The CLI `relay` subcommand is a thin wrapper over this.

use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::info;

use crate::data::Customer;

/// Errors from forwarding a submission
#[derive(Debug, Error)]
pub enum RelayError {
    /// HTTP transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the submission
    #[error("Backend returned status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Backend accepted but returned an unexpected body
    #[error("Failed to parse backend response: {0}")]
    Parse(String),
}

/// Posts the submission values to the backend and returns the created
/// record.
pub async fn forward_submission(
    client: &Client,
    backend_url: &str,
    api_token: &str,
    values: &[String],
) -> Result<Customer, RelayError> {
    let url = format!("{}/api/intake", backend_url.trim_end_matches('/'));
    let payload = json!({ "values": values });

    let response = client
        .post(&url)
        .bearer_auth(api_token)
        .json(&payload)
        .send()
        .await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(RelayError::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    let created: Customer =
        serde_json::from_str(&body).map_err(|e| RelayError::Parse(e.to_string()))?;
    info!(id = %created.id, "submission relayed");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_backend_is_http_error() {
        let client = Client::new();
        let values = vec!["ts".to_string(), "Owner".to_string()];

        let result =
            forward_submission(&client, "http://127.0.0.1:1", "secret", &values).await;

        assert!(matches!(result, Err(RelayError::Http(_))));
    }

    #[test]
    fn test_trailing_slash_is_normalized() {
        assert_eq!(
            format!("{}/api/intake", "http://localhost:8787/".trim_end_matches('/')),
            "http://localhost:8787/api/intake"
        );
    }
}
