//! Spreadsheet values API client
//!
//! Fetches the customer sheet as a raw string grid and parses it into
//! [`Customer`] records. The write path updates a single row's cell range.
//! Reads authenticate with an API key; row updates additionally require an
//! OAuth access token supplied through configuration.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::data::rows::{parse_grid, to_row};
use crate::data::Customer;

/// Default base URL of the spreadsheet values API
const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Default cell range covering all 13 record columns
pub const DEFAULT_RANGE: &str = "Sheet1!A:M";

/// Errors that can occur when talking to the values endpoint
#[derive(Debug, Error)]
pub enum SheetsError {
    /// HTTP transport failure (connection, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status, with the response body for diagnostics
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON shape
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    /// Row update requested but no access token is configured
    #[error("No access token configured for sheet writes")]
    NoWriteCredential,
}

impl SheetsError {
    /// True for rate-limit class failures (HTTP 429); only these are
    /// retried by the backoff controller.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SheetsError::Status { status: 429, .. })
    }
}

/// JSON shape of the values endpoint response
#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Client for one configured spreadsheet.
///
/// Constructed only when both the sheet id and the API key are present;
/// callers with no sheet configuration substitute an empty result instead
/// of invoking the fetcher.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http_client: Client,
    base_url: String,
    sheet_id: String,
    api_key: String,
    /// OAuth access token for the write path
    access_token: Option<String>,
    /// Sheet name prefix of the range, e.g. `Sheet1`
    sheet_name: String,
    range: String,
}

impl SheetsClient {
    /// Creates a client for the given sheet id and API key.
    pub fn new(sheet_id: String, api_key: String, access_token: Option<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            sheet_id,
            api_key,
            access_token,
            sheet_name: "Sheet1".to_string(),
            range: DEFAULT_RANGE.to_string(),
        }
    }

    /// Creates a client pointing at a custom base URL (for testing).
    #[cfg(test)]
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http_client: Client::new(),
            base_url,
            sheet_id: "test-sheet".to_string(),
            api_key: "test-key".to_string(),
            access_token: Some("test-token".to_string()),
            sheet_name: "Sheet1".to_string(),
            range: DEFAULT_RANGE.to_string(),
        }
    }

    /// Fetches the raw values grid for the configured range.
    pub async fn fetch_grid(&self) -> Result<Vec<Vec<String>>, SheetsError> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}?key={}",
            self.base_url, self.sheet_id, self.range, self.api_key
        );

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SheetsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ValuesResponse =
            serde_json::from_str(&body).map_err(|e| SheetsError::Parse(e.to_string()))?;
        Ok(parsed.values)
    }

    /// Fetches the sheet and parses it into an ordered record sequence.
    pub async fn fetch_records(&self) -> Result<Vec<Customer>, SheetsError> {
        let grid = self.fetch_grid().await?;
        Ok(parse_grid(&grid))
    }

    /// Overwrites one sheet row (1-based `row_number`) with the customer's
    /// current field values, body `{"values": [[...13 columns...]]}`.
    pub async fn update_row(
        &self,
        row_number: usize,
        customer: &Customer,
    ) -> Result<(), SheetsError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or(SheetsError::NoWriteCredential)?;

        let range = format!("{}!A{row}:M{row}", self.sheet_name, row = row_number);
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}?valueInputOption=RAW",
            self.base_url, self.sheet_id, range
        );
        let body = json!({ "values": [to_row(customer)] });

        let response = self
            .http_client
            .put(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CustomerStatus, PetCategory};

    fn sample_customer() -> Customer {
        Customer {
            id: "C001".to_string(),
            owner_name: "Yamada Taro".to_string(),
            owner_reading: String::new(),
            email: "taro@example.com".to_string(),
            phone: String::new(),
            address: String::new(),
            pet_name: "Pochi".to_string(),
            pet_category: PetCategory::Dog,
            age: 3,
            weight: 8.5,
            notes: String::new(),
            created_date: "2026-01-15".to_string(),
            last_visit: None,
            status: CustomerStatus::Active,
        }
    }

    #[test]
    fn test_rate_limited_classification() {
        let err = SheetsError::Status {
            status: 429,
            body: "quota exceeded".to_string(),
        };
        assert!(err.is_rate_limited());

        let err = SheetsError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert!(!err.is_rate_limited());

        assert!(!SheetsError::Parse("bad json".to_string()).is_rate_limited());
    }

    #[test]
    fn test_values_response_missing_values_field() {
        // An empty sheet omits the `values` field entirely.
        let parsed: ValuesResponse = serde_json::from_str(r#"{"range":"Sheet1!A:M"}"#).unwrap();
        assert!(parsed.values.is_empty());
    }

    #[test]
    fn test_values_response_parses_grid() {
        let body = r#"{"values": [["timestamp","owner_name"],["2026/01/15","Yamada Taro"]]}"#;
        let parsed: ValuesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.values.len(), 2);
        assert_eq!(parsed.values[1][1], "Yamada Taro");
    }

    #[tokio::test]
    async fn test_fetch_grid_unreachable_host_is_http_error() {
        // Port 1 on localhost refuses connections immediately.
        let client = SheetsClient::with_base_url("http://127.0.0.1:1".to_string());
        let result = client.fetch_grid().await;
        assert!(matches!(result, Err(SheetsError::Http(_))));
    }

    #[tokio::test]
    async fn test_update_row_without_token_is_rejected() {
        let mut client = SheetsClient::with_base_url("http://127.0.0.1:1".to_string());
        client.access_token = None;
        let result = client.update_row(2, &sample_customer()).await;
        assert!(matches!(result, Err(SheetsError::NoWriteCredential)));
    }
}
