use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

use super::{RecordStore, Row, StorageError};
use crate::config::SheetsConfig;

/// Google Sheets values API (v4) client bound to one spreadsheet range.
///
/// Reads work with an API key alone; appends need an OAuth access token.
#[derive(Debug, Clone)]
pub struct SheetsRecordStore {
    client: reqwest::Client,
    base_url: Url,
    spreadsheet_id: String,
    range: String,
    api_key: Option<String>,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Option<Vec<Vec<Value>>>,
}

impl SheetsRecordStore {
    pub fn new(client: reqwest::Client, config: &SheetsConfig) -> Result<Self, StorageError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|err| StorageError::Transport(format!("invalid sheets base url: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StorageError::Transport(format!(
                "invalid sheets base url: {}",
                config.base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            spreadsheet_id: config.spreadsheet_id.clone(),
            range: config.range.clone(),
            api_key: config.api_key.clone(),
            access_token: config.access_token.clone(),
        })
    }

    fn values_url(&self, last_segment: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values"])
                .push(last_segment);
        }
        url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = match &self.api_key {
            Some(key) => request.query(&[("key", key.as_str())]),
            None => request,
        };
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn cell_text(cell: Value) -> String {
    match cell {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    error!(%status, %body, "sheets request failed");
    Err(StorageError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl RecordStore for SheetsRecordStore {
    async fn read_rows(&self) -> Result<Vec<Row>, StorageError> {
        let url = self.values_url(&self.range);
        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|err| StorageError::Transport(err.to_string()))?;

        let range: ValueRange = check_status(response)
            .await?
            .json()
            .await
            .map_err(|err| StorageError::Transport(err.to_string()))?;

        let rows: Vec<Row> = range
            .values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();
        debug!(rows = rows.len(), range = %self.range, "fetched sheet rows");
        Ok(rows)
    }

    async fn append_row(&self, row: Row) -> Result<(), StorageError> {
        if self.access_token.is_none() {
            return Err(StorageError::MissingCredentials("SHEETS_ACCESS_TOKEN"));
        }

        let url = self.values_url(&format!("{}:append", self.range));
        let request = self
            .client
            .post(url)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&json!({ "values": [row] }));

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|err| StorageError::Transport(err.to_string()))?;
        check_status(response).await?;
        Ok(())
    }
}
