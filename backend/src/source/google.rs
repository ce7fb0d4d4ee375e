use super::{SheetSource, SourceError};
use crate::config::Config;
use async_trait::async_trait;
use common::model::sheet::{RawSheet, SheetValues};
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use std::time::Duration;

const BACKOFF_BASE: Duration = Duration::from_millis(250);

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    modified_time: Option<String>,
}

/// Google Sheets values API plus the Drive metadata endpoint.
///
/// Credentials are whatever the deployment hands in: a bearer token, an API
/// key, or both. Transport failures and 5xx answers are retried with a
/// doubling delay; 4xx answers are returned at once.
pub struct GoogleSheetsSource {
    client: Client,
    spreadsheet_id: Option<String>,
    access_token: Option<String>,
    api_key: Option<String>,
    sheets_api_base: String,
    drive_api_base: String,
    retries: u32,
}

impl GoogleSheetsSource {
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(config.fetch_timeout).build()?;
        Ok(Self {
            client,
            spreadsheet_id: config.spreadsheet_id.clone(),
            access_token: config.access_token.clone(),
            api_key: config.api_key.clone(),
            sheets_api_base: config.sheets_api_base.clone(),
            drive_api_base: config.drive_api_base.clone(),
            retries: config.fetch_retries,
        })
    }

    fn spreadsheet_id(&self) -> Result<&str, SourceError> {
        self.spreadsheet_id
            .as_deref()
            .ok_or(SourceError::MissingConfig("SPREADSHEET_ID"))
    }

    /// `base` with `segments` appended, each one percent-encoded.
    fn endpoint(base: &str, segments: &[&str]) -> Result<Url, SourceError> {
        let mut url =
            Url::parse(base).map_err(|_| SourceError::MissingConfig("a valid API base URL"))?;
        url.path_segments_mut()
            .map_err(|_| SourceError::MissingConfig("a valid API base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }
        request
    }

    async fn send_with_retry(&self, url: Url) -> Result<Response, SourceError> {
        let mut attempt = 0;
        loop {
            let request = self.authorize(self.client.get(url.clone()));
            let failure = match request.send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    let error = SourceError::Status {
                        status: status.as_u16(),
                        body,
                    };
                    if !status.is_server_error() {
                        return Err(error);
                    }
                    error
                }
                Err(e) => SourceError::Http(e),
            };

            if attempt >= self.retries {
                return Err(failure);
            }
            let delay = BACKOFF_BASE * 2u32.pow(attempt);
            warn!("upstream attempt {} failed ({}), retrying in {:?}", attempt + 1, failure, delay);
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsSource {
    async fn fetch_range(&self, range: &str) -> Result<RawSheet, SourceError> {
        let id = self.spreadsheet_id()?;
        let url = Self::endpoint(&self.sheets_api_base, &[id, "values", range])?;
        debug!("fetching range {}", range);
        let values: SheetValues = self.send_with_retry(url).await?.json().await?;
        Ok(values.values)
    }

    async fn fetch_last_modified(&self) -> Result<Option<String>, SourceError> {
        let id = self.spreadsheet_id()?;
        let mut url = Self::endpoint(&self.drive_api_base, &[id])?;
        url.query_pairs_mut()
            .append_pair("fields", "modifiedTime")
            .append_pair("supportsAllDrives", "true");
        let file: DriveFile = self.send_with_retry(url).await?.json().await?;
        Ok(file.modified_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_percent_encoded_as_one_segment() {
        let url = GoogleSheetsSource::endpoint(
            "https://sheets.googleapis.com/v4/spreadsheets",
            &["abc", "values", "'Dados RJ'!A:E"],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc/values/'Dados%20RJ'!A:E"
        );
    }

    #[tokio::test]
    async fn missing_spreadsheet_id_is_a_config_error() {
        let config = Config::from_lookup(|_| None);
        let source = GoogleSheetsSource::new(&config).unwrap();
        let err = source.fetch_range("dados!A:E").await.unwrap_err();
        assert!(matches!(err, SourceError::MissingConfig("SPREADSHEET_ID")));
    }
}
