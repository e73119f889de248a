//! VizieR catalog client.
//!
//! Queries the `asu-tsv` endpoint, which returns tab-separated values with a
//! `#` comment preamble, a header line, a units line and a dashed separator
//! line before the data rows.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::{CatalogConfig, CatalogError, CatalogSource, CatalogTable};

/// VizieR HTTP client.
pub struct VizierClient {
    client: Client,
    config: CatalogConfig,
}

impl VizierClient {
    /// Create a new VizieR client.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Full query URL for the configured table.
    pub fn query_url(&self) -> String {
        let max = self
            .config
            .row_limit
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unlimited".to_string());

        format!(
            "{}/asu-tsv?-source={}&-out.max={}&-out={}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.source),
            max,
            urlencoding::encode(&self.config.columns.join(","))
        )
    }
}

#[async_trait]
impl CatalogSource for VizierClient {
    fn name(&self) -> &str {
        &self.config.source
    }

    async fn fetch_table(&self) -> Result<CatalogTable, CatalogError> {
        let url = self.query_url();
        debug!(url = %url, "VizieR query");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "VizieR query failed");
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let bytes = response.bytes().await?;
        let text = String::from_utf8_lossy(&bytes);
        parse_tsv(&text)
    }
}

/// Parses an `asu-tsv` document into a table.
pub(crate) fn parse_tsv(text: &str) -> Result<CatalogTable, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .comment(Some(b'#'))
        .has_headers(true)
        .flexible(false)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(parse_error)?
        .iter()
        .map(str::to_string)
        .collect();
    if columns.is_empty() {
        return Err(CatalogError::ParseError("response contains no table".to_string()));
    }

    let mut records = reader.records();

    // An optional units row, then the dashed separator.
    let mut preamble = 0;
    while preamble < 2 {
        match records.next() {
            Some(record) => {
                if is_separator(&record.map_err(parse_error)?) {
                    break;
                }
                preamble += 1;
            }
            None => break,
        }
    }
    if preamble == 2 {
        return Err(CatalogError::ParseError(
            "missing separator line after header".to_string(),
        ));
    }

    let rows = records
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(parse_error)
        })
        .collect::<Result<Vec<Vec<String>>, _>>()?;

    CatalogTable::new(columns, rows)
}

fn is_separator(record: &csv::StringRecord) -> bool {
    record.iter().any(|field| !field.is_empty())
        && record.iter().all(|field| field.chars().all(|c| c == '-'))
}

fn parse_error(err: csv::Error) -> CatalogError {
    CatalogError::ParseError(err.to_string())
}
