//! SDSS SkyServer image cutout client.

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Response};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::{CutoutConfig, CutoutError, CutoutOutcome, CutoutRequest, CutoutService};
use crate::metrics;

/// Client for the SkyServer `ImgCutout/getjpeg` endpoint.
#[derive(Clone)]
pub struct SkyServerClient {
    client: Client,
    base_url: String,
}

enum BodyError {
    Remote(reqwest::Error),
    Local(std::io::Error),
}

impl SkyServerClient {
    /// Creates a client from the cutout configuration.
    pub fn new(config: &CutoutConfig) -> Result<Self, CutoutError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the cutout URL for a request.
    pub fn cutout_url(&self, request: &CutoutRequest) -> String {
        format!(
            "{}/getjpeg?ra={}&dec={}&scale={}&width={}&height={}",
            self.base_url,
            request.ra,
            request.dec,
            request.plate_scale,
            request.image_size,
            request.image_size
        )
    }

    fn skipped(request: &CutoutRequest, reason: String) -> CutoutOutcome {
        if request.verbose {
            warn!(pgc = request.pgc, reason = %reason, "Cutout not retrieved");
        } else {
            debug!(pgc = request.pgc, reason = %reason, "Cutout not retrieved");
        }
        CutoutOutcome::Skipped { reason }
    }
}

/// Streams the response body to `path`, returning the number of bytes written.
async fn stream_body(mut response: Response, path: &Path) -> Result<u64, BodyError> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(BodyError::Local)?;

    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await.map_err(BodyError::Remote)? {
        file.write_all(&chunk).await.map_err(BodyError::Local)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(BodyError::Local)?;

    Ok(written)
}

async fn remove_partial(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Failed to remove partial cutout");
        }
    }
}

#[async_trait]
impl CutoutService for SkyServerClient {
    fn name(&self) -> &str {
        "skyserver"
    }

    async fn fetch(&self, request: &CutoutRequest) -> Result<CutoutOutcome, CutoutError> {
        let url = self.cutout_url(request);
        debug!(pgc = request.pgc, url = %url, "Requesting cutout");

        let started = Instant::now();
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return Ok(Self::skipped(request, format!("request failed: {}", e))),
        };

        let status = response.status();
        if !status.is_success() {
            return Ok(Self::skipped(request, format!("HTTP {}", status.as_u16())));
        }

        let path = &request.output_path;
        match stream_body(response, path).await {
            Ok(bytes) => {
                metrics::CUTOUT_FETCH_DURATION.observe(started.elapsed().as_secs_f64());
                metrics::CUTOUT_BYTES.inc_by(bytes);

                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                info!("Retrieved {}", file_name);

                Ok(CutoutOutcome::Saved {
                    path: path.clone(),
                    bytes,
                })
            }
            Err(BodyError::Remote(e)) => {
                remove_partial(path).await;
                Ok(Self::skipped(request, format!("body interrupted: {}", e)))
            }
            Err(BodyError::Local(e)) => {
                remove_partial(path).await;
                Err(CutoutError::io(path.clone(), e))
            }
        }
    }
}
