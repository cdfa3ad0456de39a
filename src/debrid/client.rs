use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{DebridError, JobService, JobSnapshot, ResolvedLink};
use crate::report::ProgressSink;

/// Real-Debrid REST endpoint, overridable through configuration.
pub const DEFAULT_BASE_URL: &str = "https://api.real-debrid.com/rest/1.0";

#[derive(Debug, Deserialize)]
struct SubmittedJob {
    id: String,
}

/// Stateless HTTP client for the debrid REST API.
///
/// Holds the bearer token as a default header; every job detail lives on the
/// remote side and is re-fetched through [`JobService::job_info`].
pub struct DebridClient {
    client: Client,
    base_url: String,
}

impl DebridClient {
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self> {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .context("API key contains characters not allowed in a header value")?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(30))
            .user_agent(concat!("debrid-dl/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Map a non-success response to [`DebridError::RemoteCall`], keeping the
/// status code and body for diagnostics.
async fn check(operation: &'static str, response: Response) -> Result<Response, DebridError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(DebridError::RemoteCall {
        operation,
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(
    operation: &'static str,
    response: Response,
) -> Result<T, DebridError> {
    response
        .json()
        .await
        .map_err(|_| DebridError::MalformedResponse { operation })
}

#[async_trait]
impl JobService for DebridClient {
    async fn submit_magnet(&self, magnet: &str) -> Result<String, DebridError> {
        let response = self
            .client
            .post(format!("{}/torrents/addMagnet", self.base_url))
            .form(&[("magnet", magnet)])
            .send()
            .await?;
        let response = check("addMagnet", response).await?;
        let submitted: SubmittedJob = decode("addMagnet", response).await?;
        if submitted.id.trim().is_empty() {
            return Err(DebridError::MalformedResponse {
                operation: "addMagnet",
            });
        }
        debug!("magnet submitted as job {}", submitted.id);
        Ok(submitted.id)
    }

    async fn select_all(&self, job_id: &str) -> Result<(), DebridError> {
        let response = self
            .client
            .post(format!("{}/torrents/selectFiles/{}", self.base_url, job_id))
            .form(&[("files", "all")])
            .send()
            .await?;
        check("selectFiles", response).await?;
        Ok(())
    }

    async fn job_info(&self, job_id: &str) -> Result<JobSnapshot, DebridError> {
        let response = self
            .client
            .get(format!("{}/torrents/info/{}", self.base_url, job_id))
            .send()
            .await?;
        let response = check("torrentInfo", response).await?;
        decode("torrentInfo", response).await
    }

    async fn unrestrict(&self, link: &str) -> Result<ResolvedLink, DebridError> {
        let response = self
            .client
            .post(format!("{}/unrestrict/link", self.base_url))
            .form(&[("link", link)])
            .send()
            .await?;
        let response = check("unrestrict", response).await?;
        let resolved: ResolvedLink = decode("unrestrict", response).await?;
        if resolved.download_url.trim().is_empty() {
            return Err(DebridError::MissingDownloadUrl);
        }
        Ok(resolved)
    }

    async fn fetch_file(
        &self,
        url: &str,
        dest: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<u64, DebridError> {
        let response = self.client.get(url).send().await?;
        let response = check("download", response).await?;

        let name = dest
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        sink.transfer_started(&name, response.content_length());
        let outcome = stream_body(response, dest, sink).await;
        sink.transfer_finished();

        let written = outcome?;
        debug!("wrote {} bytes to {}", written, dest.display());
        Ok(written)
    }
}

/// Stream a response body to disk. The file handle and response stream are
/// dropped on every exit path, success or not.
async fn stream_body(
    response: Response,
    dest: &Path,
    sink: &dyn ProgressSink,
) -> Result<u64, DebridError> {
    let mut file = File::create(dest)?;
    let mut written: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)?;
        written += chunk.len() as u64;
        sink.transfer_progress(written);
    }
    file.flush()?;
    Ok(written)
}
