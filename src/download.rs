//! Image download.
//!
//! The fetch itself sits behind the [`Fetcher`] trait so the pipeline's
//! retry policy can be exercised without a network; [`HttpFetcher`] is the
//! real implementation, streaming the response body to the staging file.

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Byte-level download progress callback: (bytes received, total content
/// length). A `None` or zero total means the server did not report one.
pub type ProgressFn<'a> = &'a mut dyn FnMut(u64, Option<u64>);

/// Fetches one image into a staging file.
pub trait Fetcher: Send + Sync {
    /// Fetch `url` into `dest`, truncating any previous content. Partial
    /// files from earlier attempts must never be appended to.
    fn fetch(&self, url: &str, dest: &Path, progress: ProgressFn) -> Result<()>;
}

/// Streams the image over HTTP.
///
/// The pipeline worker is a plain thread, so the transfer gets its own
/// tokio runtime for the duration of the fetch.
pub struct HttpFetcher;

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path, progress: ProgressFn) -> Result<()> {
        let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
        runtime.block_on(fetch_http(url, dest, progress))
    }
}

async fn fetch_http(url: &str, dest: &Path, progress: ProgressFn<'_>) -> Result<()> {
    use futures_util::StreamExt;
    use tokio::io::AsyncWriteExt;

    let client = reqwest::Client::builder()
        .user_agent(concat!("gbmc/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("HTTP request failed: {url}"))?;

    let status = response.status();
    if !status.is_success() {
        bail!(
            "HTTP {} for {}: {}",
            status.as_u16(),
            url,
            status.canonical_reason().unwrap_or("unknown error")
        );
    }

    let total = response.content_length().filter(|len| *len > 0);

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let file = tokio::fs::File::create(dest)
        .await
        .with_context(|| format!("Failed to create {}", dest.display()))?;
    let mut writer = tokio::io::BufWriter::new(file);

    let mut received = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.with_context(|| format!("Failed to read chunk from {url}"))?;
        writer
            .write_all(&chunk)
            .await
            .with_context(|| format!("Failed to write to {}", dest.display()))?;
        received += chunk.len() as u64;
        progress(received, total);
    }

    writer
        .flush()
        .await
        .with_context(|| format!("Failed to flush {}", dest.display()))?;

    Ok(())
}
