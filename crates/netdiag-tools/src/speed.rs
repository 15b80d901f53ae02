//! Bandwidth measurement.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::StreamExt;
use netdiag_core::config::SpeedTestConfig;
use netdiag_core::{DiagnosticKind, DiagnosticOutcome};
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Body, Client, ClientBuilder};
use tracing::debug;

use crate::registry::{Diagnostic, DiagnosticContext};
use crate::ToolError;

/// Measures throughput of the network connection.
///
/// Rates are reported in bits per second.
#[async_trait]
pub trait BandwidthMeter: Send + Sync {
    /// Measure download throughput.
    async fn download(&self) -> Result<f64, ToolError>;

    /// Measure upload throughput.
    async fn upload(&self) -> Result<f64, ToolError>;
}

/// Size of each piece of the streamed upload body.
const UPLOAD_CHUNK: usize = 64 * 1024;

static ZERO_CHUNK: [u8; UPLOAD_CHUNK] = [0; UPLOAD_CHUNK];

/// Meter that times transfers against an HTTP speed endpoint.
///
/// Download streams `download_bytes` from `download_url?bytes=N`; upload
/// streams `upload_bytes` of zeros to `upload_url` without buffering the
/// body. `timeout_secs` bounds connecting and each read, not the transfer.
pub struct HttpBandwidthMeter {
    client: Client,
    download_url: String,
    upload_url: String,
    download_bytes: u64,
    upload_bytes: u64,
}

impl HttpBandwidthMeter {
    /// Create a meter from the speed test configuration.
    pub fn from_config(config: &SpeedTestConfig) -> Result<Self, ToolError> {
        let client = client_builder(config).build()?;

        Ok(Self {
            client,
            download_url: config.download_url.clone(),
            upload_url: config.upload_url.clone(),
            download_bytes: config.download_bytes,
            upload_bytes: config.upload_bytes,
        })
    }
}

fn client_builder(config: &SpeedTestConfig) -> ClientBuilder {
    let idle = Duration::from_secs(config.timeout_secs);
    Client::builder().connect_timeout(idle).read_timeout(idle)
}

/// Zero-filled pieces summing to `total` bytes, produced lazily.
fn zero_chunks(total: u64) -> impl Iterator<Item = &'static [u8]> + Send + 'static {
    let chunk = UPLOAD_CHUNK as u64;
    (0..total.div_ceil(chunk)).map(move |i| {
        let len = (total - i * chunk).min(chunk) as usize;
        &ZERO_CHUNK[..len]
    })
}

#[async_trait]
impl BandwidthMeter for HttpBandwidthMeter {
    async fn download(&self) -> Result<f64, ToolError> {
        debug!(url = %self.download_url, bytes = self.download_bytes, "Measuring download");

        let start = Instant::now();
        let response = self
            .client
            .get(&self.download_url)
            .query(&[("bytes", self.download_bytes)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ToolError::BadStatus {
                url: self.download_url.clone(),
                status: response.status().as_u16(),
            });
        }

        let mut received: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            received += chunk?.len() as u64;
        }

        Ok(bits_per_second(received, start.elapsed()))
    }

    async fn upload(&self) -> Result<f64, ToolError> {
        debug!(url = %self.upload_url, bytes = self.upload_bytes, "Measuring upload");

        let chunks = zero_chunks(self.upload_bytes).map(Ok::<_, std::io::Error>);
        let start = Instant::now();
        let response = self
            .client
            .post(&self.upload_url)
            .header(CONTENT_LENGTH, self.upload_bytes)
            .body(Body::wrap_stream(futures::stream::iter(chunks)))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ToolError::BadStatus {
                url: self.upload_url.clone(),
                status: response.status().as_u16(),
            });
        }

        Ok(bits_per_second(self.upload_bytes, start.elapsed()))
    }
}

/// Convert a transfer into a rate.
pub fn bits_per_second(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64().max(f64::EPSILON);
    (bytes as f64 * 8.0) / secs
}

/// Render download and upload rates as two lines in Mbps.
pub fn format_speed(download_bps: f64, upload_bps: f64) -> String {
    format!(
        "Download Speed: {:.2} Mbps\nUpload Speed: {:.2} Mbps",
        download_bps / 1_000_000.0,
        upload_bps / 1_000_000.0
    )
}

/// `check speed`: measure download then upload bandwidth.
pub struct SpeedTest;

#[async_trait]
impl Diagnostic for SpeedTest {
    fn kind(&self) -> DiagnosticKind {
        DiagnosticKind::Speed
    }

    async fn run(&self, ctx: &DiagnosticContext) -> Result<DiagnosticOutcome, ToolError> {
        let download = ctx.meter.download().await?;
        let upload = ctx.meter.upload().await?;
        Ok(DiagnosticOutcome::success(format_speed(download, upload)))
    }
}
