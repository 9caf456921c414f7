//! Image reachability probing with a bounded total latency.

use std::time::Duration;

use chrono::Utc;
use directory_logging::dir_debug;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use url::Url;

pub const CACHE_BUST_PARAM: &str = "cachebust";

#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// Upper bound for a whole probe, fallback included.
    pub timeout: Duration,
    /// Largest body the decode fallback downloads.
    pub max_bytes: u64,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait ImageProber: Send + Sync {
    /// Whether `url` resolves to a displayable image. Never errors, never
    /// outlives the configured timeout.
    async fn probe(&self, url: &str) -> bool;

    /// Whether `url` answers with a success status at all.
    async fn reachable(&self, url: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct HttpImageProber {
    client: reqwest::Client,
    settings: ProbeSettings,
}

impl HttpImageProber {
    pub fn new(client: reqwest::Client, settings: ProbeSettings) -> Self {
        Self { client, settings }
    }

    async fn probe_image(&self, url: &str) -> bool {
        let Some(parsed) = http_url(url) else {
            dir_debug!("Probe rejected unparsable url {}", url);
            return false;
        };

        match self.head_content_type(parsed.clone()).await {
            Ok(Some(content_type)) if content_type.starts_with("image/") => {
                dir_debug!("HEAD {} reports {}", url, content_type);
                return true;
            }
            Ok(content_type) => {
                dir_debug!("HEAD {} inconclusive (content type {:?})", url, content_type)
            }
            Err(err) => dir_debug!("HEAD {} failed: {}", url, err),
        }

        let decoded = self.decode_image(with_cache_bust(parsed)).await;
        dir_debug!("Decode fallback for {} -> {}", url, decoded);
        decoded
    }

    async fn head_content_type(&self, url: Url) -> Result<Option<String>, reqwest::Error> {
        let response = self.client.head(url).send().await?.error_for_status()?;
        Ok(response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_ascii_lowercase()))
    }

    async fn decode_image(&self, url: Url) -> bool {
        let response = match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                dir_debug!("GET {} returned {}", response.url(), response.status());
                return false;
            }
            Err(err) => {
                dir_debug!("GET failed: {}", err);
                return false;
            }
        };

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let Ok(chunk) = chunk else {
                return false;
            };
            if body.len() as u64 + chunk.len() as u64 > self.settings.max_bytes {
                dir_debug!("Image body exceeds {} bytes", self.settings.max_bytes);
                return false;
            }
            body.extend_from_slice(&chunk);
        }

        looks_like_svg(&body) || image::load_from_memory(&body).is_ok()
    }

    async fn answers(&self, url: &str) -> bool {
        let Some(parsed) = http_url(url) else {
            return false;
        };
        if let Ok(response) = self.client.head(parsed.clone()).send().await {
            if response.status().is_success() {
                return true;
            }
        }
        matches!(
            self.client.get(parsed).send().await,
            Ok(response) if response.status().is_success()
        )
    }
}

#[async_trait::async_trait]
impl ImageProber for HttpImageProber {
    async fn probe(&self, url: &str) -> bool {
        match tokio::time::timeout(self.settings.timeout, self.probe_image(url)).await {
            Ok(ok) => ok,
            Err(_) => {
                dir_debug!("Probe of {} timed out after {:?}", url, self.settings.timeout);
                false
            }
        }
    }

    async fn reachable(&self, url: &str) -> bool {
        tokio::time::timeout(self.settings.timeout, self.answers(url))
            .await
            .unwrap_or(false)
    }
}

fn http_url(raw: &str) -> Option<Url> {
    Url::parse(raw.trim())
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

/// Appends `cachebust=<millis>` so a cached copy cannot mask a broken link.
pub fn with_cache_bust(mut url: Url) -> Url {
    let stamp = Utc::now().timestamp_millis().to_string();
    url.query_pairs_mut().append_pair(CACHE_BUST_PARAM, &stamp);
    url
}

/// SVG is rendered by browsers but not decoded by `image`.
fn looks_like_svg(body: &[u8]) -> bool {
    let head = &body[..body.len().min(1024)];
    let text = String::from_utf8_lossy(head).to_ascii_lowercase();
    let text = text.trim_start_matches('\u{feff}').trim_start();
    (text.starts_with("<svg") || text.starts_with("<?xml")) && text.contains("<svg")
}
