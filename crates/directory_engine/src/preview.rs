//! Media preview for the submission forms. Each new input supersedes the
//! previous lookup through a cancellation token.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use directory_logging::dir_debug;
use tokio_util::sync::CancellationToken;

use crate::favicon::FaviconResolver;
use crate::probe::ImageProber;
use crate::{PreviewInput, PreviewReport, PreviewState};

#[derive(Debug, Clone)]
pub struct PreviewSettings {
    /// Quiet period after typing a link before looking up its favicon.
    pub favicon_delay: Duration,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            favicon_delay: Duration::from_millis(600),
        }
    }
}

pub struct MediaPreviewer {
    prober: Arc<dyn ImageProber>,
    favicons: FaviconResolver,
    settings: PreviewSettings,
    current: Mutex<Option<CancellationToken>>,
}

impl MediaPreviewer {
    pub fn new(
        prober: Arc<dyn ImageProber>,
        favicons: FaviconResolver,
        settings: PreviewSettings,
    ) -> Self {
        Self {
            prober,
            favicons,
            settings,
            current: Mutex::new(None),
        }
    }

    /// Cancels the running lookup (if any) and returns the token of a new one.
    pub fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Ok(mut current) = self.current.lock() {
            if let Some(previous) = current.replace(token.clone()) {
                previous.cancel();
            }
        }
        token
    }

    /// Cancels the running lookup. Returns whether one was running.
    pub fn clear(&self) -> bool {
        match self.current.lock() {
            Ok(mut current) => match current.take() {
                Some(token) => {
                    token.cancel();
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    /// Starts a lookup for `input`, superseding any earlier one.
    pub async fn request(&self, input: PreviewInput) -> Option<PreviewReport> {
        let token = self.begin();
        self.run(input, token).await
    }

    /// `None` when cancelled or when the input has nothing to preview.
    pub async fn run(&self, input: PreviewInput, token: CancellationToken) -> Option<PreviewReport> {
        let image_url = input.image_url.trim().to_string();
        let link = input.link.trim().to_string();

        let state = if !image_url.is_empty() {
            let valid = tokio::select! {
                _ = token.cancelled() => return None,
                valid = self.prober.probe(&image_url) => valid,
            };
            if valid {
                PreviewState::Valid(image_url)
            } else {
                PreviewState::Invalid
            }
        } else if !link.is_empty() {
            tokio::select! {
                _ = token.cancelled() => return None,
                _ = tokio::time::sleep(self.settings.favicon_delay) => {}
            }
            let icon = tokio::select! {
                _ = token.cancelled() => return None,
                icon = self.favicons.resolve(&link) => icon,
            };
            match icon {
                Some(url) => PreviewState::Valid(url),
                None => PreviewState::NoFavicon,
            }
        } else {
            return None;
        };

        if token.is_cancelled() {
            dir_debug!("Discarding superseded preview result");
            return None;
        }
        Some(PreviewReport { input, state })
    }
}
