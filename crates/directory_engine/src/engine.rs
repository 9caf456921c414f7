use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use directory_core::moderation::Blocklist;
use directory_core::{Schema, SearchToken};
use directory_logging::dir_debug;
use tokio_util::sync::CancellationToken;

use crate::favicon::{FaviconResolver, DEFAULT_FAVICON_SERVICE};
use crate::http::{build_client, HttpSettings};
use crate::local_store::LocalStore;
use crate::preview::{MediaPreviewer, PreviewSettings};
use crate::probe::{HttpImageProber, ImageProber, ProbeSettings};
use crate::search::{SearchAggregator, SearchSettings};
use crate::submit::{SubmissionPipeline, SubmissionRequest};
use crate::{EngineEvent, PreviewInput};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub store_root: PathBuf,
    /// Base URL uploaded blobs are served from.
    pub public_base_url: String,
    pub favicon_service: String,
    pub http: HttpSettings,
    pub probe: ProbeSettings,
    pub search: SearchSettings,
    pub preview: PreviewSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            store_root: PathBuf::from("./directory-data"),
            public_base_url: "http://localhost/blobs".to_string(),
            favicon_service: DEFAULT_FAVICON_SERVICE.to_string(),
            http: HttpSettings::default(),
            probe: ProbeSettings::default(),
            search: SearchSettings::default(),
            preview: PreviewSettings::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("http client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// The IO services the engine thread drives.
#[derive(Clone)]
pub struct EngineServices {
    pub aggregator: Arc<SearchAggregator>,
    pub pipeline: Arc<SubmissionPipeline>,
    pub previewer: Arc<MediaPreviewer>,
}

impl EngineServices {
    /// Wires the filesystem store and the HTTP prober together.
    pub fn local(settings: &EngineSettings) -> Result<Self, EngineError> {
        let store = Arc::new(LocalStore::new(
            settings.store_root.clone(),
            settings.public_base_url.clone(),
        ));
        let client = build_client(&settings.http)?;
        let prober: Arc<dyn ImageProber> =
            Arc::new(HttpImageProber::new(client, settings.probe.clone()));
        let favicons = FaviconResolver::new(prober.clone(), settings.favicon_service.clone());

        Ok(Self {
            aggregator: Arc::new(SearchAggregator::new(
                store.clone(),
                Schema::default(),
                settings.search.clone(),
            )),
            pipeline: Arc::new(SubmissionPipeline::new(
                store.clone(),
                store,
                prober.clone(),
                favicons.clone(),
                Blocklist::default(),
            )),
            previewer: Arc::new(MediaPreviewer::new(
                prober,
                favicons,
                settings.preview.clone(),
            )),
        })
    }
}

enum EngineCommand {
    Search { token: SearchToken, query: String },
    ArmDebounce { generation: u64, delay: Duration },
    CancelDebounce,
    DetachGallery { generation: u64, delay: Duration },
    Submit(SubmissionRequest),
    Preview(PreviewInput),
    ClearPreview,
}

/// Runs engine work on a background tokio runtime. Commands go in over one
/// channel, [`EngineEvent`]s come back over another.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(services: EngineServices) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut debounce: Option<CancellationToken> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::ArmDebounce { generation, delay } => {
                        let token = CancellationToken::new();
                        if let Some(previous) = debounce.replace(token.clone()) {
                            previous.cancel();
                        }
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            tokio::select! {
                                _ = token.cancelled() => {}
                                _ = tokio::time::sleep(delay) => {
                                    let _ = event_tx.send(EngineEvent::DebounceElapsed { generation });
                                }
                            }
                        });
                    }
                    EngineCommand::CancelDebounce => {
                        if let Some(previous) = debounce.take() {
                            previous.cancel();
                        }
                    }
                    EngineCommand::Preview(input) => {
                        // Registered here so supersession follows command order.
                        let token = services.previewer.begin();
                        let previewer = services.previewer.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            if let Some(report) = previewer.run(input, token).await {
                                let _ = event_tx.send(EngineEvent::Preview(report));
                            }
                        });
                    }
                    command => {
                        let services = services.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            handle_command(&services, command, event_tx).await;
                        });
                    }
                }
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn search(&self, token: SearchToken, query: impl Into<String>) {
        self.send(EngineCommand::Search {
            token,
            query: query.into(),
        });
    }

    pub fn arm_debounce(&self, generation: u64, delay: Duration) {
        self.send(EngineCommand::ArmDebounce { generation, delay });
    }

    pub fn cancel_debounce(&self) {
        self.send(EngineCommand::CancelDebounce);
    }

    pub fn schedule_gallery_detach(&self, generation: u64, delay: Duration) {
        self.send(EngineCommand::DetachGallery { generation, delay });
    }

    pub fn submit(&self, request: SubmissionRequest) {
        self.send(EngineCommand::Submit(request));
    }

    pub fn preview(&self, input: PreviewInput) {
        self.send(EngineCommand::Preview(input));
    }

    pub fn clear_preview(&self) {
        self.send(EngineCommand::ClearPreview);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            dir_debug!("Engine thread gone; command dropped");
        }
    }
}

async fn handle_command(
    services: &EngineServices,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Search { token, query } => {
            dir_debug!("Search token={} query='{}'", token, query);
            let result = services.aggregator.search(&query).await;
            let _ = event_tx.send(EngineEvent::SearchCompleted { token, result });
        }
        EngineCommand::DetachGallery { generation, delay } => {
            tokio::time::sleep(delay).await;
            let _ = event_tx.send(EngineEvent::GalleryDetachElapsed { generation });
        }
        EngineCommand::Submit(request) => {
            let kind = request.kind();
            let result = services.pipeline.submit(&request).await;
            let _ = event_tx.send(EngineEvent::SubmitFinished { kind, result });
            services.previewer.clear();
            let _ = event_tx.send(EngineEvent::PreviewCleared);
        }
        EngineCommand::ClearPreview => {
            if services.previewer.clear() {
                dir_debug!("Preview lookup cancelled");
            }
            let _ = event_tx.send(EngineEvent::PreviewCleared);
        }
        EngineCommand::ArmDebounce { .. }
        | EngineCommand::CancelDebounce
        | EngineCommand::Preview(_) => {}
    }
}
