//! Submission pipeline: validate, moderate, resolve media, persist once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use directory_core::moderation::{Blocklist, Candidate};
use directory_core::submission::{upload_object_path, CREATED_AT_FIELD};
use directory_core::{ImageForm, MediaSource, SiteForm, SubmissionKind, VideoForm};
use directory_logging::{dir_error, dir_info};
use serde_json::{Map, Value};

use crate::favicon::FaviconResolver;
use crate::probe::ImageProber;
use crate::store::{BlobStore, NewDocument, RemoteStore};
use crate::{SubmitError, SubmitReceipt};

/// The "disabled submit button": at most one submission runs at a time.
#[derive(Debug, Clone, Default)]
pub struct SubmitControl {
    busy: Arc<AtomicBool>,
}

impl SubmitControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        !self.busy.load(Ordering::Acquire)
    }

    /// Disables the control until the returned guard drops.
    pub fn try_acquire(&self) -> Option<SubmitGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitGuard {
                busy: self.busy.clone(),
            })
    }
}

/// Re-enables the submit control on every exit path.
#[derive(Debug)]
pub struct SubmitGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// One form of any variant, as handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionRequest {
    Site(SiteForm),
    Image(ImageForm),
    Video(VideoForm),
}

impl SubmissionRequest {
    pub fn kind(&self) -> SubmissionKind {
        match self {
            SubmissionRequest::Site(_) => SubmissionKind::Site,
            SubmissionRequest::Image(_) => SubmissionKind::Image,
            SubmissionRequest::Video(_) => SubmissionKind::Video,
        }
    }
}

pub struct SubmissionPipeline {
    store: Arc<dyn RemoteStore>,
    blobs: Arc<dyn BlobStore>,
    prober: Arc<dyn ImageProber>,
    favicons: FaviconResolver,
    blocklist: Blocklist,
    control: SubmitControl,
}

impl SubmissionPipeline {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        blobs: Arc<dyn BlobStore>,
        prober: Arc<dyn ImageProber>,
        favicons: FaviconResolver,
        blocklist: Blocklist,
    ) -> Self {
        Self {
            store,
            blobs,
            prober,
            favicons,
            blocklist,
            control: SubmitControl::new(),
        }
    }

    pub fn control(&self) -> &SubmitControl {
        &self.control
    }

    pub async fn submit(&self, request: &SubmissionRequest) -> Result<SubmitReceipt, SubmitError> {
        match request {
            SubmissionRequest::Site(form) => self.submit_site(form).await,
            SubmissionRequest::Image(form) => self.submit_image(form).await,
            SubmissionRequest::Video(form) => self.submit_video(form).await,
        }
    }

    pub async fn submit_site(&self, form: &SiteForm) -> Result<SubmitReceipt, SubmitError> {
        let _guard = self.control.try_acquire().ok_or(SubmitError::Busy)?;
        let kind = SubmissionKind::Site;
        form.validate()?;
        self.moderate(kind, &form.candidate())?;
        self.await_connection().await?;

        let media = self
            .resolve_media(kind, form.media_source(), &form.link)
            .await?;
        self.persist(kind, form.to_document(media.as_deref()), media)
            .await
    }

    pub async fn submit_image(&self, form: &ImageForm) -> Result<SubmitReceipt, SubmitError> {
        let _guard = self.control.try_acquire().ok_or(SubmitError::Busy)?;
        let kind = SubmissionKind::Image;
        form.validate()?;
        self.moderate(kind, &form.candidate())?;
        self.await_connection().await?;

        let media = self
            .resolve_media(kind, form.media_source(), &form.title_link)
            .await?
            .ok_or(SubmitError::MissingMedia(kind))?;
        self.persist(kind, form.to_document(&media), Some(media))
            .await
    }

    pub async fn submit_video(&self, form: &VideoForm) -> Result<SubmitReceipt, SubmitError> {
        let _guard = self.control.try_acquire().ok_or(SubmitError::Busy)?;
        let kind = SubmissionKind::Video;
        form.validate()?;
        self.moderate(kind, &form.candidate())?;
        self.await_connection().await?;

        let media = self
            .resolve_media(kind, form.media_source(), &form.title_link)
            .await?
            .ok_or(SubmitError::MissingMedia(kind))?;
        self.persist(kind, form.to_document(&media), Some(media))
            .await
    }

    fn moderate(&self, kind: SubmissionKind, candidate: &Candidate<'_>) -> Result<(), SubmitError> {
        match self.blocklist.evaluate(candidate) {
            Some(reason) => {
                dir_info!("Blocked {} submission: {}", kind, reason);
                Err(SubmitError::Blocked(reason))
            }
            None => Ok(()),
        }
    }

    async fn await_connection(&self) -> Result<(), SubmitError> {
        self.store.connection_ready().await.map_err(|err| {
            dir_error!("Store not reachable: {}", err);
            SubmitError::Connectivity(err.to_string())
        })
    }

    /// Explicit URL (must probe), else upload, else favicon of `link` where
    /// the variant allows it. `None` when nothing applies.
    async fn resolve_media(
        &self,
        kind: SubmissionKind,
        source: MediaSource<'_>,
        link: &str,
    ) -> Result<Option<String>, SubmitError> {
        match source {
            MediaSource::Url(url) => {
                let ok = match kind {
                    SubmissionKind::Video => self.prober.reachable(url).await,
                    SubmissionKind::Site | SubmissionKind::Image => self.prober.probe(url).await,
                };
                if !ok {
                    dir_info!("Rejected unreachable {} media {}", kind, url);
                    return Err(SubmitError::MediaUnreachable {
                        kind,
                        url: url.to_string(),
                    });
                }
                Ok(Some(url.to_string()))
            }
            MediaSource::Upload(upload) => {
                let path = upload_object_path(kind, Utc::now().timestamp_millis(), &upload.file_name);
                dir_info!("Uploading {} ({} bytes)", path, upload.bytes.len());
                let url = self
                    .blobs
                    .upload_blob(&path, Bytes::from(upload.bytes.clone()))
                    .await
                    .map_err(|err| {
                        dir_error!("Upload of {} failed: {}", path, err);
                        SubmitError::Upload(err)
                    })?;
                Ok(Some(url))
            }
            MediaSource::None => {
                let link = link.trim();
                if !kind.accepts_favicon() || link.is_empty() {
                    return Ok(None);
                }
                Ok(self.favicons.resolve(link).await)
            }
        }
    }

    async fn persist(
        &self,
        kind: SubmissionKind,
        fields: Map<String, Value>,
        media: Option<String>,
    ) -> Result<SubmitReceipt, SubmitError> {
        if let Some(url) = media.as_deref() {
            if let Some(reason) = self.blocklist.check_media_url(url) {
                dir_info!("Blocked {} media: {}", kind, reason);
                return Err(SubmitError::MediaBlocked(reason));
            }
        }

        let doc = NewDocument::new(fields).with_server_timestamp(CREATED_AT_FIELD);
        let id = self
            .store
            .add_document(kind.collection(), doc)
            .await
            .map_err(|err| {
                dir_error!("Writing {} failed: {}", kind, err);
                SubmitError::Store(err)
            })?;
        dir_info!("Stored {} submission {}", kind, id);
        Ok(SubmitReceipt {
            kind,
            id,
            media_url: media,
        })
    }
}
