//! Directory engine: store adapters, probing, search fan-out, submissions,
//! and effect execution on a background runtime.
mod engine;
mod favicon;
mod http;
mod local_store;
mod persist;
mod preview;
mod probe;
mod search;
mod store;
mod submit;
mod types;

pub use engine::{EngineError, EngineHandle, EngineServices, EngineSettings};
pub use favicon::{favicon_candidates, FaviconResolver, DEFAULT_FAVICON_SERVICE};
pub use http::{build_client, HttpSettings};
pub use local_store::{LocalStore, ID_FIELD};
pub use persist::{PersistError, StoreFiles};
pub use preview::{MediaPreviewer, PreviewSettings};
pub use probe::{with_cache_bust, HttpImageProber, ImageProber, ProbeSettings, CACHE_BUST_PARAM};
pub use search::{SearchAggregator, SearchSettings};
pub use store::{BlobStore, NewDocument, RemoteStore};
pub use submit::{SubmissionPipeline, SubmissionRequest, SubmitControl, SubmitGuard};
pub use types::{
    EngineEvent, PreviewInput, PreviewReport, PreviewState, SearchError, StoreError,
    SubmitError, SubmitReceipt,
};
