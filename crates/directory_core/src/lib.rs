//! Directory core: pure search/render state machine, moderation and
//! submission validation. No IO lives here.
mod effect;
mod filter;
mod gallery;
pub mod location;
pub mod moderation;
mod msg;
mod result;
pub mod schema;
mod state;
pub mod submission;
mod update;
mod view_model;

pub use effect::Effect;
pub use filter::{Filter, UnknownFilter};
pub use gallery::{Gallery, GalleryItem, GalleryKey, GalleryPhase, GalleryView};
pub use moderation::{BlockReason, Blocklist, Candidate};
pub use msg::Msg;
pub use result::{NormalizedResult, ResultType};
pub use schema::Schema;
pub use state::{SearchSession, SearchToken, SessionConfig, DEFAULT_DEBOUNCE, GALLERY_FADE};
pub use submission::{
    ImageForm, MediaSource, SiteForm, SubmissionKind, Upload, ValidationError, VideoForm,
};
pub use update::update;
pub use view_model::{
    render, AppViewModel, Badge, Card, DebugView, ResultsView, Section, SectionLayout,
    ALL_IMAGES_CAP, FALLBACK_IMAGE, PROMPT_MESSAGE, SEARCH_ERROR_MESSAGE,
};
