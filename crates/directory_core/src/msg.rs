use crate::{Filter, GalleryKey, NormalizedResult, SearchToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Page opened with a location such as `?q=cats&debug=1`.
    LocationLoaded(String),
    /// User edited the search box.
    InputChanged(String),
    /// Button or Enter: search now.
    SearchSubmitted,
    /// The quiet period after typing elapsed.
    DebounceElapsed { generation: u64 },
    SearchCompleted {
        token: SearchToken,
        results: Vec<NormalizedResult>,
    },
    SearchFailed { token: SearchToken, message: String },
    FilterSelected(Filter),
    /// Pointer activation on the `index`-th displayed image.
    ImageActivated { index: usize },
    GalleryKey(GalleryKey),
    GalleryNext,
    GalleryPrev,
    GalleryCloseRequested,
    /// The exit fade finished.
    GalleryDetachElapsed { generation: u64 },
    Tick,
    NoOp,
}
