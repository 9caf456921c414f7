/// One image shown in the overlay, with the metadata of the card it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub src: String,
    pub alt: String,
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    /// Company name, else site type.
    pub attribution: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GalleryPhase {
    #[default]
    Closed,
    Open,
    /// Fading out; detached once the matching close generation elapses.
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryKey {
    Left,
    Right,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryView {
    pub item: GalleryItem,
    pub index: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
    /// False while the exit fade runs.
    pub visible: bool,
}

/// Overlay state machine: Closed -> Open(i) -> Closing -> Closed, with
/// clamped navigation while open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Gallery {
    items: Vec<GalleryItem>,
    index: usize,
    phase: GalleryPhase,
    close_generation: u64,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens at `index` (clamped). Opening with no items is a no-op.
    pub fn open(&mut self, items: Vec<GalleryItem>, index: usize) -> bool {
        if items.is_empty() {
            return false;
        }
        self.index = index.min(items.len() - 1);
        self.items = items;
        self.phase = GalleryPhase::Open;
        true
    }

    pub fn next(&mut self) -> bool {
        if self.phase != GalleryPhase::Open || self.index + 1 >= self.items.len() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn prev(&mut self) -> bool {
        if self.phase != GalleryPhase::Open || self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Starts the exit fade. Returns the generation the detach must carry,
    /// or `None` when the overlay was not open.
    pub fn begin_close(&mut self) -> Option<u64> {
        if self.phase != GalleryPhase::Open {
            return None;
        }
        self.phase = GalleryPhase::Closing;
        self.close_generation += 1;
        Some(self.close_generation)
    }

    /// Detaches after the fade. Stale generations (the overlay was reopened
    /// meanwhile) are ignored.
    pub fn finish_close(&mut self, generation: u64) -> bool {
        if self.phase != GalleryPhase::Closing || generation != self.close_generation {
            return false;
        }
        self.phase = GalleryPhase::Closed;
        self.items.clear();
        self.index = 0;
        true
    }

    pub fn phase(&self) -> GalleryPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase == GalleryPhase::Open
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn view(&self) -> Option<GalleryView> {
        if self.phase == GalleryPhase::Closed {
            return None;
        }
        let item = self.items.get(self.index)?.clone();
        Some(GalleryView {
            item,
            index: self.index,
            total: self.items.len(),
            has_prev: self.index > 0,
            has_next: self.index + 1 < self.items.len(),
            visible: self.phase == GalleryPhase::Open,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<GalleryItem> {
        (0..n)
            .map(|i| GalleryItem {
                src: format!("https://img.example/{i}.png"),
                alt: format!("img {i}"),
                title: format!("img {i}"),
                description: String::new(),
                link: None,
                attribution: None,
            })
            .collect()
    }

    #[test]
    fn open_with_no_items_is_a_noop() {
        let mut gallery = Gallery::new();
        assert!(!gallery.open(Vec::new(), 0));
        assert_eq!(gallery.phase(), GalleryPhase::Closed);
        assert!(gallery.view().is_none());
    }

    #[test]
    fn open_clamps_index() {
        let mut gallery = Gallery::new();
        assert!(gallery.open(items(3), 10));
        assert_eq!(gallery.index(), 2);
        let view = gallery.view().unwrap();
        assert!(view.has_prev);
        assert!(!view.has_next);
    }

    #[test]
    fn navigation_stops_at_bounds() {
        let mut gallery = Gallery::new();
        gallery.open(items(2), 0);
        assert!(!gallery.prev());
        assert_eq!(gallery.index(), 0);
        assert!(gallery.next());
        assert!(!gallery.next());
        assert_eq!(gallery.index(), 1);
    }

    #[test]
    fn closing_twice_is_a_noop() {
        let mut gallery = Gallery::new();
        gallery.open(items(1), 0);
        let generation = gallery.begin_close().unwrap();
        assert_eq!(gallery.begin_close(), None);
        assert!(!gallery.view().unwrap().visible);
        assert!(gallery.finish_close(generation));
        assert!(!gallery.finish_close(generation));
        assert_eq!(gallery.begin_close(), None);
        assert_eq!(gallery.phase(), GalleryPhase::Closed);
    }

    #[test]
    fn reopening_during_fade_ignores_stale_detach() {
        let mut gallery = Gallery::new();
        gallery.open(items(2), 0);
        let generation = gallery.begin_close().unwrap();
        gallery.open(items(2), 1);
        assert!(!gallery.finish_close(generation));
        assert!(gallery.is_open());
    }
}
