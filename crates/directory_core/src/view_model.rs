//! Declarative description of the results area.
//!
//! [`render`] is a pure function of `(results, filter, is_searching)`. The UI
//! layer binds the returned [`ResultsView`] to markup and is responsible for
//! escaping every text field it inserts.

use crate::{Filter, GalleryItem, GalleryView, NormalizedResult, ResultType};

pub const FALLBACK_IMAGE: &str = "https://via.placeholder.com/400x300?text=No+Image";
/// Images shown in the grid of the "all" layout (3x3).
pub const ALL_IMAGES_CAP: usize = 9;
pub const UNTITLED: &str = "Untitled";
pub const PROMPT_MESSAGE: &str = "Please enter a search term";
pub const SEARCH_ERROR_MESSAGE: &str = "An error occurred while searching. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Badge {
    /// Company name of a registered company.
    Company(String),
    /// Company name given by an individual owner.
    Owner(String),
    /// Flagged as a company without a name.
    CompanyOnly,
    SiteType(String),
}

impl Badge {
    pub fn label(&self) -> &str {
        match self {
            Badge::Company(_) | Badge::CompanyOnly => "Company",
            Badge::Owner(_) => "Owner",
            Badge::SiteType(site_type) => site_type,
        }
    }

    pub fn company_name(&self) -> Option<&str> {
        match self {
            Badge::Company(name) | Badge::Owner(name) => Some(name),
            Badge::CompanyOnly | Badge::SiteType(_) => None,
        }
    }

    /// Company name precedes `is_company`, which precedes site type.
    pub fn for_result(result: &NormalizedResult) -> Option<Self> {
        let company = result.company_name.trim();
        if !company.is_empty() {
            return Some(if result.is_company {
                Badge::Company(company.to_string())
            } else {
                Badge::Owner(company.to_string())
            });
        }
        if result.is_company {
            return Some(Badge::CompanyOnly);
        }
        let site_type = result.site_type.trim();
        (!site_type.is_empty()).then(|| Badge::SiteType(site_type.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub result_type: ResultType,
    pub title: String,
    pub description: String,
    /// `#` when the record has no link.
    pub link: String,
    pub image_src: String,
    /// Substituted by the UI when `image_src` fails to load.
    pub fallback_src: &'static str,
    pub action_label: &'static str,
    pub badge: Option<Badge>,
}

impl Card {
    pub fn from_result(result: &NormalizedResult) -> Self {
        Self {
            result_type: result.result_type,
            title: non_empty_or(&result.title, UNTITLED),
            description: result.description.clone(),
            link: non_empty_or(&result.url, "#"),
            image_src: non_empty_or(&result.image_url, FALLBACK_IMAGE),
            fallback_src: FALLBACK_IMAGE,
            action_label: result.result_type.action_label(),
            badge: Badge::for_result(result),
        }
    }

    fn gallery_item(&self) -> GalleryItem {
        let attribution = self.badge.as_ref().and_then(|badge| match badge {
            Badge::Company(name) | Badge::Owner(name) => Some(name.clone()),
            Badge::SiteType(site_type) => Some(site_type.clone()),
            Badge::CompanyOnly => None,
        });
        GalleryItem {
            src: self.image_src.clone(),
            alt: self.title.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            link: (self.link != "#").then(|| self.link.clone()),
            attribution,
        }
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLayout {
    /// Image tiles with captions.
    Grid,
    /// One row per result with thumbnail, text and action link.
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub result_type: ResultType,
    pub heading: &'static str,
    pub layout: SectionLayout,
    pub cards: Vec<Card>,
}

impl Section {
    fn new(result_type: ResultType, layout: SectionLayout, results: &[&NormalizedResult]) -> Self {
        let heading = match result_type {
            ResultType::Image => "Images",
            ResultType::Video => "Videos",
            ResultType::Website => "Websites",
        };
        Self {
            result_type,
            heading,
            layout,
            cards: results.iter().map(|r| Card::from_result(r)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultsView {
    /// Cleared while a search is starting.
    #[default]
    Blank,
    Prompt,
    Error(String),
    NoResults(Filter),
    Sections(Vec<Section>),
}

impl ResultsView {
    /// Every displayed image, in display order. The gallery re-derives its
    /// list from this each time it opens.
    pub fn gallery_items(&self) -> Vec<GalleryItem> {
        match self {
            ResultsView::Sections(sections) => sections
                .iter()
                .flat_map(|section| section.cards.iter())
                .map(Card::gallery_item)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn card_count(&self) -> usize {
        match self {
            ResultsView::Sections(sections) => sections.iter().map(|s| s.cards.len()).sum(),
            _ => 0,
        }
    }
}

/// Renders the results area. `None` means "leave the current display as it
/// is": an empty result while a search is in flight must not flash a
/// "no results" placeholder.
pub fn render(
    results: &[NormalizedResult],
    filter: Filter,
    is_searching: bool,
) -> Option<ResultsView> {
    if results.is_empty() {
        return (!is_searching).then_some(ResultsView::NoResults(filter));
    }

    let partition = |kind: ResultType| -> Vec<&NormalizedResult> {
        results.iter().filter(|r| r.result_type == kind).collect()
    };

    match filter.result_type() {
        None => {
            let images = partition(ResultType::Image);
            if images.is_empty() && is_searching {
                return None;
            }
            let capped = &images[..images.len().min(ALL_IMAGES_CAP)];
            let sections: Vec<Section> = [
                (ResultType::Image, SectionLayout::Grid, capped.to_vec()),
                (ResultType::Video, SectionLayout::List, partition(ResultType::Video)),
                (ResultType::Website, SectionLayout::List, partition(ResultType::Website)),
            ]
            .into_iter()
            .filter(|(_, _, items)| !items.is_empty())
            .map(|(kind, layout, items)| Section::new(kind, layout, &items))
            .collect();
            if sections.is_empty() {
                return Some(ResultsView::NoResults(filter));
            }
            Some(ResultsView::Sections(sections))
        }
        Some(kind) => {
            let items = partition(kind);
            if items.is_empty() {
                return (!is_searching).then_some(ResultsView::NoResults(filter));
            }
            let layout = if kind == ResultType::Image {
                SectionLayout::Grid
            } else {
                SectionLayout::List
            };
            Some(ResultsView::Sections(vec![Section::new(kind, layout, &items)]))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugView {
    pub token: u64,
    pub last_query: String,
    pub is_searching: bool,
    pub result_count: usize,
    pub filter: Filter,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub input: String,
    pub filter: Filter,
    pub loading: bool,
    pub results: ResultsView,
    pub gallery: Option<GalleryView>,
    pub scroll_locked: bool,
    pub location: Option<String>,
    pub debug: Option<DebugView>,
    pub dirty: bool,
}
