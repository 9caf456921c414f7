use std::fmt;
use std::str::FromStr;

use crate::ResultType;

/// Result view selected by the filter buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Images,
    Websites,
    Videos,
}

impl Filter {
    /// The single result type shown by this filter, `None` for `All`.
    pub fn result_type(self) -> Option<ResultType> {
        match self {
            Filter::All => None,
            Filter::Images => Some(ResultType::Image),
            Filter::Websites => Some(ResultType::Website),
            Filter::Videos => Some(ResultType::Video),
        }
    }

    pub fn no_results_message(self) -> &'static str {
        match self {
            Filter::All => "No results found for your search",
            Filter::Images => "No images found for your search",
            Filter::Websites => "No websites found for your search",
            Filter::Videos => "No videos found for your search",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Images => "images",
            Filter::Websites => "websites",
            Filter::Videos => "videos",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter '{0}' (expected all, images, websites or videos)")]
pub struct UnknownFilter(pub String);

impl FromStr for Filter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "images" | "image" => Ok(Filter::Images),
            "websites" | "website" | "sites" => Ok(Filter::Websites),
            "videos" | "video" => Ok(Filter::Videos),
            other => Err(UnknownFilter(other.to_string())),
        }
    }
}
