use std::sync::Arc;

use directory_logging::dir_debug;
use url::{form_urlencoded, Url};

use crate::probe::ImageProber;

pub const DEFAULT_FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons?sz=64&domain_url=";
const ICON_PATHS: [&str; 3] = ["/favicon.ico", "/favicon.png", "/favicon.svg"];

/// Ordered icon candidates for `site_url`: the site's own favicon paths,
/// then the lookup service. An unparsable site URL yields only the service.
pub fn favicon_candidates(site_url: &str, service_base: &str) -> Vec<String> {
    let site_url = site_url.trim();
    let encoded: String = form_urlencoded::byte_serialize(site_url.as_bytes()).collect();
    let service = format!("{service_base}{encoded}");

    let origin = Url::parse(site_url)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(|url| url.origin().ascii_serialization());
    match origin {
        Some(origin) => ICON_PATHS
            .iter()
            .map(|path| format!("{origin}{path}"))
            .chain(std::iter::once(service))
            .collect(),
        None => vec![service],
    }
}

#[derive(Clone)]
pub struct FaviconResolver {
    prober: Arc<dyn ImageProber>,
    service_base: String,
}

impl FaviconResolver {
    pub fn new(prober: Arc<dyn ImageProber>, service_base: impl Into<String>) -> Self {
        Self {
            prober,
            service_base: service_base.into(),
        }
    }

    /// First candidate the prober confirms. `None` means no icon, not an error.
    pub async fn resolve(&self, site_url: &str) -> Option<String> {
        for candidate in favicon_candidates(site_url, &self.service_base) {
            if self.prober.probe(&candidate).await {
                dir_debug!("Favicon for {} resolved to {}", site_url, candidate);
                return Some(candidate);
            }
        }
        dir_debug!("No favicon found for {}", site_url);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn candidates_follow_priority_order() {
        assert_eq!(
            favicon_candidates("https://www.rust-lang.org/learn?x=1", DEFAULT_FAVICON_SERVICE),
            vec![
                "https://www.rust-lang.org/favicon.ico".to_string(),
                "https://www.rust-lang.org/favicon.png".to_string(),
                "https://www.rust-lang.org/favicon.svg".to_string(),
                "https://www.google.com/s2/favicons?sz=64&domain_url=https%3A%2F%2Fwww.rust-lang.org%2Flearn%3Fx%3D1".to_string(),
            ]
        );
    }

    #[test]
    fn unparsable_site_goes_straight_to_service() {
        assert_eq!(
            favicon_candidates("rust-lang.org", "https://icons.example/?u="),
            vec!["https://icons.example/?u=rust-lang.org".to_string()]
        );
    }
}
