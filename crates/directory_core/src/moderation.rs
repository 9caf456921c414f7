//! Keyword and domain blocklist applied to submissions before they are stored.
//!
//! This is an advisory, client-side hint. It is not a security boundary: a
//! client that skips it can still write to the store, and the lists are
//! trivially evaded. Server-side enforcement is out of scope.

use std::fmt;

use url::Url;

pub const BLOCKED_KEYWORDS: &[&str] = &[
    "porn",
    "pornhub",
    "xvideos",
    "xhamster",
    "xnxx",
    "redtube",
    "youporn",
    "adult",
    "xxx",
    "escort",
    "cam",
    "hentai",
    "nsfw",
    "pornography",
    "nude",
    "erotic",
    "sex",
];

pub const BLOCKED_DOMAINS: &[&str] = &[
    "pornhub.com",
    "xvideos.com",
    "xhamster.com",
    "xnxx.com",
    "redtube.com",
    "youporn.com",
    "porn.com",
];

/// Text fields of a submission as the moderation filter sees them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Candidate<'a> {
    pub title: &'a str,
    pub link: &'a str,
    pub description: &'a str,
    pub keywords: &'a str,
}

/// Why a submission was refused. `Display` is the user-visible reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    Domain(String),
    DomainKeyword(String),
    Title,
    Description,
    Keywords,
    MediaUrl(String),
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::Domain(host) => write!(f, "blocked domain: {host}"),
            BlockReason::DomainKeyword(host) => write!(f, "blocked domain keyword: {host}"),
            BlockReason::Title => f.write_str("title contains disallowed content"),
            BlockReason::Description => f.write_str("description contains disallowed content"),
            BlockReason::Keywords => f.write_str("keywords contain disallowed content"),
            BlockReason::MediaUrl(url) => {
                write!(f, "media URL blocked due to disallowed content: {url}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocklist {
    keywords: Vec<String>,
    domains: Vec<String>,
}

impl Default for Blocklist {
    fn default() -> Self {
        Self::new(BLOCKED_KEYWORDS.iter().copied(), BLOCKED_DOMAINS.iter().copied())
    }
}

impl Blocklist {
    pub fn new<K, D>(keywords: K, domains: D) -> Self
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            domains: domains
                .into_iter()
                .map(|d| d.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Returns the first violation in the order: link domain, link domain
    /// keyword, title, description, keywords.
    pub fn evaluate(&self, candidate: &Candidate<'_>) -> Option<BlockReason> {
        if let Some(host) = hostname(candidate.link) {
            if self.is_blocked_domain(&host) {
                return Some(BlockReason::Domain(host));
            }
            if self.contains_keyword(&host) {
                return Some(BlockReason::DomainKeyword(host));
            }
        }
        if self.contains_keyword(candidate.title) {
            return Some(BlockReason::Title);
        }
        if self.contains_keyword(candidate.description) {
            return Some(BlockReason::Description);
        }
        if self.contains_keyword(candidate.keywords) {
            return Some(BlockReason::Keywords);
        }
        None
    }

    /// Checks a resolved media URL against both lists.
    pub fn check_media_url(&self, url: &str) -> Option<BlockReason> {
        let blocked_host = hostname(url)
            .map(|host| self.is_blocked_domain(&host))
            .unwrap_or(false);
        if blocked_host || self.contains_keyword(url) {
            return Some(BlockReason::MediaUrl(url.to_string()));
        }
        None
    }

    pub fn contains_keyword(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let lowered = text.to_lowercase();
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    /// Exact match or subdomain match.
    pub fn is_blocked_domain(&self, host: &str) -> bool {
        self.domains.iter().any(|domain| {
            host == domain
                || host
                    .strip_suffix(domain.as_str())
                    .map(|prefix| prefix.ends_with('.'))
                    .unwrap_or(false)
        })
    }
}

/// Lower-cased hostname with a leading `www.` removed.
pub fn hostname(link: &str) -> Option<String> {
    let parsed = Url::parse(link.trim()).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}
