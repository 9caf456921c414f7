//! Submission forms: required-field validation and persisted document shapes.

use std::fmt;

use serde_json::{json, Map, Value};
use url::Url;

use crate::moderation::Candidate;

pub const CREATED_AT_FIELD: &str = "created_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Site,
    Image,
    Video,
}

impl SubmissionKind {
    pub fn collection(self) -> &'static str {
        match self {
            SubmissionKind::Site => "websites",
            SubmissionKind::Image => "images",
            SubmissionKind::Video => "videos",
        }
    }

    pub fn upload_prefix(self) -> &'static str {
        match self {
            SubmissionKind::Site => "website_images/",
            SubmissionKind::Image => "image_posts/",
            SubmissionKind::Video => "video_posts/",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SubmissionKind::Site => "website",
            SubmissionKind::Image => "image",
            SubmissionKind::Video => "video",
        }
    }

    /// Whether a favicon may stand in for missing media.
    pub fn accepts_favicon(self) -> bool {
        !matches!(self, SubmissionKind::Video)
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields (missing: {})", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// A file picked for upload alongside the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Where the representative media of a submission comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource<'a> {
    Url(&'a str),
    Upload(&'a Upload),
    None,
}

fn media_source<'a>(explicit: &'a str, upload: Option<&'a Upload>) -> MediaSource<'a> {
    let explicit = explicit.trim();
    if !explicit.is_empty() {
        MediaSource::Url(explicit)
    } else if let Some(upload) = upload {
        MediaSource::Upload(upload)
    } else {
        MediaSource::None
    }
}

fn require(missing: &mut Vec<&'static str>, name: &'static str, value: &str) {
    if value.trim().is_empty() {
        missing.push(name);
    }
}

fn finish(missing: Vec<&'static str>) -> Result<(), ValidationError> {
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteForm {
    pub title: String,
    pub link: String,
    /// Comma-separated.
    pub keywords: String,
    pub description: String,
    pub image_url: String,
    pub upload: Option<Upload>,
    pub is_company: bool,
    pub company_name: String,
    pub site_type: String,
}

impl SiteForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        require(&mut missing, "title", &self.title);
        require(&mut missing, "link", &self.link);
        require(&mut missing, "keywords", &self.keywords);
        require(&mut missing, "description", &self.description);
        finish(missing)
    }

    pub fn candidate(&self) -> Candidate<'_> {
        Candidate {
            title: self.title.trim(),
            link: self.link.trim(),
            description: self.description.trim(),
            keywords: self.keywords.trim(),
        }
    }

    pub fn media_source(&self) -> MediaSource<'_> {
        media_source(&self.image_url, self.upload.as_ref())
    }

    pub fn to_document(&self, image_url: Option<&str>) -> Map<String, Value> {
        let company_name = if self.is_company {
            self.company_name.trim()
        } else {
            ""
        };
        let site_type = if self.is_company {
            ""
        } else {
            self.site_type.trim()
        };
        into_map(json!({
            "website_title": self.title.trim(),
            "website_link": self.link.trim(),
            "website_keywords": parse_keywords(&self.keywords),
            "website_description": self.description.trim(),
            "website_image": image_url,
            "isCompany": self.is_company,
            "companyName": company_name,
            "siteType": site_type,
        }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageForm {
    pub title: String,
    pub title_link: String,
    pub description: String,
    pub image_url: String,
    pub upload: Option<Upload>,
}

impl ImageForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        require(&mut missing, "title", &self.title);
        require(&mut missing, "description", &self.description);
        finish(missing)
    }

    pub fn candidate(&self) -> Candidate<'_> {
        Candidate {
            title: self.title.trim(),
            link: self.title_link.trim(),
            description: self.description.trim(),
            keywords: "",
        }
    }

    pub fn media_source(&self) -> MediaSource<'_> {
        media_source(&self.image_url, self.upload.as_ref())
    }

    pub fn to_document(&self, image_url: &str) -> Map<String, Value> {
        into_map(json!({
            "image_url": image_url,
            "title": self.title.trim(),
            "title_link": self.title_link.trim(),
            "description": self.description.trim(),
        }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoForm {
    pub title: String,
    pub title_link: String,
    pub description: String,
    pub video_url: String,
    pub upload: Option<Upload>,
}

impl VideoForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        require(&mut missing, "title", &self.title);
        require(&mut missing, "description", &self.description);
        finish(missing)
    }

    pub fn candidate(&self) -> Candidate<'_> {
        Candidate {
            title: self.title.trim(),
            link: self.title_link.trim(),
            description: self.description.trim(),
            keywords: "",
        }
    }

    pub fn media_source(&self) -> MediaSource<'_> {
        media_source(&self.video_url, self.upload.as_ref())
    }

    pub fn to_document(&self, video_url: &str) -> Map<String, Value> {
        into_map(json!({
            "video_url": video_url,
            "title": self.title.trim(),
            "title_link": self.title_link.trim(),
            "description": self.description.trim(),
            "thumbnail": youtube_thumbnail(video_url),
        }))
    }
}

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Splits on commas, trims, drops empties.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Object-store path for an uploaded file: `{prefix}{millis}_{sanitized name}`.
pub fn upload_object_path(kind: SubmissionKind, millis: i64, file_name: &str) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}{millis}_{sanitized}", kind.upload_prefix())
}

pub fn youtube_id(video_url: &str) -> Option<String> {
    let parsed = Url::parse(video_url).ok()?;
    let host = parsed.host_str()?;
    if host.contains("youtube.com") {
        return parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .filter(|id| !id.is_empty());
    }
    if host == "youtu.be" {
        let id = parsed.path().trim_start_matches('/');
        return (!id.is_empty()).then(|| id.to_string());
    }
    None
}

pub fn youtube_thumbnail(video_url: &str) -> Option<String> {
    youtube_id(video_url).map(|id| format!("https://img.youtube.com/vi/{id}/hqdefault.jpg"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_form_reports_every_missing_field() {
        let form = SiteForm {
            title: "  ".into(),
            link: "https://a.example".into(),
            ..SiteForm::default()
        };
        assert_eq!(
            form.validate(),
            Err(ValidationError::MissingFields(vec![
                "title",
                "keywords",
                "description"
            ]))
        );
    }

    #[test]
    fn image_and_video_forms_require_title_and_description() {
        let image = ImageForm {
            title: "Sunset".into(),
            image_url: "https://i.example/a.png".into(),
            ..ImageForm::default()
        };
        assert_eq!(
            image.validate(),
            Err(ValidationError::MissingFields(vec!["description"]))
        );

        let video = VideoForm {
            description: "Conference talk".into(),
            video_url: "https://v.example/1".into(),
            ..VideoForm::default()
        };
        assert_eq!(
            video.validate(),
            Err(ValidationError::MissingFields(vec!["title"]))
        );
        assert_eq!(
            VideoForm::default().validate(),
            Err(ValidationError::MissingFields(vec!["title", "description"]))
        );
    }

    #[test]
    fn only_videos_refuse_a_favicon() {
        assert!(SubmissionKind::Site.accepts_favicon());
        assert!(SubmissionKind::Image.accepts_favicon());
        assert!(!SubmissionKind::Video.accepts_favicon());
    }

    #[test]
    fn site_document_keeps_only_relevant_attribution() {
        let form = SiteForm {
            title: " Rust ".into(),
            link: "https://rust-lang.org".into(),
            keywords: "rust, , systems ,".into(),
            description: "lang".into(),
            is_company: false,
            company_name: "Ignored Inc".into(),
            site_type: "Blog".into(),
            ..SiteForm::default()
        };
        let doc = form.to_document(None);
        assert_eq!(doc["website_title"], "Rust");
        assert_eq!(doc["website_keywords"], json!(["rust", "systems"]));
        assert_eq!(doc["website_image"], Value::Null);
        assert_eq!(doc["companyName"], "");
        assert_eq!(doc["siteType"], "Blog");
        assert!(!doc.contains_key(CREATED_AT_FIELD));
    }

    #[test]
    fn explicit_url_takes_precedence_over_upload() {
        let upload = Upload {
            file_name: "a.png".into(),
            bytes: vec![1, 2, 3],
        };
        let form = ImageForm {
            image_url: " https://i.example/a.png ".into(),
            upload: Some(upload.clone()),
            ..ImageForm::default()
        };
        assert_eq!(form.media_source(), MediaSource::Url("https://i.example/a.png"));

        let form = ImageForm {
            upload: Some(upload.clone()),
            ..ImageForm::default()
        };
        assert_eq!(form.media_source(), MediaSource::Upload(&upload));
    }

    #[test]
    fn upload_names_are_sanitised() {
        assert_eq!(
            upload_object_path(SubmissionKind::Video, 1700, "my clip (1).mp4"),
            "video_posts/1700_my_clip__1_.mp4"
        );
    }

    #[test]
    fn youtube_links_yield_thumbnails() {
        assert_eq!(
            youtube_thumbnail("https://www.youtube.com/watch?v=abc123&t=4"),
            Some("https://img.youtube.com/vi/abc123/hqdefault.jpg".into())
        );
        assert_eq!(youtube_id("https://youtu.be/xyz"), Some("xyz".into()));
        assert_eq!(youtube_id("https://vimeo.com/1"), None);
    }
}
