//! Schema aliasing for stored records.
//!
//! Records were written by several generations of the submission forms, so
//! every logical field may live under more than one key. Each logical field
//! has an ordered alias list; the first alias holding a usable value wins.
//! New aliases are added to the tables, never as inline conditionals.

use serde_json::{Map, Value};

use crate::{NormalizedResult, ResultType};

/// Substring that marks the stock placeholder thumbnail.
pub const PLACEHOLDER_IMAGE_MARKER: &str = "default-thumbnail.png";

pub const TITLE_ALIASES: &[&str] = &["title", "website_title"];
pub const DESCRIPTION_ALIASES: &[&str] = &["description", "website_description"];
pub const KEYWORD_ALIASES: &[&str] = &["website_keywords", "keywords"];
pub const IMAGE_ALIASES: &[&str] = &["imageUrl", "website_image", "image_url", "thumbnail"];
pub const URL_ALIASES: &[&str] = &["url", "website_link", "video_url", "title_link"];
pub const COMPANY_FLAG_ALIASES: &[&str] = &["isCompany"];
pub const COMPANY_NAME_ALIASES: &[&str] = &[
    "companyName",
    "company_name",
    "company",
    "businessName",
    "business_name",
];
pub const SITE_TYPE_ALIASES: &[&str] = &[
    "siteType",
    "site_type",
    "site_type_name",
    "website_type",
    "type",
];
pub const VIDEO_HINT_FIELDS: &[&str] = &["video_url", "videoUrl"];
pub const IMAGE_HINT_FIELDS: &[&str] = &["image_url", "imageUrl", "website_image"];

/// Ordered alias tables plus the collection-name to type mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub title: Vec<String>,
    pub description: Vec<String>,
    pub keywords: Vec<String>,
    pub image: Vec<String>,
    pub url: Vec<String>,
    pub company_flag: Vec<String>,
    pub company_name: Vec<String>,
    pub site_type: Vec<String>,
    pub video_hints: Vec<String>,
    pub image_hints: Vec<String>,
    pub collection_types: Vec<(String, ResultType)>,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            title: owned(TITLE_ALIASES),
            description: owned(DESCRIPTION_ALIASES),
            keywords: owned(KEYWORD_ALIASES),
            image: owned(IMAGE_ALIASES),
            url: owned(URL_ALIASES),
            company_flag: owned(COMPANY_FLAG_ALIASES),
            company_name: owned(COMPANY_NAME_ALIASES),
            site_type: owned(SITE_TYPE_ALIASES),
            video_hints: owned(VIDEO_HINT_FIELDS),
            image_hints: owned(IMAGE_HINT_FIELDS),
            collection_types: vec![
                ("websites".to_string(), ResultType::Website),
                ("images".to_string(), ResultType::Image),
                ("videos".to_string(), ResultType::Video),
            ],
        }
    }
}

fn owned(aliases: &[&str]) -> Vec<String> {
    aliases.iter().map(|alias| alias.to_string()).collect()
}

impl Schema {
    /// Case-insensitive substring match of `query` against title, description
    /// and every keyword.
    pub fn matches(&self, record: &Value, query: &str) -> bool {
        let Some(fields) = record.as_object() else {
            return false;
        };
        let needle = query.to_lowercase();
        if first_text(fields, &self.title).to_lowercase().contains(&needle) {
            return true;
        }
        if first_text(fields, &self.description)
            .to_lowercase()
            .contains(&needle)
        {
            return true;
        }
        keywords(fields, &self.keywords)
            .iter()
            .any(|keyword| keyword.to_lowercase().contains(&needle))
    }

    /// Flattens a stored record into a [`NormalizedResult`].
    ///
    /// `origin` absolutizes relative image paths (e.g. `https://example.org`).
    pub fn normalize(&self, collection: &str, record: &Value, origin: &str) -> NormalizedResult {
        let empty = Map::new();
        let fields = record.as_object().unwrap_or(&empty);

        let image_url = normalize_image(first_text(fields, &self.image), origin);
        let result_type = self.result_type(collection, fields, &image_url);

        NormalizedResult {
            title: first_text(fields, &self.title).to_string(),
            description: first_text(fields, &self.description).to_string(),
            url: first_text(fields, &self.url).to_string(),
            image_url,
            result_type,
            is_company: first_value(fields, &self.company_flag)
                .map(truthy)
                .unwrap_or(false),
            company_name: first_text(fields, &self.company_name).trim().to_string(),
            site_type: first_text(fields, &self.site_type).trim().to_string(),
        }
    }

    fn result_type(&self, collection: &str, fields: &Map<String, Value>, image: &str) -> ResultType {
        if let Some((_, kind)) = self
            .collection_types
            .iter()
            .find(|(name, _)| name == collection)
        {
            return *kind;
        }
        if self.video_hints.iter().any(|key| has_value(fields, key)) {
            ResultType::Video
        } else if !image.is_empty() || self.image_hints.iter().any(|key| has_value(fields, key)) {
            ResultType::Image
        } else {
            ResultType::Website
        }
    }
}

/// First alias holding a non-empty string, or `""`.
fn first_text<'a>(fields: &'a Map<String, Value>, aliases: &[String]) -> &'a str {
    aliases
        .iter()
        .filter_map(|alias| fields.get(alias).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .unwrap_or("")
}

fn first_value<'a>(fields: &'a Map<String, Value>, aliases: &[String]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| fields.get(alias))
        .find(|value| !value.is_null())
}

fn has_value(fields: &Map<String, Value>, key: &str) -> bool {
    fields.get(key).map(truthy).unwrap_or(false)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Keywords from the first alias present; a legacy comma-separated string is
/// split.
fn keywords(fields: &Map<String, Value>, aliases: &[String]) -> Vec<String> {
    for alias in aliases {
        match fields.get(alias) {
            Some(Value::Array(items)) => {
                return items
                    .iter()
                    .map(|item| item.as_str().unwrap_or("").to_string())
                    .collect();
            }
            Some(Value::String(text)) if !text.is_empty() => {
                return text.split(',').map(|k| k.trim().to_string()).collect();
            }
            _ => {}
        }
    }
    Vec::new()
}

/// Clears the placeholder thumbnail and absolutizes relative paths.
pub fn normalize_image(raw: &str, origin: &str) -> String {
    if raw.is_empty() || raw.contains(PLACEHOLDER_IMAGE_MARKER) {
        return String::new();
    }
    let lower = raw.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || raw.starts_with("//") {
        return raw.to_string();
    }
    format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        raw.trim_start_matches('/')
    )
}
