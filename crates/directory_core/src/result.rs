use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a submitted item, as shown by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Website,
    Image,
    Video,
}

impl ResultType {
    pub const ALL: [ResultType; 3] = [ResultType::Website, ResultType::Image, ResultType::Video];

    pub fn as_str(self) -> &'static str {
        match self {
            ResultType::Website => "website",
            ResultType::Image => "image",
            ResultType::Video => "video",
        }
    }

    /// Label of the link that leads to the item's target.
    pub fn action_label(self) -> &'static str {
        match self {
            ResultType::Website => "Visit Site",
            ResultType::Image => "View Image",
            ResultType::Video => "View Video",
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One search hit, flattened from whichever historical schema it was stored in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedResult {
    pub title: String,
    pub description: String,
    pub url: String,
    /// Empty when the record has no usable image.
    pub image_url: String,
    pub result_type: ResultType,
    pub is_company: bool,
    pub company_name: String,
    pub site_type: String,
}

impl NormalizedResult {
    pub fn new(title: impl Into<String>, result_type: ResultType) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            url: String::new(),
            image_url: String::new(),
            result_type,
            is_company: false,
            company_name: String::new(),
            site_type: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    pub fn with_company(mut self, name: impl Into<String>, is_company: bool) -> Self {
        self.company_name = name.into();
        self.is_company = is_company;
        self
    }

    pub fn with_site_type(mut self, site_type: impl Into<String>) -> Self {
        self.site_type = site_type.into();
        self
    }
}
