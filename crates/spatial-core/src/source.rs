//! Asset references handed to the embedded viewer

use serde::{Deserialize, Serialize};

/// Label used for sources derived from local file uploads
pub const UPLOAD_LABEL: &str = "Local Upload";

/// Label used for sources committed from the URL fields
pub const CUSTOM_LABEL: &str = "Custom URL";

/// An asset reference: a primary (GLB) locator plus an optional alternate
/// (USDZ) locator for platforms that prefer a packaged format.
///
/// Sources are immutable once built; the catalog deserializes them from the
/// `[[preset]]` tables of the application config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    label: String,
    url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ios_url: Option<String>,
}

impl Source {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            ios_url: None,
        }
    }

    /// Attach an alternate-format locator. Empty strings are treated as absent.
    pub fn with_ios_url(mut self, ios_url: impl Into<String>) -> Self {
        let ios_url = ios_url.into();
        self.ios_url = if ios_url.is_empty() { None } else { Some(ios_url) };
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Primary asset locator
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Alternate locator exactly as provided
    pub fn ios_url(&self) -> Option<&str> {
        self.ios_url.as_deref()
    }

    /// Alternate locator, falling back to the primary one
    pub fn ios_url_or_url(&self) -> &str {
        self.ios_url.as_deref().unwrap_or(&self.url)
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label, self.url)
    }
}
