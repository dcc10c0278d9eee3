use derive_more::{AsRef, Display};
use log::{error, warn};

pub const DEFAULT_MANIFEST: &str = "/manifest.webmanifest";

#[allow(async_fn_in_trait)]
pub trait BrandingService {
    async fn get_branding(&self) -> Result<Branding, String>;
    async fn set_branding(&self, branding: Branding) -> Result<(), String>;
}

#[allow(async_fn_in_trait)]
pub trait BrandingRepository {
    async fn read_partner(&self) -> Result<Option<String>, String>;
    async fn write_partner(&self, partner: Option<String>) -> Result<(), String>;
}

/// Slug of a partner organization.
#[derive(AsRef, Display, Debug, Clone, PartialEq, Eq)]
pub struct Partner(String);

impl Partner {
    pub fn new(slug: &str) -> Result<Self, PartnerError> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(PartnerError::Empty);
        }
        if !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(PartnerError::Invalid(slug.to_string()));
        }
        Ok(Self(slug.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PartnerError {
    #[error("partner must not be empty")]
    Empty,
    #[error("invalid partner: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Branding {
    pub partner: Option<Partner>,
}

impl Branding {
    /// Branding of a stored or requested partner. Invalid slugs select the default branding.
    #[must_use]
    pub fn from_slug(slug: Option<&str>) -> Self {
        Self {
            partner: slug.and_then(|slug| match Partner::new(slug) {
                Ok(partner) => Some(partner),
                Err(err) => {
                    warn!("ignoring partner: {err}");
                    None
                }
            }),
        }
    }

    /// Branding selected by a `partner` parameter of a URL query string.
    #[must_use]
    pub fn from_query(query: &str) -> Option<Self> {
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "partner")
            .map(|(_, value)| Self::from_slug(Some(value)))
    }

    #[must_use]
    pub fn manifest_url(&self) -> String {
        match &self.partner {
            Some(partner) => format!("/manifests/{partner}.webmanifest"),
            None => DEFAULT_MANIFEST.to_string(),
        }
    }

    /// Points the manifest link of the document to the manifest of this branding.
    pub fn apply(&self) {
        match gloo_utils::document().query_selector("link[rel=manifest]") {
            Ok(Some(link)) => {
                if let Err(err) = link.set_attribute("href", &self.manifest_url()) {
                    error!("failed to set manifest: {err:?}");
                }
            }
            Ok(None) => warn!("document has no manifest link"),
            Err(err) => error!("failed to query manifest link: {err:?}"),
        }
    }
}
