//! Outbound tracked links.
//!
//! Links are built locally and deterministically: the same id and campaign
//! always produce the same URL.

use crate::{Error, Result};
use reqwest::Url;

/// Entity kinds with a well-known base path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    /// A single event page.
    Event,
    /// A venue page.
    Venue,
    /// An organizer profile.
    Organizer,
}

impl EntityType {
    /// Path segment for this entity type.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Event => "events",
            Self::Venue => "venues",
            Self::Organizer => "organizers",
        }
    }
}

/// Builds `{base}/{entity path}/{id}?utm_source=..&utm_medium=..&utm_campaign=..`.
#[derive(Debug, Clone)]
pub struct TrackedLinkBuilder {
    base: Url,
    source: String,
    medium: String,
    campaign: String,
}

impl TrackedLinkBuilder {
    /// Creates a builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `base_url` is not an absolute URL.
    pub fn new(
        base_url: &str,
        source: impl Into<String>,
        medium: impl Into<String>,
        campaign: impl Into<String>,
    ) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| Error::InvalidInput(format!("tracking base url '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidInput(format!(
                "tracking base url '{base_url}' cannot carry paths"
            )));
        }
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self {
            base,
            source: source.into(),
            medium: medium.into(),
            campaign: campaign.into(),
        })
    }

    /// Link to an event.
    #[must_use]
    pub fn event_url(&self, id: &str) -> String {
        self.url(EntityType::Event, id)
    }

    /// Link to any entity.
    #[must_use]
    pub fn url(&self, entity: EntityType, id: &str) -> String {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(entity.path()).push(id);
        }
        url.query_pairs_mut()
            .append_pair("utm_source", &self.source)
            .append_pair("utm_medium", &self.medium)
            .append_pair("utm_campaign", &self.campaign);
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> TrackedLinkBuilder {
        TrackedLinkBuilder::new("https://site.example/app/", "bot", "social", "spring").unwrap()
    }

    #[test]
    fn test_event_url() {
        assert_eq!(
            builder().event_url("evt-42"),
            "https://site.example/app/events/evt-42?utm_source=bot&utm_medium=social&utm_campaign=spring"
        );
    }

    #[test]
    fn test_entity_paths() {
        assert!(builder().url(EntityType::Venue, "v1").contains("/venues/v1?"));
        assert!(builder().url(EntityType::Organizer, "o1").contains("/organizers/o1?"));
    }

    #[test]
    fn test_deterministic_and_escaped() {
        let b = builder();
        assert_eq!(b.event_url("a b/c"), b.event_url("a b/c"));
        assert!(b.event_url("a b/c").contains("/events/a%20b%2Fc?"));
    }

    #[test]
    fn test_invalid_base() {
        assert!(TrackedLinkBuilder::new("mailto:x@y", "a", "b", "c").is_err());
        assert!(TrackedLinkBuilder::new("nope", "a", "b", "c").is_err());
    }
}
