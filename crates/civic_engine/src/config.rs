use chrono_tz::Tz;
use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Site-specific wiring for one municipal media portal.
///
/// Values are opaque strings supplied by the embedding program; `compile`
/// validates them once so parsing never re-parses selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// IANA timezone the portal's dates are written in.
    pub civic_timezone: String,
    pub listing_fragment_selector: String,
    /// Attribute holding the inline player call, e.g. `onclick`.
    pub player_invocation_attribute: String,
    pub title_selector: String,
    pub excerpt_selector: String,
    pub date_selector: String,
    pub thumbnail_selector: String,
    pub next_page_selector: Option<String>,
    pub agenda_separator_token: String,
    pub agenda_item_separator_token: String,
    /// Upper bound on row fragments parsed at once.
    pub concurrency: usize,
}

impl SiteConfig {
    /// Wiring for the Seattle Channel city council listing.
    pub fn seattle_channel() -> Self {
        Self {
            civic_timezone: "America/Los_Angeles".to_string(),
            listing_fragment_selector: "div.paginationItem".to_string(),
            player_invocation_attribute: "onclick".to_string(),
            title_selector: "h2.paginationTitle a".to_string(),
            excerpt_selector: "div.titleExcerptText".to_string(),
            date_selector: "div.videoDate".to_string(),
            thumbnail_selector: "img[src]".to_string(),
            next_page_selector: None,
            agenda_separator_token: "Agenda:".to_string(),
            agenda_item_separator_token: ";".to_string(),
            concurrency: 4,
        }
    }

    /// Parse a RON document; missing fields fall back to the Seattle wiring.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|err| ConfigError::Format(err.to_string()))
    }

    pub fn compile(&self) -> Result<SiteRules, ConfigError> {
        let timezone: Tz = self
            .civic_timezone
            .parse()
            .map_err(|_| ConfigError::UnknownTimezone(self.civic_timezone.clone()))?;
        if self.agenda_separator_token.is_empty() {
            return Err(ConfigError::EmptyToken("agenda_separator_token"));
        }
        if self.agenda_item_separator_token.is_empty() {
            return Err(ConfigError::EmptyToken("agenda_item_separator_token"));
        }
        if self.player_invocation_attribute.trim().is_empty() {
            return Err(ConfigError::EmptyToken("player_invocation_attribute"));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }

        let player = format!("a[{}]", self.player_invocation_attribute.trim());
        Ok(SiteRules {
            timezone,
            listing: selector("listing fragment", &self.listing_fragment_selector)?,
            player: selector("player invocation", &player)?,
            player_attribute: self.player_invocation_attribute.trim().to_string(),
            title: selector("title", &self.title_selector)?,
            excerpt: selector("excerpt", &self.excerpt_selector)?,
            date: selector("date", &self.date_selector)?,
            thumbnail: selector("thumbnail", &self.thumbnail_selector)?,
            next_page: self
                .next_page_selector
                .as_deref()
                .map(|raw| selector("next page", raw))
                .transpose()?,
            agenda_separator: self.agenda_separator_token.clone(),
            agenda_item_separator: self.agenda_item_separator_token.clone(),
            concurrency: self.concurrency,
        })
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::seattle_channel()
    }
}

fn selector(name: &'static str, raw: &str) -> Result<Selector, ConfigError> {
    Selector::parse(raw).map_err(|err| ConfigError::InvalidSelector {
        name,
        selector: raw.to_string(),
        message: err.to_string(),
    })
}

/// Validated, ready-to-use form of a [`SiteConfig`].
#[derive(Debug, Clone)]
pub struct SiteRules {
    pub(crate) timezone: Tz,
    pub(crate) listing: Selector,
    pub(crate) player: Selector,
    pub(crate) player_attribute: String,
    pub(crate) title: Selector,
    pub(crate) excerpt: Selector,
    pub(crate) date: Selector,
    pub(crate) thumbnail: Selector,
    pub(crate) next_page: Option<Selector>,
    pub(crate) agenda_separator: String,
    pub(crate) agenda_item_separator: String,
    pub(crate) concurrency: usize,
}

impl SiteRules {
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
}
