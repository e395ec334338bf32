use civic_core::Clock;
use scraper::{ElementRef, Html, Node};

use crate::config::SiteRules;
use crate::dates::parse_civic_datetime;
use crate::invocation::invocation_args;
use crate::key::content_key;
use crate::route::resolve_route;
use crate::text::{clean, split_agenda};
use crate::{IntermediateEventRecord, UnparsableFragmentError};

// Positions inside the player call.
const ARG_VIDEO: usize = 0;
const ARG_THUMBNAIL: usize = 1;
const ARG_BODY: usize = 3;
const ARG_DATE: usize = 4;

/// Turns one listing-row fragment into an [`IntermediateEventRecord`].
///
/// Parsing is a pure function of the fragment, the sibling URL, the site
/// rules and the clock, so one parser can be shared across worker threads.
#[derive(Clone, Copy)]
pub struct EventRecordParser<'a> {
    rules: &'a SiteRules,
    clock: &'a dyn Clock,
}

impl<'a> EventRecordParser<'a> {
    pub fn new(rules: &'a SiteRules, clock: &'a dyn Clock) -> Self {
        Self { rules, clock }
    }

    /// Parse a fragment given as HTML source.
    pub fn parse_html(
        &self,
        fragment_html: &str,
        sibling: &str,
    ) -> Result<IntermediateEventRecord, UnparsableFragmentError> {
        let fragment = Html::parse_fragment(fragment_html);
        self.parse(fragment.root_element(), sibling)
    }

    pub fn parse(
        &self,
        fragment: ElementRef<'_>,
        sibling: &str,
    ) -> Result<IntermediateEventRecord, UnparsableFragmentError> {
        let rules = self.rules;

        let title = fragment
            .select(&rules.title)
            .next()
            .ok_or(UnparsableFragmentError::MissingElement("title"))?;
        let (player, args) = fragment
            .select(&rules.player)
            .find_map(|anchor| {
                let call = anchor.value().attr(&rules.player_attribute)?;
                invocation_args(call).map(|args| (anchor, args))
            })
            .ok_or(UnparsableFragmentError::MissingElement("player invocation"))?;

        let video = arg(&args, ARG_VIDEO)
            .ok_or(UnparsableFragmentError::MissingElement("video link"))?;
        let video_url = resolve_route(sibling, &video)?;

        let raw_date = arg(&args, ARG_DATE)
            .or_else(|| fragment.select(&rules.date).next().map(element_text))
            .filter(|raw| !raw.is_empty())
            .ok_or(UnparsableFragmentError::MissingElement("date"))?;
        let parsed_datetime = parse_civic_datetime(&raw_date, rules.timezone, self.clock)?;

        let thumbnail = arg(&args, ARG_THUMBNAIL)
            .or_else(|| {
                fragment
                    .select(&rules.thumbnail)
                    .find_map(|img| img.value().attr("src"))
                    .map(str::to_string)
            })
            .ok_or(UnparsableFragmentError::MissingElement("thumbnail"))?;
        let thumbnail_url = resolve_route(sibling, &thumbnail)?;

        let source_url = match title.value().attr("href").or(player.value().attr("href")) {
            Some(href) if !href.trim().is_empty() => resolve_route(sibling, href)?,
            _ => resolve_route(sibling, sibling)?,
        };

        let body = arg(&args, ARG_BODY)
            .map(|raw| clean(&raw))
            .filter(|body| !body.is_empty())
            .unwrap_or_else(|| clean(&element_text(title)));

        let agenda = fragment
            .select(&rules.excerpt)
            .next()
            .map(|excerpt| self.agenda(excerpt))
            .unwrap_or_default();

        let mut record = IntermediateEventRecord {
            agenda,
            body,
            event_datetime: parsed_datetime.date_naive(),
            key: String::new(),
            source_url,
            thumbnail_url,
            video_url,
            parsed_datetime,
        };
        record.key = content_key(&record.key_fields());
        Ok(record)
    }

    /// Agenda items from the excerpt block (paragraph or bare text) holding
    /// the separator token. Blocks after it are not part of the agenda.
    fn agenda(&self, excerpt: ElementRef<'_>) -> Vec<String> {
        let separator = &self.rules.agenda_separator;
        excerpt
            .children()
            .filter_map(|node| match node.value() {
                Node::Text(text) => Some(text.trim().to_string()),
                Node::Element(_) => ElementRef::wrap(node).map(element_text),
                _ => None,
            })
            .find(|block| block.contains(separator.as_str()))
            .map(|block| split_agenda(&block, separator, &self.rules.agenda_item_separator))
            .unwrap_or_default()
    }
}

/// Trimmed positional argument, if present and non-blank.
fn arg(args: &[String], index: usize) -> Option<String> {
    args.get(index)
        .map(|raw| raw.trim())
        .filter(|raw| !raw.is_empty())
        .map(str::to_string)
}

/// Text of an element with its text nodes joined by spaces.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}
