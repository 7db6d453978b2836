//! Per-entry extraction.
//!
//! [`parse_entry`] reads everything that lives in the markup and is pure;
//! [`EntryDraft::finish`] adds the transcoded logo. [`extract_entry`] chains
//! the two and turns a [`SkipReason`] into `None` after logging it.

use folio_common::ExperienceRecord;
use thiserror::Error;

use crate::classify::classify;
use crate::dom::{Element, Query};
use crate::transcode::ImageTranscoder;

const LOGO: Query<'static> = Query::tag("img").with_classes(&["ivm-view-attr__img--centered"]);
const CONTENT: Query<'static> = Query::tag("div").with_classes(&[
    "display-flex",
    "flex-column",
    "align-self-center",
    "flex-grow-1",
]);
const TITLE: Query<'static> = Query::tag("div").with_classes(&[
    "display-flex",
    "align-items-center",
    "mr1",
    "hoverable-link-text",
    "t-bold",
]);
const COMPANY_LINE: Query<'static> = Query::tag("span")
    .with_classes(&["t-14", "t-normal"])
    .without_classes(&["t-black--light"]);
const DETAIL_LINE: Query<'static> =
    Query::tag("span").with_classes(&["t-14", "t-normal", "t-black--light"]);
const SUB_COMPONENTS: Query<'static> =
    Query::tag("div").with_classes(&["pvs-entity__sub-components"]);
const ACCESSIBLE: Query<'static> = Query::tag("span").with_attr("aria-hidden", "true");

const SEPARATOR: char = '·';
const SKILLS_PREFIX: &str = "Skills:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("content container not found")]
    MissingContainer,
    #[error("title missing or empty")]
    MissingTitle,
    #[error("company missing or empty")]
    MissingCompany,
}

/// A record with every markup-derived field set and `image` still empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub record: ExperienceRecord,
    pub logo_url: Option<String>,
}

impl EntryDraft {
    pub async fn finish(self, transcoder: &ImageTranscoder) -> ExperienceRecord {
        let image = match self.logo_url.as_deref() {
            Some(url) => transcoder.transcode(url).await,
            None => String::new(),
        };
        ExperienceRecord {
            image,
            ..self.record
        }
    }
}

pub async fn extract_entry(
    entry: &Element,
    transcoder: &ImageTranscoder,
) -> Option<ExperienceRecord> {
    let draft = draft_or_skip(entry)?;
    Some(draft.finish(transcoder).await)
}

/// [`parse_entry`], logging the skip reason.
pub(crate) fn draft_or_skip(entry: &Element) -> Option<EntryDraft> {
    parse_entry(entry)
        .inspect_err(|reason| tracing::debug!(%reason, "extract.entry.skipped"))
        .ok()
}

pub fn parse_entry(entry: &Element) -> Result<EntryDraft, SkipReason> {
    let logo_url = entry
        .find(&LOGO)
        .and_then(|img| img.attr("src"))
        .map(str::to_owned);

    let container = entry.find(&CONTENT).ok_or(SkipReason::MissingContainer)?;

    let title = container
        .find(&TITLE)
        .and_then(accessible_text)
        .filter(|t| !t.is_empty())
        .ok_or(SkipReason::MissingTitle)?;

    let (company, employment_type) = container
        .find(&COMPANY_LINE)
        .and_then(accessible_text)
        .map(|text| split_company(&text))
        .unwrap_or_default();
    if company.is_empty() {
        return Err(SkipReason::MissingCompany);
    }

    let details: Vec<String> = container
        .find_all(&DETAIL_LINE)
        .into_iter()
        .filter_map(accessible_text)
        .filter(|t| !t.is_empty())
        .collect();
    let (duration, location) = resolve_details(&details);

    let runs: Vec<String> = entry
        .find(&SUB_COMPONENTS)
        .map(|block| block.find_all(&ACCESSIBLE).iter().map(|s| s.text()).collect())
        .unwrap_or_default();
    let (skills, description) = resolve_sub_components(&runs);

    Ok(EntryDraft {
        record: ExperienceRecord {
            title,
            company,
            employment_type,
            duration,
            location,
            description,
            skills,
            image: String::new(),
        },
        logo_url,
    })
}

fn accessible_text(el: &Element) -> Option<String> {
    el.find(&ACCESSIBLE).map(Element::text)
}

/// `"Acme Corp · Full-time"` -> `("Acme Corp", "Full-time")`.
pub fn split_company(text: &str) -> (String, String) {
    match text.split_once(SEPARATOR) {
        Some((company, kind)) => (company.trim().to_owned(), kind.trim().to_owned()),
        None => (text.trim().to_owned(), String::new()),
    }
}

/// First duration-like text wins `duration`; among the rest, the first
/// location-like text wins `location`. Duration is checked first, so a text
/// that reads as both never becomes the location.
pub fn resolve_details<S: AsRef<str>>(texts: &[S]) -> (String, String) {
    let (duration, location) = texts.iter().map(AsRef::as_ref).fold(
        (None, None),
        |(duration, location): (Option<&str>, Option<&str>), text| {
            let kind = classify(text);
            if kind.is_duration {
                (duration.or(Some(text)), location)
            } else if kind.is_location {
                (duration, location.or(Some(text)))
            } else {
                (duration, location)
            }
        },
    );
    (
        duration.unwrap_or_default().to_owned(),
        location.unwrap_or_default().to_owned(),
    )
}

/// Last `Skills:` run wins `skills`; the longest other run wins
/// `description`, earlier run on ties.
pub fn resolve_sub_components<S: AsRef<str>>(runs: &[S]) -> (Vec<String>, String) {
    let skills = runs
        .iter()
        .filter_map(|r| r.as_ref().strip_prefix(SKILLS_PREFIX))
        .last()
        .map(split_skills)
        .unwrap_or_default();

    let description = runs
        .iter()
        .map(AsRef::as_ref)
        .filter(|r| !r.is_empty() && !r.contains(SKILLS_PREFIX))
        .fold("", |best, run| {
            if run.chars().count() > best.chars().count() {
                run
            } else {
                best
            }
        })
        .to_owned();

    (skills, description)
}

fn split_skills(list: &str) -> Vec<String> {
    list.split(SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
