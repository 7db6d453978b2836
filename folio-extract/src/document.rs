use folio_common::ExperienceRecord;
use futures::stream::{self, StreamExt};

use crate::dom::{Element, Query};
use crate::entry::{EntryDraft, draft_or_skip};
use crate::normalize::normalize;
use crate::transcode::ImageTranscoder;

const ENTRY: Query<'static> = Query::tag("li").with_classes(&["pvs-list__paged-list-item"]);

/// Runs the whole pipeline for one HTML document.
#[derive(Debug, Clone)]
pub struct ExperienceExtractor {
    transcoder: ImageTranscoder,
    max_concurrent_fetches: usize,
}

impl ExperienceExtractor {
    pub fn new(transcoder: ImageTranscoder, max_concurrent_fetches: usize) -> Self {
        Self {
            transcoder,
            max_concurrent_fetches: max_concurrent_fetches.max(1),
        }
    }

    /// Extract, transcode and normalize every entry in `html`.
    ///
    /// All entries are parsed up front; only the logo fetches run
    /// concurrently, and the output keeps document order. Malformed entries
    /// are skipped; a document without entries yields an empty list.
    pub async fn extract_document(&self, html: &str) -> Vec<ExperienceRecord> {
        let root = Element::parse_fragment(html);
        let entries = root.find_all(&ENTRY);
        let found = entries.len();

        let drafts: Vec<EntryDraft> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                tracing::debug_span!("entry", index).in_scope(|| draft_or_skip(entry))
            })
            .collect();
        let skipped = found - drafts.len();

        let records: Vec<ExperienceRecord> = stream::iter(drafts)
            .map(|draft| draft.finish(&self.transcoder))
            .buffered(self.max_concurrent_fetches)
            .collect()
            .await;

        tracing::info!(
            found,
            extracted = records.len(),
            skipped,
            "extract.document.done"
        );
        normalize(records)
    }
}
