//! Entity decoding applied to every record before it leaves the crate.

use folio_common::ExperienceRecord;

/// Substituted in order; `&amp;` first.
const ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&nbsp;", " "),
];

/// Replace the fixed entity table by literal substitution.
///
/// ```
/// use folio_extract::normalize::decode_entities;
///
/// assert_eq!(decode_entities("R&amp;D &lt;Lab&gt;"), "R&D <Lab>");
/// assert_eq!(decode_entities("plain"), "plain");
/// ```
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_owned();
    }
    ENTITIES
        .iter()
        .fold(text.to_owned(), |acc, (entity, plain)| acc.replace(entity, plain))
}

pub fn normalize_record(record: ExperienceRecord) -> ExperienceRecord {
    record.map_text(decode_entities)
}

pub fn normalize(records: Vec<ExperienceRecord>) -> Vec<ExperienceRecord> {
    records.into_iter().map(normalize_record).collect()
}
