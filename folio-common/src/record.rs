use serde::{Deserialize, Serialize};

/// One professional-experience entry as served to clients.
///
/// Every field except `title` and `company` is optional in the source markup
/// and defaults to empty. `image` is either a `data:` URI or the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceRecord {
    pub title: String,
    pub company: String,
    #[serde(default, alias = "employment_type")]
    pub employment_type: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub image: String,
}

impl ExperienceRecord {
    /// Apply `f` to every string-valued field, including each skill.
    pub fn map_text<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        Self {
            title: f(&self.title),
            company: f(&self.company),
            employment_type: f(&self.employment_type),
            duration: f(&self.duration),
            location: f(&self.location),
            description: f(&self.description),
            skills: self.skills.iter().map(|s| f(s)).collect(),
            image: f(&self.image),
        }
    }
}
