use std::path::PathBuf;

use anyhow::{Context, Result};

/// Produces the HTML fragment holding the experience list.
#[async_trait::async_trait]
pub trait HtmlSource: Send + Sync {
    async fn fetch_html(&self) -> Result<String>;

    /// Short label for logs.
    fn describe(&self) -> String;
}

/// Reads a previously saved page.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl HtmlSource for FileSource {
    async fn fetch_html(&self) -> Result<String> {
        let html = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading HTML from {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), bytes = html.len(), "source.file.read");
        Ok(html)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_saved_page() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<main><ul></ul></main>").unwrap();

        let source = FileSource::new(file.path());
        assert_eq!(source.fetch_html().await.unwrap(), "<main><ul></ul></main>");
        assert!(source.describe().starts_with("file:"));
    }

    #[tokio::test]
    async fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.html");

        let err = FileSource::new(&path).fetch_html().await.unwrap_err();
        assert!(format!("{err:#}").contains("absent.html"));
    }
}
