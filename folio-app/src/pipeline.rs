use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use folio_config::{FolioConfig, ImageConfig, SourceConfig};
use folio_drivers::{FileSource, HtmlSource, LinkedInCapturer};
use folio_extract::{ExperienceExtractor, ImageTranscoder, TranscodeSettings};
use folio_http::HttpClient;

/// `--input` wins over the configured source.
pub fn build_source(cfg: &FolioConfig, input: Option<PathBuf>) -> Result<Box<dyn HtmlSource>> {
    if let Some(path) = input {
        return Ok(Box::new(FileSource::new(path)));
    }

    match &cfg.source {
        Some(SourceConfig::File { path }) => Ok(Box::new(FileSource::new(path.clone()))),
        Some(SourceConfig::Linkedin {
            profile_url,
            email,
            password,
            webdriver_url,
            headless,
            wait_secs,
        }) => {
            let capturer = LinkedInCapturer::new(profile_url, email.as_str(), password.as_str())?
                .webdriver_url(webdriver_url.as_str())
                .headless(*headless)
                .wait(Duration::from_secs(*wait_secs));
            Ok(Box::new(capturer))
        }
        None => bail!("no HTML source: pass --input <file> or set `source` in the config"),
    }
}

pub fn transcode_settings(images: &ImageConfig) -> TranscodeSettings {
    TranscodeSettings {
        max_dimension: images.max_dimension,
        jpeg_quality: images.jpeg_quality,
        fetch_timeout: Duration::from_secs(images.fetch_timeout_secs),
        max_bytes: images.max_image_bytes,
    }
}

pub fn build_extractor(images: &ImageConfig) -> Result<ExperienceExtractor> {
    let settings = transcode_settings(images);
    let http = HttpClient::new()?.with_timeout(settings.fetch_timeout);
    let transcoder = ImageTranscoder::new(http, settings);
    Ok(ExperienceExtractor::new(
        transcoder,
        images.max_concurrent_fetches,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_config::FolioConfigLoader;

    fn config(yaml: &str) -> FolioConfig {
        FolioConfigLoader::new().with_yaml_str(yaml).load().unwrap()
    }

    #[test]
    fn input_flag_overrides_configured_source() {
        let cfg = config("source:\n  kind: file\n  path: saved.html\n");
        let source = build_source(&cfg, Some(PathBuf::from("other.html"))).unwrap();
        assert_eq!(source.describe(), "file:other.html");
    }

    #[test]
    fn file_source_from_config() {
        let cfg = config("source:\n  kind: file\n  path: saved.html\n");
        let source = build_source(&cfg, None).unwrap();
        assert_eq!(source.describe(), "file:saved.html");
    }

    #[test]
    fn linkedin_source_from_config() {
        let cfg = config(
            "source:\n  kind: linkedin\n  profile_url: https://www.linkedin.com/in/someone/\n  email: a@b.c\n  password: pw\n",
        );
        let source = build_source(&cfg, None).unwrap();
        assert_eq!(
            source.describe(),
            "linkedin:https://www.linkedin.com/in/someone/"
        );
    }

    #[test]
    fn missing_source_is_an_error() {
        let cfg = config("version: \"1\"\n");
        assert!(build_source(&cfg, None).is_err());
    }

    #[test]
    fn image_config_maps_to_transcoder_settings() {
        let cfg = config(
            "images:\n  max_dimension: 120\n  fetch_timeout_secs: 3\n  max_image_bytes: 2048\n",
        );
        let settings = transcode_settings(&cfg.images);
        assert_eq!(settings.max_dimension, 120);
        assert_eq!(settings.jpeg_quality, 85);
        assert_eq!(settings.fetch_timeout, Duration::from_secs(3));
        assert_eq!(settings.max_bytes, 2048);
    }
}
