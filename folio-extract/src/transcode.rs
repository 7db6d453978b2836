//! Logo/portrait fetching and re-encoding into `data:` URIs.
//!
//! Every failure is absorbed here: a fetch error yields
//! [`TranscodedImage::Unavailable`], a decode error yields the original bytes
//! as [`TranscodedImage::Raw`]. Callers only see a string at the end.

use std::io::Cursor;
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use folio_http::{HttpClient, RequestOpts};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use thiserror::Error;

pub const JPEG_MEDIA_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone)]
pub struct TranscodeSettings {
    /// Upper bound for both width and height, in pixels.
    pub max_dimension: u32,
    pub jpeg_quality: u8,
    pub fetch_timeout: Duration,
    /// Larger downloads count as failed fetches.
    pub max_bytes: u64,
}

impl Default for TranscodeSettings {
    fn default() -> Self {
        Self {
            max_dimension: 200,
            jpeg_quality: 85,
            fetch_timeout: Duration::from_secs(10),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("image decode/encode failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("transcode task aborted: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscodedImage {
    /// Downscaled, RGB, JPEG re-encoded.
    Transformed { bytes: Vec<u8> },
    /// Original bytes, kept because they could not be decoded.
    Raw { bytes: Bytes, media_type: String },
    Unavailable,
}

impl TranscodedImage {
    pub fn media_type(&self) -> Option<&str> {
        match self {
            TranscodedImage::Transformed { .. } => Some(JPEG_MEDIA_TYPE),
            TranscodedImage::Raw { media_type, .. } => Some(media_type.as_str()),
            TranscodedImage::Unavailable => None,
        }
    }

    /// `data:<media>;base64,<payload>`, or `""` when unavailable.
    pub fn to_data_uri(&self) -> String {
        let (media_type, bytes): (&str, &[u8]) = match self {
            TranscodedImage::Transformed { bytes } => (JPEG_MEDIA_TYPE, bytes.as_slice()),
            TranscodedImage::Raw { bytes, media_type } => (media_type.as_str(), &bytes[..]),
            TranscodedImage::Unavailable => return String::new(),
        };
        format!("data:{media_type};base64,{}", STANDARD.encode(bytes))
    }
}

/// Shared by all entries of a run; cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct ImageTranscoder {
    http: HttpClient,
    settings: TranscodeSettings,
}

impl ImageTranscoder {
    pub fn new(http: HttpClient, settings: TranscodeSettings) -> Self {
        Self { http, settings }
    }

    /// Fetch `url` and return it as an embeddable string, `""` on failure.
    pub async fn transcode(&self, url: &str) -> String {
        self.fetch(url).await.to_data_uri()
    }

    pub async fn fetch(&self, url: &str) -> TranscodedImage {
        let url = url.trim();
        if url.is_empty() {
            return TranscodedImage::Unavailable;
        }

        let opts = RequestOpts {
            timeout: Some(self.settings.fetch_timeout),
            max_body_bytes: Some(self.settings.max_bytes),
            ..Default::default()
        };
        let fetched = match self.http.get_bytes(url, opts).await {
            Ok(fetched) => fetched,
            Err(error) => {
                tracing::warn!(%url, %error, status = ?error.status(), "transcode.fetch_failed");
                return TranscodedImage::Unavailable;
            }
        };
        if fetched.body.is_empty() {
            tracing::warn!(%url, "transcode.empty_body");
            return TranscodedImage::Unavailable;
        }

        match self.shrink(fetched.body.clone()).await {
            Ok(bytes) => {
                tracing::debug!(
                    %url,
                    status = %fetched.status,
                    original_len = fetched.body.len(),
                    encoded_len = bytes.len(),
                    "transcode.transformed"
                );
                TranscodedImage::Transformed { bytes }
            }
            Err(error) => {
                let media_type = fetched
                    .content_type
                    .unwrap_or_else(|| JPEG_MEDIA_TYPE.to_string());
                tracing::debug!(%url, %error, %media_type, "transcode.fallback.raw");
                TranscodedImage::Raw {
                    bytes: fetched.body,
                    media_type,
                }
            }
        }
    }

    async fn shrink(&self, body: Bytes) -> Result<Vec<u8>, TranscodeError> {
        let max = self.settings.max_dimension;
        let quality = self.settings.jpeg_quality;
        let bytes =
            tokio::task::spawn_blocking(move || shrink_to_jpeg(&body, max, quality)).await??;
        Ok(bytes)
    }
}

/// Decode, fit within `max_dimension` (never upscale), drop alpha, encode JPEG.
pub fn shrink_to_jpeg(
    bytes: &[u8],
    max_dimension: u32,
    quality: u8,
) -> Result<Vec<u8>, image::ImageError> {
    let img = image::load_from_memory(bytes)?;
    let img = if img.width() > max_dimension || img.height() > max_dimension {
        img.resize(max_dimension, max_dimension, FilterType::Lanczos3)
    } else {
        img
    };
    let rgb = img.to_rgb8();

    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, quality).encode_image(&rgb)?;
    Ok(out.into_inner())
}
