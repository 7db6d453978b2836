use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder};
use serde_json::{json, Value};
use webdriver::capabilities::Capabilities;

pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Thin wrapper around a `fantoccini` WebDriver client.
pub struct FolioDriver {
    pub client: Client,
}

impl FolioDriver {
    /// Open a Chrome session on a running WebDriver service (Chromedriver by
    /// default, see [`DEFAULT_WEBDRIVER_URL`]).
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self> {
        let caps = chrome_capabilities(headless);
        tracing::debug!(%webdriver_url, args = ?chrome_args(&caps), "browser.session.connect");

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(webdriver_url)
            .await
            .with_context(|| format!("connecting to WebDriver at {webdriver_url}"))?;
        tracing::info!(%webdriver_url, headless, "browser.session.open");
        Ok(Self { client })
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        tracing::debug!("browser.session.closed");
        Ok(())
    }
}

pub fn chrome_capabilities(headless: bool) -> Capabilities {
    let mut args = vec![json!("--window-size=1366,900"), json!("--lang=en-US")];
    if headless {
        args.push(json!("--headless"));
        args.push(json!("--disable-gpu"));
    }

    let mut caps = Capabilities::new();
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

/// Launch arguments inside a capability set.
pub fn chrome_args(caps: &Capabilities) -> Vec<&str> {
    caps.get("goog:chromeOptions")
        .and_then(|opts| opts.get("args"))
        .and_then(Value::as_array)
        .map(|args| args.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_adds_flags() {
        let caps = chrome_capabilities(true);
        let args = chrome_args(&caps);
        assert!(args.contains(&"--headless"));
        assert!(args.contains(&"--disable-gpu"));
    }

    #[test]
    fn headed_session_has_no_headless_flag() {
        let caps = chrome_capabilities(false);
        let args = chrome_args(&caps);
        assert!(!args.contains(&"--headless"));
        assert!(args.contains(&"--lang=en-US"));
    }
}
