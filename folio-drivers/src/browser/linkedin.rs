use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use fantoccini::{Client, Locator};
use url::Url;

use crate::browser::driver::{FolioDriver, DEFAULT_WEBDRIVER_URL};
use crate::source::HtmlSource;

pub const LOGIN_URL: &str = "https://www.linkedin.com/login";

const USERNAME_INPUT: &str = "#username";
const PASSWORD_INPUT: &str = "#password";
const SIGN_IN_BUTTON: &str = "//button[normalize-space()='Sign in']";
const SEE_ALL_EXPERIENCES: &str = "#navigation-index-see-all-experiences";
const MAIN: &str = "main";
/// Rendered lazily after the "see all" navigation; `main` alone exists earlier.
const EXPERIENCE_ITEM: &str = "main li.pvs-list__paged-list-item";

/// Logs in, opens the full experience list of a profile and returns the
/// inner HTML of its `main` element.
pub struct LinkedInCapturer {
    profile_url: Url,
    email: String,
    password: String,
    webdriver_url: String,
    headless: bool,
    wait: Duration,
}

impl fmt::Debug for LinkedInCapturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedInCapturer")
            .field("profile_url", &self.profile_url.as_str())
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("webdriver_url", &self.webdriver_url)
            .field("headless", &self.headless)
            .field("wait", &self.wait)
            .finish()
    }
}

impl LinkedInCapturer {
    pub fn new(
        profile_url: &str,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let profile_url = Url::parse(profile_url)
            .with_context(|| format!("invalid profile URL {profile_url:?}"))?;
        Ok(Self {
            profile_url,
            email: email.into(),
            password: password.into(),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
            wait: Duration::from_secs(10),
        })
    }

    pub fn webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = url.into();
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Upper bound for each element wait.
    pub fn wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    async fn capture(&self, client: &Client) -> Result<String> {
        client.goto(LOGIN_URL).await?;
        self.element(client, Locator::Css(USERNAME_INPUT), USERNAME_INPUT)
            .await?
            .send_keys(&self.email)
            .await?;
        self.element(client, Locator::Css(PASSWORD_INPUT), PASSWORD_INPUT)
            .await?
            .send_keys(&self.password)
            .await?;
        self.element(client, Locator::XPath(SIGN_IN_BUTTON), SIGN_IN_BUTTON)
            .await?
            .click()
            .await?;
        tracing::debug!("linkedin.login.submitted");

        client.goto(self.profile_url.as_str()).await?;
        self.element(client, Locator::Css(SEE_ALL_EXPERIENCES), SEE_ALL_EXPERIENCES)
            .await
            .context("experience list link not found; login may have failed")?
            .click()
            .await?;

        self.element(client, Locator::Css(EXPERIENCE_ITEM), EXPERIENCE_ITEM)
            .await
            .context("experience list did not render")?;
        let main = self.element(client, Locator::Css(MAIN), MAIN).await?;
        Ok(main.html(true).await?)
    }

    async fn element(
        &self,
        client: &Client,
        locator: Locator<'_>,
        what: &str,
    ) -> Result<fantoccini::elements::Element> {
        client
            .wait()
            .at_most(self.wait)
            .for_element(locator)
            .await
            .with_context(|| format!("waiting for {what}"))
    }
}

#[async_trait::async_trait]
impl HtmlSource for LinkedInCapturer {
    async fn fetch_html(&self) -> Result<String> {
        let driver = FolioDriver::connect(&self.webdriver_url, self.headless).await?;
        let result = self.capture(&driver.client).await;
        // Always attempt to close the session before returning
        if let Err(error) = driver.close().await {
            tracing::warn!(%error, "browser.session.close_failed");
        }

        let html = result?;
        tracing::info!(profile = %self.profile_url, bytes = html.len(), "linkedin.capture.done");
        Ok(html)
    }

    fn describe(&self) -> String {
        format!("linkedin:{}", self.profile_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_relative_profile_urls() {
        assert!(LinkedInCapturer::new("/in/someone", "a@b.c", "pw").is_err());
    }

    #[test]
    fn capture_waits_for_list_items_inside_main() {
        assert!(EXPERIENCE_ITEM.starts_with(MAIN));
        assert!(EXPERIENCE_ITEM.ends_with("li.pvs-list__paged-list-item"));
    }

    #[test]
    fn debug_output_hides_the_password() {
        let capturer =
            LinkedInCapturer::new("https://www.linkedin.com/in/someone/", "a@b.c", "hunter2")
                .unwrap()
                .headless(false)
                .wait(Duration::from_secs(3));
        let shown = format!("{capturer:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("headless: false"));
        assert_eq!(capturer.describe(), "linkedin:https://www.linkedin.com/in/someone/");
    }
}
