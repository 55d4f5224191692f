//! Authenticated browser session against the league site.
//!
//! The site renders member pages behind a login form, so fetching goes
//! through headless Chrome rather than a plain HTTP client. One tab drives
//! the outer scraping iteration; match-day detail fetches get their own tab
//! (`open_page`) so they never disturb the outer tab's navigation state.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use tracing::debug;

pub const BASE_URL: &str = "https://www.learnedleague.com";

/// Bounded wait for a located element. Past this, the section is treated
/// as absent (inactive player) rather than a failure.
const ELEMENT_WAIT: Duration = Duration::from_millis(2000);

const USERNAME_INPUT: &str = "#sidebar input[name=\"username\"]";
const PASSWORD_INPUT: &str = "#sidebar input[name=\"password\"]";
const SUBMIT_INPUT: &str = "#sidebar input[type=\"submit\"]";

/// Login credentials, read from the environment.
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            username: env::var("LL_USER").context("LL_USER is not set")?,
            password: env::var("LL_PASS").context("LL_PASS is not set")?,
        })
    }
}

/// One browser tab. All element lookups use the bounded wait.
pub struct PageHandle {
    tab: Arc<Tab>,
}

impl PageHandle {
    pub fn goto(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .with_context(|| format!("navigation to {url} failed"))?;
        self.tab
            .wait_until_navigated()
            .with_context(|| format!("page load for {url} timed out"))?;
        Ok(())
    }

    /// Outer HTML of the first element matching `selector`, or `None` if
    /// it does not appear within the bounded wait.
    pub fn element_html(&self, selector: &str) -> Option<String> {
        let element = match self
            .tab
            .wait_for_element_with_custom_timeout(selector, ELEMENT_WAIT)
        {
            Ok(element) => element,
            Err(err) => {
                debug!("element {selector:?} not found: {err}");
                return None;
            }
        };
        match element.get_content() {
            Ok(html) => Some(html),
            Err(err) => {
                debug!("failed to read {selector:?}: {err}");
                None
            }
        }
    }

    /// Outer HTML of every element matching `selector`; empty when none
    /// shows up within the bounded wait.
    pub fn elements_html(&self, selector: &str) -> Vec<String> {
        if self
            .tab
            .wait_for_element_with_custom_timeout(selector, ELEMENT_WAIT)
            .is_err()
        {
            debug!("no elements matched {selector:?}");
            return Vec::new();
        }
        let elements = match self.tab.find_elements(selector) {
            Ok(elements) => elements,
            Err(err) => {
                debug!("find_elements({selector:?}) failed: {err}");
                return Vec::new();
            }
        };
        elements
            .iter()
            .filter_map(|element| element.get_content().ok())
            .collect()
    }

    /// Full document HTML of the current page.
    pub fn body_html(&self) -> Result<String> {
        self.tab.get_content().context("failed to read page content")
    }

    fn login(&self, credentials: &Credentials) -> Result<()> {
        self.goto(BASE_URL)?;
        self.tab
            .wait_for_element(USERNAME_INPUT)
            .context("login form did not appear")?
            .type_into(&credentials.username)
            .context("failed to fill username")?;
        self.tab
            .wait_for_element(PASSWORD_INPUT)
            .context("password field did not appear")?
            .type_into(&credentials.password)
            .context("failed to fill password")?;
        self.tab
            .wait_for_element(SUBMIT_INPUT)
            .context("submit button did not appear")?
            .click()
            .context("failed to submit login form")?;
        self.tab
            .wait_until_navigated()
            .context("post-login navigation timed out")?;
        Ok(())
    }
}

/// Headless Chrome session, logged in for the lifetime of the run.
pub struct LeagueSession {
    browser: Browser,
    page: PageHandle,
}

impl LeagueSession {
    pub fn login(credentials: &Credentials) -> Result<Self> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .build()
            .context("failed to build Chrome launch options")?;
        let browser = Browser::new(options).context("failed to launch Chrome")?;
        let tab = browser.new_tab().context("failed to open browser tab")?;
        let page = PageHandle { tab };
        page.login(credentials)?;
        debug!("logged in as {}", credentials.username);
        Ok(Self { browser, page })
    }

    /// The tab driving the outer scraping iteration.
    pub fn page(&self) -> &PageHandle {
        &self.page
    }

    /// A fresh tab sharing the authenticated profile. Used for match-day
    /// detail fetches so the outer tab keeps its place.
    pub fn open_page(&self) -> Result<PageHandle> {
        let tab = self
            .browser
            .new_tab()
            .context("failed to open detail tab")?;
        Ok(PageHandle { tab })
    }
}
