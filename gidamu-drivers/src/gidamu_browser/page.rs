use crate::gidamu_browser::{pacing::Pacer, DriverError};
use fantoccini::{elements::Element, error::CmdError, Client, Locator};
use std::fmt;
use std::time::Duration;
use tracing::warn;

/// An element target. CSS by default; strings that look like an XPath
/// expression (leading `//` or `(`) are treated as XPath, which is how
/// text-content matches such as `//button[contains(text(), "대여")]` are
/// expressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Css(String),
    XPath(String),
}

impl Selector {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("//") || raw.starts_with('(') {
            Self::XPath(raw.to_string())
        } else {
            Self::Css(raw.to_string())
        }
    }

    fn locator(&self) -> Locator<'_> {
        match self {
            Self::Css(s) => Locator::Css(s),
            Self::XPath(s) => Locator::XPath(s),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) | Self::XPath(s) => f.write_str(s),
        }
    }
}

/// View onto the session's current window providing element queries and
/// bounded waits.
pub struct Page {
    client: Client,
    pacer: Pacer,
}

impl Page {
    pub(crate) fn new(client: Client, pacer: Pacer) -> Self {
        Self { client, pacer }
    }

    /// Navigate the session to `url`.
    pub async fn goto(&self, url: &str) -> Result<(), DriverError> {
        self.client.goto(url).await?;
        Ok(())
    }

    /// Return the current page URL.
    pub async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.client.current_url().await?.to_string())
    }

    /// Block until `selector` matches, or until `deadline` elapses.
    ///
    /// The calling task suspends; a timeout surfaces as
    /// [`DriverError::WaitTimeout`] so callers can tell a slow page from a
    /// wrong selector or a transport fault.
    pub async fn wait_for(
        &self,
        selector: &Selector,
        deadline: Duration,
    ) -> Result<PageElement, DriverError> {
        match self
            .client
            .wait()
            .at_most(deadline)
            .for_element(selector.locator())
            .await
        {
            Ok(element) => Ok(PageElement::new(element, self.pacer.clone())),
            Err(CmdError::WaitTimeout) => {
                warn!(target: "browser.wait", %selector, waited_ms = deadline.as_millis() as u64, "bounded wait timed out");
                Err(DriverError::WaitTimeout {
                    selector: selector.to_string(),
                    waited: deadline,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Find a single element without waiting.
    pub async fn find(&self, selector: &Selector) -> Result<PageElement, DriverError> {
        match self.client.find(selector.locator()).await {
            Ok(element) => Ok(PageElement::new(element, self.pacer.clone())),
            Err(err) if err.is_no_such_element() => Err(DriverError::NotFound {
                selector: selector.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Find zero or more elements without waiting.
    pub async fn find_all(&self, selector: &Selector) -> Result<Vec<PageElement>, DriverError> {
        let elements = self.client.find_all(selector.locator()).await?;
        Ok(elements
            .into_iter()
            .map(|element| PageElement::new(element, self.pacer.clone()))
            .collect())
    }

    /// The pacer shared by this session, for step-level delays.
    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }
}

/// Wrapper for DOM elements with typed helpers consistent with [`Page`].
pub struct PageElement {
    inner: Element,
    pacer: Pacer,
}

impl PageElement {
    fn new(inner: Element, pacer: Pacer) -> Self {
        Self { inner, pacer }
    }

    /// Click the element. Consumes the handle: a click may navigate, which
    /// invalidates element references on the old page.
    pub async fn click(self) -> Result<(), DriverError> {
        self.inner.click().await?;
        Ok(())
    }

    /// The element's visible text.
    pub async fn text(&self) -> Result<String, DriverError> {
        Ok(self.inner.text().await?)
    }

    /// Read an attribute value.
    pub async fn attr(&self, attribute: &str) -> Result<Option<String>, DriverError> {
        Ok(self.inner.attr(attribute).await?)
    }

    /// Find a child element.
    pub async fn find(&self, selector: &Selector) -> Result<PageElement, DriverError> {
        match self.inner.find(selector.locator()).await {
            Ok(element) => Ok(PageElement::new(element, self.pacer.clone())),
            Err(err) if err.is_no_such_element() => Err(DriverError::NotFound {
                selector: selector.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Type into the element with paced keystrokes.
    pub async fn type_paced(&self, text: &str) -> Result<(), DriverError> {
        self.pacer.type_text(&self.inner, text).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Selector;

    #[test]
    fn plain_strings_parse_as_css() {
        assert_eq!(
            Selector::parse(".notification_item"),
            Selector::Css(".notification_item".into())
        );
        assert_eq!(
            Selector::parse("button[type=submit]"),
            Selector::Css("button[type=submit]".into())
        );
    }

    #[test]
    fn xpath_expressions_are_recognised() {
        assert_eq!(
            Selector::parse("//button[contains(text(), \"대여\")]"),
            Selector::XPath("//button[contains(text(), \"대여\")]".into())
        );
        assert_eq!(
            Selector::parse("(//a)[1]"),
            Selector::XPath("(//a)[1]".into())
        );
    }

    #[test]
    fn display_round_trips_the_raw_string() {
        let raw = "#user_profile";
        assert_eq!(Selector::parse(raw).to_string(), raw);
    }
}
