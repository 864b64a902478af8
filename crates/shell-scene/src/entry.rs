//! One-time entry transition for pages opened from the app library.

use shell_config::ShellConfig;
use shell_dom::Dom;
use tracing::debug;
use url::Url;

use crate::classes::{SHOW_APP_CONTENT, SHOW_HEADER, WITH_TRANSITION};

/// Whether `referrer` is the app library page on the current host.
///
/// The referrer's host (with a non-default port, if any) must equal `host`,
/// and everything after the host must be exactly `library_path`: a query or
/// fragment, even an empty one, fails the match. Empty or malformed referrers
/// never match.
pub fn arrived_from_library(referrer: &str, host: &str, library_path: &str) -> bool {
    if referrer.is_empty() {
        return false;
    }
    let Ok(url) = Url::parse(referrer) else {
        return false;
    };
    let Some(referrer_host) = url.host_str() else {
        return false;
    };
    let authority = match url.port() {
        Some(port) => format!("{referrer_host}:{port}"),
        None => referrer_host.to_string(),
    };
    authority.eq_ignore_ascii_case(host)
        && url.path() == library_path
        && url.query().is_none()
        && url.fragment().is_none()
}

#[derive(Debug, Clone)]
pub struct EntryTransition {
    header: String,
    content: String,
    library_path: String,
    header_transition: bool,
    content_transition: bool,
}

impl EntryTransition {
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            header: config.selectors.app_header.clone(),
            content: config.selectors.app_content.clone(),
            library_path: config.entry.library_path.clone(),
            header_transition: config.features.header_transition,
            content_transition: config.features.content_transition,
        }
    }

    /// Decide the entry transition from the referrer, then reveal the header
    /// and content regions. Returns whether the transition was enabled.
    pub fn apply(&self, dom: &mut dyn Dom) -> bool {
        let referrer = dom.referrer();
        let arrived = arrived_from_library(&referrer, &dom.location_host(), &self.library_path);

        if arrived {
            if self.header_transition {
                dom.add_class_all(&self.header, WITH_TRANSITION);
            }
            if self.content_transition {
                dom.add_class_all(&self.content, WITH_TRANSITION);
            }
        }

        dom.add_class_all(&self.header, SHOW_HEADER);
        dom.add_class_all(&self.content, SHOW_APP_CONTENT);

        debug!(%referrer, arrived, "entry transition decided");
        arrived
    }
}
