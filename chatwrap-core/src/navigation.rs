use url::Url;

use crate::preferences::Preferences;

/// Outcome for a request to open a new browsing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Open inside the application, as a new browsing context of its own.
    /// The view that made the request keeps its page.
    Allow,
    /// Keep it out of the application; the target goes to the system browser.
    Deny,
}

/// Hands a URL to whatever the desktop uses for it (usually the default browser).
pub trait ExternalOpener {
    fn open(&self, url: &str) -> Result<(), String>;
}

/// Schemes that only make sense inside the view that produced them.
const IN_APP_SCHEMES: &[&str] = &["about", "blob", "data"];

/// Decides where new windows requested by the page should open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPolicy {
    external_links_in_browser: bool,
    internal_domains: Vec<String>,
}

impl NavigationPolicy {
    pub fn new(external_links_in_browser: bool, internal_domains: &[String]) -> Self {
        NavigationPolicy {
            external_links_in_browser,
            internal_domains: internal_domains
                .iter()
                .map(|d| normalize_host(d))
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    pub fn from_preferences(preferences: &Preferences) -> Self {
        Self::new(
            preferences.external_links_in_browser,
            &preferences.internal_domains,
        )
    }

    pub fn is_internal_host(&self, host: &str) -> bool {
        let host = normalize_host(host);
        self.internal_domains.iter().any(|d| *d == host)
    }

    /// Classify `target` without side effects.
    pub fn decide(&self, target: &str) -> NavigationDecision {
        if !self.external_links_in_browser {
            return NavigationDecision::Allow;
        }

        let url = match Url::parse(target) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("Cannot parse navigation target {:?}: {}", target, e);
                return NavigationDecision::Allow;
            }
        };

        match url.scheme() {
            "http" | "https" => match url.host_str() {
                Some(host) if self.is_internal_host(host) => NavigationDecision::Allow,
                _ => NavigationDecision::Deny,
            },
            scheme if IN_APP_SCHEMES.contains(&scheme) => NavigationDecision::Allow,
            _ => NavigationDecision::Deny,
        }
    }

    /// Classify `target` and, when denied, pass it to `opener`.
    pub fn resolve(&self, target: &str, opener: &dyn ExternalOpener) -> NavigationDecision {
        let decision = self.decide(target);
        if decision == NavigationDecision::Deny {
            log::debug!("Opening {} in the system browser", target);
            if let Err(e) = opener.open(target) {
                log::error!("Failed to open {} externally: {}", target, e);
            }
        }
        decision
    }
}

fn normalize_host(host: &str) -> String {
    host.trim().trim_end_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingOpener {
        opened: RefCell<Vec<String>>,
        fail: bool,
    }

    impl ExternalOpener for RecordingOpener {
        fn open(&self, url: &str) -> Result<(), String> {
            self.opened.borrow_mut().push(url.to_string());
            if self.fail {
                Err("no browser".to_string())
            } else {
                Ok(())
            }
        }
    }

    fn policy(external: bool, domains: &[&str]) -> NavigationPolicy {
        let domains: Vec<String> = domains.iter().map(|d| d.to_string()).collect();
        NavigationPolicy::new(external, &domains)
    }

    #[test]
    fn internal_domain_stays_in_app() {
        let opener = RecordingOpener::default();
        let decision = policy(true, &["chatgpt.com"]).resolve("https://chatgpt.com/foo", &opener);
        assert_eq!(decision, NavigationDecision::Allow);
        assert!(opener.opened.borrow().is_empty());
    }

    #[test]
    fn external_domain_goes_to_browser() {
        let opener = RecordingOpener::default();
        let decision = policy(true, &["chatgpt.com"]).resolve("https://example.com", &opener);
        assert_eq!(decision, NavigationDecision::Deny);
        assert_eq!(*opener.opened.borrow(), vec!["https://example.com"]);
    }

    #[test]
    fn disabled_redirect_allows_everything() {
        let opener = RecordingOpener::default();
        let decision = policy(false, &["chatgpt.com"]).resolve("https://example.com", &opener);
        assert_eq!(decision, NavigationDecision::Allow);
        assert!(opener.opened.borrow().is_empty());
    }

    #[test]
    fn subdomains_are_not_internal() {
        let p = policy(true, &["chatgpt.com"]);
        assert_eq!(p.decide("https://cdn.chatgpt.com/x"), NavigationDecision::Deny);
    }

    #[test]
    fn host_comparison_ignores_case_and_trailing_dot() {
        let p = policy(true, &[" ChatGPT.com. "]);
        assert_eq!(p.decide("https://CHATGPT.COM/c/1"), NavigationDecision::Allow);
        assert!(p.is_internal_host("chatgpt.com."));
    }

    #[test]
    fn non_web_schemes() {
        let p = policy(true, &["chatgpt.com"]);
        assert_eq!(p.decide("about:blank"), NavigationDecision::Allow);
        assert_eq!(p.decide("blob:https://chatgpt.com/1234"), NavigationDecision::Allow);
        assert_eq!(p.decide("mailto:someone@example.com"), NavigationDecision::Deny);
    }

    #[test]
    fn script_opened_blank_and_blob_windows_stay_in_app_either_way() {
        for external in [true, false] {
            let opener = RecordingOpener::default();
            let p = policy(external, &["chatgpt.com"]);
            for target in ["about:blank", "blob:https://chatgpt.com/5f0c", "data:text/plain,hi"] {
                assert_eq!(p.resolve(target, &opener), NavigationDecision::Allow, "{}", target);
            }
            assert!(opener.opened.borrow().is_empty());
        }
    }

    #[test]
    fn unparseable_target_stays_in_app() {
        let opener = RecordingOpener::default();
        let decision = policy(true, &["chatgpt.com"]).resolve("not a url", &opener);
        assert_eq!(decision, NavigationDecision::Allow);
        assert!(opener.opened.borrow().is_empty());
    }

    #[test]
    fn opener_failure_still_denies() {
        let opener = RecordingOpener {
            fail: true,
            ..RecordingOpener::default()
        };
        let decision = policy(true, &[]).resolve("https://example.com", &opener);
        assert_eq!(decision, NavigationDecision::Deny);
        assert_eq!(opener.opened.borrow().len(), 1);
    }

    #[test]
    fn default_preferences_treat_chat_hosts_as_internal() {
        let p = NavigationPolicy::from_preferences(&Preferences::default());
        assert_eq!(p.decide("https://chat.openai.com/"), NavigationDecision::Allow);
        assert_eq!(p.decide("https://chatgpt.com/c/abc"), NavigationDecision::Allow);
        assert_eq!(p.decide("https://github.com/"), NavigationDecision::Deny);
    }
}
