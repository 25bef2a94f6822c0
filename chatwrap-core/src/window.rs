use std::sync::LazyLock;

use url::Url;

use crate::preferences::{Model, Preferences};

pub const BASE_URL: &str = "https://chat.openai.com";
pub const WINDOW_TITLE: &str = "ChatGPT";
pub const DEFAULT_WIDTH: i32 = 1200;
pub const DEFAULT_HEIGHT: i32 = 800;

static BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse(BASE_URL).expect("BASE_URL is a valid URL"));

/// Build the address the main view loads.
///
/// `temporary-chat=true` is added when temporary chat is on, and
/// `model=<value>` for any model other than `Model::Default`.
pub fn target_url(preferences: &Preferences) -> Url {
    let mut url = BASE.clone();
    if preferences.temporary_chat {
        url.query_pairs_mut().append_pair("temporary-chat", "true");
    }
    if preferences.model != Model::Default {
        url.query_pairs_mut()
            .append_pair("model", preferences.model.as_str());
    }
    url
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Show as soon as the window is created.
    Immediate,
    /// Stay hidden until the page signals it is ready.
    WhenReady,
}

/// Everything needed to create the main window, derived from a preferences
/// snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowPlan {
    pub title: &'static str,
    pub width: i32,
    pub height: i32,
    pub url: Url,
    pub visibility: Visibility,
    pub maximize: bool,
}

impl WindowPlan {
    pub fn from_preferences(preferences: &Preferences) -> Self {
        WindowPlan {
            title: WINDOW_TITLE,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            url: target_url(preferences),
            visibility: if preferences.ready_to_show {
                Visibility::WhenReady
            } else {
                Visibility::Immediate
            },
            maximize: preferences.maximize_window,
        }
    }
}

/// The window-system side of the main window.
///
/// Implemented over GTK in the desktop binary and by a recorder in tests.
pub trait WindowHost {
    fn load_url(&self, url: &Url);
    fn maximize(&self);
    fn show(&self);
    /// Run `callback` once, the first time the page content is ready.
    fn on_content_ready(&self, callback: Box<dyn FnOnce()>);
}

/// Drive a freshly created window through its visibility transition and
/// start loading the page.
pub fn present<H>(plan: &WindowPlan, host: &H)
where
    H: WindowHost + Clone + 'static,
{
    match plan.visibility {
        Visibility::WhenReady => {
            let ready_host = host.clone();
            let maximize = plan.maximize;
            host.on_content_ready(Box::new(move || {
                if maximize {
                    ready_host.maximize();
                }
                ready_host.show();
            }));
        }
        Visibility::Immediate => {
            if plan.maximize {
                host.maximize();
            }
            host.show();
        }
    }
    host.load_url(&plan.url);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingHost {
        calls: Rc<RefCell<Vec<String>>>,
        ready: Rc<RefCell<Option<Box<dyn FnOnce()>>>>,
    }

    impl RecordingHost {
        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn fire_ready(&self) {
            let callback = self.ready.borrow_mut().take();
            if let Some(callback) = callback {
                callback();
            }
        }
    }

    impl WindowHost for RecordingHost {
        fn load_url(&self, url: &Url) {
            self.calls.borrow_mut().push(format!("load {}", url));
        }

        fn maximize(&self) {
            self.calls.borrow_mut().push("maximize".to_string());
        }

        fn show(&self) {
            self.calls.borrow_mut().push("show".to_string());
        }

        fn on_content_ready(&self, callback: Box<dyn FnOnce()>) {
            *self.ready.borrow_mut() = Some(callback);
        }
    }

    fn query(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn base_url_constant_parses() {
        assert_eq!(Url::parse(BASE_URL).unwrap(), *BASE);
        assert_eq!(BASE.as_str(), "https://chat.openai.com/");
    }

    #[test]
    fn default_preferences_load_bare_base_url() {
        let url = target_url(&Preferences::default());
        assert_eq!(url.host_str(), Some("chat.openai.com"));
        assert_eq!(url.query(), None);
    }

    #[test]
    fn temporary_chat_and_model_are_both_added() {
        let prefs = Preferences {
            temporary_chat: true,
            model: Model::O3,
            ..Preferences::default()
        };
        let url = target_url(&prefs);
        let params = query(&url);
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("temporary-chat").map(String::as_str), Some("true"));
        assert_eq!(params.get("model").map(String::as_str), Some("o3"));
        assert_eq!(url.host_str(), Some("chat.openai.com"));
    }

    #[test]
    fn default_model_adds_no_model_parameter() {
        let prefs = Preferences {
            temporary_chat: true,
            model: Model::Default,
            ..Preferences::default()
        };
        let params = query(&target_url(&prefs));
        assert!(!params.contains_key("model"));
        assert!(params.contains_key("temporary-chat"));
    }

    #[test]
    fn plan_follows_preferences() {
        let prefs = Preferences {
            ready_to_show: false,
            maximize_window: true,
            ..Preferences::default()
        };
        let plan = WindowPlan::from_preferences(&prefs);
        assert_eq!(plan.visibility, Visibility::Immediate);
        assert!(plan.maximize);
        assert_eq!((plan.width, plan.height), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert_eq!(plan.title, WINDOW_TITLE);
    }

    #[test]
    fn immediate_window_shows_before_loading() {
        let prefs = Preferences {
            ready_to_show: false,
            maximize_window: true,
            ..Preferences::default()
        };
        let host = RecordingHost::default();
        present(&WindowPlan::from_preferences(&prefs), &host);
        assert_eq!(
            host.calls(),
            vec!["maximize", "show", "load https://chat.openai.com/"]
        );
    }

    #[test]
    fn deferred_window_stays_hidden_until_ready() {
        let prefs = Preferences {
            ready_to_show: true,
            maximize_window: true,
            ..Preferences::default()
        };
        let host = RecordingHost::default();
        present(&WindowPlan::from_preferences(&prefs), &host);
        assert_eq!(host.calls(), vec!["load https://chat.openai.com/"]);

        host.fire_ready();
        assert_eq!(
            host.calls(),
            vec!["load https://chat.openai.com/", "maximize", "show"]
        );
    }

    #[test]
    fn deferred_window_without_maximize_only_shows() {
        let host = RecordingHost::default();
        present(&WindowPlan::from_preferences(&Preferences::default()), &host);
        host.fire_ready();
        assert_eq!(host.calls(), vec!["load https://chat.openai.com/", "show"]);
    }
}
